//! Load records applied through named sets

use crate::elements::SetKind;
use serde::{Deserialize, Serialize};

/// Standard gravity (m/s²)
pub const GRAVITY: f64 = 9.81;

/// What a load applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoadKind {
    /// Body acceleration on an element set
    Gravity {
        magnitude: f64,
        direction: [f64; 3],
    },
    /// Forces and moments on every node of a node set
    Concentrated {
        fx: f64,
        fy: f64,
        fz: f64,
        mx: f64,
        my: f64,
        mz: f64,
    },
    /// Uniform pressure on an element set
    Pressure { magnitude: f64 },
}

/// A named load, activated by attaching it to an analysis step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Load {
    /// Load name, unique within a model
    pub name: String,
    /// Set the load applies to; node set for concentrated loads,
    /// element set otherwise
    pub set: String,
    /// Load definition
    pub kind: LoadKind,
}

impl Load {
    /// Self-weight: standard gravity acting in negative z
    pub fn gravity(name: impl Into<String>, elset: impl Into<String>) -> Self {
        Load {
            name: name.into(),
            set: elset.into(),
            kind: LoadKind::Gravity {
                magnitude: GRAVITY,
                direction: [0.0, 0.0, -1.0],
            },
        }
    }

    /// Body acceleration with explicit magnitude and direction
    pub fn acceleration(
        name: impl Into<String>,
        elset: impl Into<String>,
        magnitude: f64,
        direction: [f64; 3],
    ) -> Self {
        Load {
            name: name.into(),
            set: elset.into(),
            kind: LoadKind::Gravity {
                magnitude,
                direction,
            },
        }
    }

    /// Force on every node of a node set, no moments
    pub fn force(
        name: impl Into<String>,
        nset: impl Into<String>,
        fx: f64,
        fy: f64,
        fz: f64,
    ) -> Self {
        Load {
            name: name.into(),
            set: nset.into(),
            kind: LoadKind::Concentrated {
                fx,
                fy,
                fz,
                mx: 0.0,
                my: 0.0,
                mz: 0.0,
            },
        }
    }

    /// Uniform pressure on an element set
    pub fn pressure(name: impl Into<String>, elset: impl Into<String>, magnitude: f64) -> Self {
        Load {
            name: name.into(),
            set: elset.into(),
            kind: LoadKind::Pressure { magnitude },
        }
    }

    /// Set kind the load must reference
    pub fn set_kind(&self) -> SetKind {
        match self.kind {
            LoadKind::Concentrated { .. } => SetKind::Node,
            LoadKind::Gravity { .. } | LoadKind::Pressure { .. } => SetKind::Element,
        }
    }

    /// Nonzero (dof, value) pairs of a concentrated load, dofs 1-6
    ///
    /// Empty for gravity and pressure loads.
    pub fn nonzero_components(&self) -> Vec<(u8, f64)> {
        match self.kind {
            LoadKind::Concentrated {
                fx,
                fy,
                fz,
                mx,
                my,
                mz,
            } => [fx, fy, fz, mx, my, mz]
                .iter()
                .enumerate()
                .filter(|(_, v)| **v != 0.0)
                .map(|(i, v)| (i as u8 + 1, *v))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_defaults() {
        let g = Load::gravity("grav", "all_elements");
        match g.kind {
            LoadKind::Gravity {
                magnitude,
                direction,
            } => {
                assert_eq!(magnitude, GRAVITY);
                assert_eq!(direction, [0.0, 0.0, -1.0]);
            }
            _ => panic!("expected gravity kind"),
        }
        assert_eq!(g.set_kind(), SetKind::Element);
    }

    #[test]
    fn test_nonzero_components() {
        let f = Load::force("tip", "tip_nodes", 0.0, 0.0, -1000.0);
        assert_eq!(f.nonzero_components(), vec![(3, -1000.0)]);
        assert_eq!(f.set_kind(), SetKind::Node);
    }
}
