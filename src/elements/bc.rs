//! Boundary condition records

use serde::{Deserialize, Serialize};

/// A named restraint applied to a node set
///
/// Degrees of freedom are numbered 1 to 6 (three translations, three
/// rotations). The dof list is kept sorted and deduplicated so deck
/// output is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCondition {
    /// Boundary condition name, unique within a model
    pub name: String,
    /// Node set the restraint applies to
    pub set: String,
    /// Restrained degrees of freedom, ascending
    pub dofs: Vec<u8>,
}

impl BoundaryCondition {
    /// Create a boundary condition restraining the given dofs
    pub fn new(name: impl Into<String>, set: impl Into<String>, mut dofs: Vec<u8>) -> Self {
        dofs.sort_unstable();
        dofs.dedup();
        BoundaryCondition {
            name: name.into(),
            set: set.into(),
            dofs,
        }
    }

    /// Fully fixed: all six dofs restrained
    pub fn fixed(name: impl Into<String>, set: impl Into<String>) -> Self {
        BoundaryCondition::new(name, set, vec![1, 2, 3, 4, 5, 6])
    }

    /// Pinned: translations restrained, rotations free
    pub fn pinned(name: impl Into<String>, set: impl Into<String>) -> Self {
        BoundaryCondition::new(name, set, vec![1, 2, 3])
    }

    /// Contiguous dof runs as (first, last) pairs
    ///
    /// Keyword-format boundary lines take a first and last dof, so
    /// `[1, 2, 3, 5]` becomes `[(1, 3), (5, 5)]`.
    pub fn dof_spans(&self) -> Vec<(u8, u8)> {
        let mut spans = Vec::new();
        for &dof in &self.dofs {
            match spans.last_mut() {
                Some((_, last)) if *last + 1 == dof => *last = dof,
                _ => spans.push((dof, dof)),
            }
        }
        spans
    }
}
