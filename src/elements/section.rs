//! Cross-section profiles and section assignments

use super::element::ElementFamily;
use serde::{Deserialize, Serialize};

/// Beam cross-section properties
///
/// Profiles are stored as resolved properties (area, inertia, torsion)
/// rather than catalogue names, which is what the deck writers need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionProfile {
    /// Cross-sectional area (m²)
    pub area: f64,
    /// Second moment of area about the local y axis (m⁴)
    pub iy: f64,
    /// Second moment of area about the local z axis (m⁴)
    pub iz: f64,
    /// Torsional constant (m⁴)
    pub j: f64,
}

impl SectionProfile {
    /// Create a profile from resolved properties
    pub fn general(area: f64, iy: f64, iz: f64, j: f64) -> Self {
        SectionProfile { area, iy, iz, j }
    }

    /// Solid rectangular profile, width b by height h
    pub fn rectangular(b: f64, h: f64) -> Self {
        let (long, short) = if b >= h { (b, h) } else { (h, b) };
        let ratio = short / long;
        let j = long
            * short.powi(3)
            * (1.0 / 3.0 - 0.21 * ratio * (1.0 - ratio.powi(4) / 12.0));
        SectionProfile {
            area: b * h,
            iy: b * h.powi(3) / 12.0,
            iz: h * b.powi(3) / 12.0,
            j,
        }
    }

    /// Solid circular profile of diameter d
    pub fn circular(d: f64) -> Self {
        let r = d / 2.0;
        let i = std::f64::consts::PI * r.powi(4) / 4.0;
        SectionProfile {
            area: std::f64::consts::PI * r * r,
            iy: i,
            iz: i,
            j: 2.0 * i,
        }
    }

    /// Circular hollow profile, outer diameter d and wall thickness t
    pub fn pipe(d: f64, t: f64) -> Self {
        let ro = d / 2.0;
        let ri = ro - t;
        let i = std::f64::consts::PI * (ro.powi(4) - ri.powi(4)) / 4.0;
        SectionProfile {
            area: std::f64::consts::PI * (ro * ro - ri * ri),
            iy: i,
            iz: i,
            j: 2.0 * i,
        }
    }

    /// Rectangular hollow profile, outside b by h with wall thickness t
    pub fn box_profile(b: f64, h: f64, t: f64) -> Self {
        let bi = b - 2.0 * t;
        let hi = h - 2.0 * t;
        let area = b * h - bi * hi;
        let iy = (b * h.powi(3) - bi * hi.powi(3)) / 12.0;
        let iz = (h * b.powi(3) - hi * bi.powi(3)) / 12.0;
        // Thin-walled closed-section approximation
        let j = 2.0 * t * (b - t).powi(2) * (h - t).powi(2) / ((b - t) + (h - t));
        SectionProfile { area, iy, iz, j }
    }
}

/// What a section assigns to its element set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SectionKind {
    /// Beam profile with a local orientation vector
    Beam {
        profile: SectionProfile,
        orientation: [f64; 3],
    },
    /// Shell thickness
    Shell { thickness: f64 },
    /// Solid continuum, material only
    Solid,
}

/// A section assignment: binds an element set to a material and geometry
///
/// Elements resolve their material through the element set named here,
/// which is how both target deck grammars express the binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section name, unique within a model
    pub name: String,
    /// Element set the section applies to
    pub elset: String,
    /// Material name
    pub material: String,
    /// Geometry of the assignment
    pub kind: SectionKind,
}

impl Section {
    /// Beam section with the default orientation vector
    pub fn beam(
        name: impl Into<String>,
        elset: impl Into<String>,
        material: impl Into<String>,
        profile: SectionProfile,
    ) -> Self {
        Section {
            name: name.into(),
            elset: elset.into(),
            material: material.into(),
            kind: SectionKind::Beam {
                profile,
                orientation: [0.0, 0.0, -1.0],
            },
        }
    }

    /// Shell section of uniform thickness
    pub fn shell(
        name: impl Into<String>,
        elset: impl Into<String>,
        material: impl Into<String>,
        thickness: f64,
    ) -> Self {
        Section {
            name: name.into(),
            elset: elset.into(),
            material: material.into(),
            kind: SectionKind::Shell { thickness },
        }
    }

    /// Solid section
    pub fn solid(
        name: impl Into<String>,
        elset: impl Into<String>,
        material: impl Into<String>,
    ) -> Self {
        Section {
            name: name.into(),
            elset: elset.into(),
            material: material.into(),
            kind: SectionKind::Solid,
        }
    }

    /// Override the beam orientation vector
    pub fn with_orientation(mut self, orientation: [f64; 3]) -> Self {
        if let SectionKind::Beam {
            orientation: ref mut o,
            ..
        } = self.kind
        {
            *o = orientation;
        }
        self
    }

    /// Element family the assignment expects its set to contain
    pub fn family(&self) -> ElementFamily {
        match self.kind {
            SectionKind::Beam { .. } => ElementFamily::Line,
            SectionKind::Shell { .. } => ElementFamily::Shell,
            SectionKind::Solid => ElementFamily::Solid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangular_properties() {
        let p = SectionProfile::rectangular(0.1, 0.2);
        assert_relative_eq!(p.area, 0.02);
        assert_relative_eq!(p.iy, 0.1 * 0.2_f64.powi(3) / 12.0);
        assert_relative_eq!(p.iz, 0.2 * 0.1_f64.powi(3) / 12.0);
        assert!(p.j > 0.0);
    }

    #[test]
    fn test_pipe_area() {
        let p = SectionProfile::pipe(0.2, 0.01);
        let expected = std::f64::consts::PI * (0.1_f64.powi(2) - 0.09_f64.powi(2));
        assert_relative_eq!(p.area, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_assignment_families() {
        let beam = Section::beam("bm", "beams", "S355", SectionProfile::circular(0.1));
        assert_eq!(beam.family(), ElementFamily::Line);
        let shell = Section::shell("sh", "plates", "S355", 0.02);
        assert_eq!(shell.family(), ElementFamily::Shell);
    }

    #[test]
    fn test_orientation_override() {
        let beam = Section::beam("bm", "beams", "S355", SectionProfile::circular(0.1))
            .with_orientation([0.0, 1.0, 0.0]);
        match beam.kind {
            SectionKind::Beam { orientation, .. } => assert_eq!(orientation, [0.0, 1.0, 0.0]),
            _ => panic!("expected beam kind"),
        }
    }
}
