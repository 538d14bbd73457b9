//! Material property records

use serde::{Deserialize, Serialize};

/// Isotropic elastic material, referenced by sections by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name, unique within a model
    pub name: String,
    /// Elastic modulus (Pa)
    pub e: f64,
    /// Poisson's ratio
    pub nu: f64,
    /// Density (kg/m³)
    pub rho: f64,
    /// Yield strength (Pa), where applicable
    pub fy: Option<f64>,
}

impl Material {
    /// Create an isotropic material
    pub fn new(name: impl Into<String>, e: f64, nu: f64, rho: f64) -> Self {
        Material {
            name: name.into(),
            e,
            nu,
            rho,
            fy: None,
        }
    }

    /// Structural steel (S355)
    pub fn steel(name: impl Into<String>) -> Self {
        Material {
            name: name.into(),
            e: 210.0e9,
            nu: 0.3,
            rho: 7850.0,
            fy: Some(355.0e6),
        }
    }

    /// Structural aluminum
    pub fn aluminum(name: impl Into<String>) -> Self {
        Material {
            name: name.into(),
            e: 70.0e9,
            nu: 0.33,
            rho: 2700.0,
            fy: Some(240.0e6),
        }
    }

    /// Set the yield strength
    pub fn with_yield_strength(mut self, fy: f64) -> Self {
        self.fy = Some(fy);
        self
    }

    /// Shear modulus derived from E and nu
    pub fn shear_modulus(&self) -> f64 {
        self.e / (2.0 * (1.0 + self.nu))
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::steel("S355")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_steel_properties() {
        let m = Material::steel("S355");
        assert_relative_eq!(m.e, 210.0e9);
        assert_relative_eq!(m.nu, 0.3);
        assert_eq!(m.fy, Some(355.0e6));
    }

    #[test]
    fn test_shear_modulus() {
        let m = Material::new("test", 200.0e9, 0.25, 7800.0);
        assert_relative_eq!(m.shear_modulus(), 80.0e9);
    }
}
