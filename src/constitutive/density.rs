//! Density models.

use serde::{Deserialize, Serialize};

use super::DensityModel;

/// Incompressible fluid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstantDensity {
    pub value: f64,
}

impl ConstantDensity {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Default for ConstantDensity {
    fn default() -> Self {
        Self { value: 1.0 }
    }
}

impl DensityModel for ConstantDensity {
    #[inline]
    fn density(&self, _pressure: f64) -> (f64, f64) {
        (self.value, 0.0)
    }

    fn reference_density(&self) -> f64 {
        self.value
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

/// Slightly compressible fluid: `rho = rho_ref * exp(c * p)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompressibleDensity {
    /// Density at zero pressure
    pub reference: f64,
    /// Fluid compressibility `c`
    pub compressibility: f64,
}

impl CompressibleDensity {
    pub fn new(reference: f64, compressibility: f64) -> Self {
        Self {
            reference,
            compressibility,
        }
    }
}

impl DensityModel for CompressibleDensity {
    #[inline]
    fn density(&self, pressure: f64) -> (f64, f64) {
        let rho = self.reference * (self.compressibility * pressure).exp();
        (rho, self.compressibility * rho)
    }

    fn reference_density(&self) -> f64 {
        self.reference
    }

    fn name(&self) -> &'static str {
        "compressible"
    }
}
