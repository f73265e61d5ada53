//! Van Genuchten retention and Mualem relative permeability.
//!
//! For pressure `p < 0` the capillary head is `h = |p| / (rho g)` and
//!
//! ```text
//! S  = (S_sat - S_res) / (1 + (alpha h)^n)^m + S_res
//! kr = (1 - (alpha h)^(n-1) / (1 + (alpha h)^n)^m)^2 / (1 + (alpha h)^n)^(m/2)
//! ```
//!
//! with `m = 1 - 1/n`. For `p >= 0` the medium is saturated: `S = S_sat`,
//! `kr = 1`.

use serde::{Deserialize, Serialize};

use super::{RelPermModel, SaturationModel};
use crate::error::ConfigError;
use crate::types::CellIndex;

/// Van Genuchten parameters, uniform over the domain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VanGenuchten {
    /// Inverse air-entry head
    pub alpha: f64,
    /// Pore-size distribution index (> 1)
    pub n: f64,
    /// Residual saturation
    pub s_res: f64,
    /// Saturated saturation
    pub s_sat: f64,
}

impl VanGenuchten {
    /// Create and validate a parameter set.
    pub fn new(alpha: f64, n: f64, s_res: f64, s_sat: f64) -> Result<Self, ConfigError> {
        let vg = Self {
            alpha,
            n,
            s_res,
            s_sat,
        };
        vg.validate()?;
        Ok(vg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha > 0.0 && self.alpha.is_finite()) {
            return Err(ConfigError::InvalidVanGenuchten(format!(
                "alpha must be positive, got {}",
                self.alpha
            )));
        }
        if !(self.n > 1.0 && self.n.is_finite()) {
            return Err(ConfigError::InvalidVanGenuchten(format!(
                "n must be > 1, got {}",
                self.n
            )));
        }
        if !(0.0..=self.s_sat).contains(&self.s_res) || self.s_sat > 1.0 {
            return Err(ConfigError::InvalidVanGenuchten(format!(
                "need 0 <= s_res <= s_sat <= 1, got s_res={} s_sat={}",
                self.s_res, self.s_sat
            )));
        }
        Ok(())
    }

    #[inline]
    fn m(&self) -> f64 {
        1.0 - 1.0 / self.n
    }

    /// Capillary head for a negative pressure.
    #[inline]
    fn head(pressure: f64, density: f64, gravity: f64) -> f64 {
        let rho_g = density * gravity;
        if rho_g != 0.0 {
            pressure.abs() / rho_g
        } else {
            pressure.abs()
        }
    }
}

impl SaturationModel for VanGenuchten {
    fn saturation(&self, pressure: f64, density: f64, gravity: f64, _cell: CellIndex) -> f64 {
        if pressure >= 0.0 {
            return self.s_sat;
        }
        let ah = self.alpha * Self::head(pressure, density, gravity);
        (self.s_sat - self.s_res) / (1.0 + ah.powf(self.n)).powf(self.m()) + self.s_res
    }

    fn name(&self) -> &'static str {
        "van_genuchten"
    }
}

impl RelPermModel for VanGenuchten {
    fn relative_permeability(
        &self,
        pressure: f64,
        density: f64,
        gravity: f64,
        _cell: CellIndex,
    ) -> f64 {
        if pressure >= 0.0 {
            return 1.0;
        }
        let m = self.m();
        let ah = self.alpha * Self::head(pressure, density, gravity);
        let ahn = 1.0 + ah.powf(self.n);
        let num = 1.0 - ah.powf(self.n - 1.0) / ahn.powf(m);
        num * num / ahn.powf(m / 2.0)
    }

    fn name(&self) -> &'static str {
        "van_genuchten"
    }
}
