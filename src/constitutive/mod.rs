//! Constitutive relations: density, saturation, relative permeability and
//! phase sources.
//!
//! The residual evaluator only sees these through the traits below, so any
//! model that implements them can be plugged in. All traits are
//! `Send + Sync` so the per-subgrid passes can run in parallel.
//!
//! # Example
//!
//! ```
//! use richards_fv::constitutive::{
//!     CompressibleDensity, Constitutive, NoSource, VanGenuchten,
//! };
//!
//! let density = CompressibleDensity::new(1.0, 1e-4);
//! let vg = VanGenuchten::new(2.0, 3.0, 0.1, 1.0).unwrap();
//! let models = Constitutive::new(&density, &vg, &vg, &NoSource);
//! assert_eq!(models.density.name(), "compressible");
//! ```

mod constant;
mod density;
mod source;
mod van_genuchten;

pub use constant::{ConstantRelPerm, ConstantSaturation};
pub use density::{CompressibleDensity, ConstantDensity};
pub use source::{BoxSource, CombinedSource, ConstantSource, NoSource};
pub use van_genuchten::VanGenuchten;

use crate::types::CellIndex;

/// Fluid density as a function of pressure.
pub trait DensityModel: Send + Sync {
    /// Density and its derivative with respect to pressure.
    fn density(&self, pressure: f64) -> (f64, f64);

    /// Density at the reference ("null") pressure.
    fn reference_density(&self) -> f64;

    /// Name for logging.
    fn name(&self) -> &'static str;
}

/// Water saturation as a function of pressure.
pub trait SaturationModel: Send + Sync {
    /// Saturation in `[0, 1]` at `cell`, given pressure, density and gravity.
    fn saturation(&self, pressure: f64, density: f64, gravity: f64, cell: CellIndex) -> f64;

    /// Name for logging.
    fn name(&self) -> &'static str;
}

/// Relative permeability as a function of pressure.
pub trait RelPermModel: Send + Sync {
    /// Relative permeability in `[0, 1]` at `cell`.
    fn relative_permeability(
        &self,
        pressure: f64,
        density: f64,
        gravity: f64,
        cell: CellIndex,
    ) -> f64;

    /// Name for logging.
    fn name(&self) -> &'static str;
}

/// Volumetric phase source (positive = injection), per unit volume and time.
pub trait PhaseSource: Send + Sync {
    fn source(&self, cell: CellIndex, time: f64) -> f64;

    /// Name for logging.
    fn name(&self) -> &'static str;
}

/// Bundle of the four constitutive capabilities used by one evaluation.
#[derive(Clone, Copy)]
pub struct Constitutive<'a> {
    pub density: &'a dyn DensityModel,
    pub saturation: &'a dyn SaturationModel,
    pub rel_perm: &'a dyn RelPermModel,
    pub source: &'a dyn PhaseSource,
}

impl<'a> Constitutive<'a> {
    pub fn new(
        density: &'a dyn DensityModel,
        saturation: &'a dyn SaturationModel,
        rel_perm: &'a dyn RelPermModel,
        source: &'a dyn PhaseSource,
    ) -> Self {
        Self {
            density,
            saturation,
            rel_perm,
            source,
        }
    }
}

impl std::fmt::Debug for Constitutive<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constitutive")
            .field("density", &self.density.name())
            .field("saturation", &self.saturation.name())
            .field("rel_perm", &self.rel_perm.name())
            .field("source", &self.source.name())
            .finish()
    }
}
