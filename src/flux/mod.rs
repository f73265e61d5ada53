//! Face flux functions for the subsurface stencil.
//!
//! - [`harmonic_mean`] and [`upstream_mean`]: face averages
//! - [`face_flux`]: two-point flux between neighbouring cells
//! - [`dirichlet_flux`]: one-sided flux to a prescribed boundary pressure

mod darcy;
mod means;

pub use darcy::{DarcyParams, FaceCell, dirichlet_flux, face_flux, vertical_potentials};
pub use means::{harmonic_mean, upstream_mean};
