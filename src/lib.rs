//! # richards-fv
//!
//! Nonlinear residual evaluation for variably-saturated subsurface flow
//! (Richards' equation) coupled to kinematic-wave overland flow, on a
//! structured grid split into subgrids.
//!
//! This crate provides the building blocks a Newton-Krylov time stepper
//! needs for one implicit step:
//! - Index boxes, subgrid partitions and ghosted distributed fields
//! - Active-domain masks and halo exchange
//! - Pluggable constitutive relations (density, saturation, relative
//!   permeability, sources)
//! - Two-point Darcy fluxes with harmonic permeability and upstream mobility
//! - Side boundary patches: Dirichlet, flux and overland
//! - Kinematic-wave overland routing with Manning's law
//! - The residual assembler tying it all together
//!
//! With the `parallel` feature, per-subgrid passes run on rayon.

pub mod boundary;
pub mod constitutive;
pub mod error;
pub mod flux;
pub mod grid;
pub mod overland;
pub mod problem;
pub mod residual;
pub mod types;

// Re-export main types for convenience
pub use boundary::{
    BoundaryBuilder, BoundaryKind, BoundaryPatchSet, InternalBoundary, InternalPressurePoints,
    PatchCondition, PatchValue, SidePatchBuilder, TimeCycle,
};
pub use constitutive::{
    CompressibleDensity, ConstantDensity, ConstantRelPerm, ConstantSaturation, Constitutive,
    DensityModel, PhaseSource, RelPermModel, SaturationModel, VanGenuchten,
};
pub use error::{ConfigError, GridError};
pub use grid::{
    BoxMask, DistributedField, GeometryMask, HaloExchange, IndicatorMask, LocalHaloExchange,
    Partition, Subgrid, Subvector,
};
pub use problem::{ProblemData, SiteProperties};
pub use residual::{ResidualAssembler, ResidualConfig, ResidualEvaluation, ResidualState};
pub use types::{Axis, BoxSides, CellIndex, FaceNormal, IndexBox};
