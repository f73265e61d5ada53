//! Error types for grid construction and configuration validation.
//!
//! Residual evaluation itself never fails; everything that can be checked
//! is checked when grids, fields and configs are built.

use thiserror::Error;

use crate::types::{CellIndex, IndexBox};

/// Errors raised while building partitions, fields or masks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Cell spacing must be strictly positive and finite.
    #[error("Invalid spacing: dx={dx}, dy={dy}, dz={dz} (all must be > 0)")]
    InvalidSpacing { dx: f64, dy: f64, dz: f64 },

    /// A subgrid or global box has a zero extent.
    #[error("Empty extent: {0:?}")]
    EmptyExtent([usize; 3]),

    /// A subgrid reaches outside the global index box.
    #[error("Subgrid {index} lies outside the global box {global}")]
    OutsideGlobal { index: IndexBox, global: IndexBox },

    /// Two subgrids share cells.
    #[error("Subgrids {first} and {second} overlap")]
    Overlap { first: IndexBox, second: IndexBox },

    /// A data slice does not match the buffer it is copied into.
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A partition was built with no subgrids.
    #[error("Partition has no subgrids")]
    EmptyPartition,

    /// A cell requested from a field is not stored by any subvector.
    #[error("Cell {0} is not stored in this field")]
    CellNotStored(CellIndex),

    /// Subgrids in one partition must share the same spacing.
    #[error("Subgrid spacing {found:?} differs from {expected:?}")]
    SpacingMismatch { expected: [f64; 3], found: [f64; 3] },

    /// The stencil assumes one refinement level across the partition.
    #[error("Subgrid refinement {found} differs from {expected}")]
    RefinementMismatch { expected: u32, found: u32 },
}

impl GridError {
    /// Create a length mismatch error.
    pub fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::LengthMismatch { expected, actual }
    }
}

/// Errors raised when validating configuration objects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Fluid viscosity must be positive.
    #[error("Viscosity must be positive, got {0}")]
    NonPositiveViscosity(f64),

    /// Gravity must be finite and non-negative.
    #[error("Gravity must be finite and >= 0, got {0}")]
    InvalidGravity(f64),

    /// A time cycle has no intervals.
    #[error("Time cycle has no intervals")]
    EmptyCycle,

    /// A time-cycle interval has zero or negative length.
    #[error("Time-cycle interval {index} has non-positive length {length}")]
    NonPositiveInterval { index: usize, length: f64 },

    /// Van Genuchten parameters out of range.
    #[error("Invalid van Genuchten parameters: {0}")]
    InvalidVanGenuchten(String),

    /// A volumetric rate only makes sense on a flux or overland patch.
    #[error("Volumetric values need a flux or overland patch, not a Dirichlet one")]
    VolumetricDirichlet,

    /// Global extents in the config disagree with the partition.
    #[error("Configured global extent {configured:?} does not match partition {partition:?}")]
    ExtentMismatch {
        configured: [usize; 2],
        partition: [usize; 2],
    },
}
