//! Boundary conditions for the subsurface residual.
//!
//! Boundary data arrives as a [`BoundaryPatchSet`]: named patches, each
//! with one [`BoundaryKind`] and, per subgrid, a list of boundary faces
//! plus the values prescribed on them. A [`BoundaryBuilder`] produces the
//! set for a given partition, mask and time.
//!
//! # Boundary kinds
//!
//! | Kind | Value | Effect on the residual |
//! |------|-------|------------------------|
//! | `Dirichlet` | pressure | ghost pressure set to the value, one-sided flux replaces the stencil flux |
//! | `Flux` | flux along +axis | stencil flux replaced by `area * value` |
//! | `Overland` | flux along +axis | as `Flux`, plus kinematic-wave routing on `+z` faces |
//!
//! Internal (non-face) constraints go through [`InternalBoundary`].

mod internal;
mod side_patches;

pub use internal::{InternalBoundary, InternalPressurePoints, NoInternalBoundary, PressurePoint};
pub use side_patches::{PatchCondition, PatchValue, SidePatchBuilder, TimeCycle, TimeInterval};

use serde::{Deserialize, Serialize};

use crate::grid::{GeometryMask, Partition};
use crate::types::{CellIndex, FaceNormal};

/// Kind of a boundary patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    /// Prescribed pressure
    Dirichlet,
    /// Prescribed normal flux
    Flux,
    /// Prescribed flux plus overland routing on the land surface
    Overland,
}

impl std::fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BoundaryKind::Dirichlet => "dirichlet",
            BoundaryKind::Flux => "flux",
            BoundaryKind::Overland => "overland",
        };
        f.write_str(name)
    }
}

/// One boundary face: an interior cell and the outward normal of the face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundaryFace {
    pub cell: CellIndex,
    pub normal: FaceNormal,
    /// Index into the owning [`PatchFaces::values`]
    pub value_index: usize,
}

impl BoundaryFace {
    /// The cell across the face (a ghost for domain boundaries).
    #[inline]
    pub fn neighbor(&self) -> CellIndex {
        self.cell.step(self.normal)
    }
}

/// Faces and values of one patch on one subgrid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatchFaces {
    pub faces: Vec<BoundaryFace>,
    pub values: Vec<f64>,
}

impl PatchFaces {
    /// Append a face with its own value.
    pub fn push(&mut self, cell: CellIndex, normal: FaceNormal, value: f64) {
        self.faces.push(BoundaryFace {
            cell,
            normal,
            value_index: self.values.len(),
        });
        self.values.push(value);
    }

    /// Value prescribed on `face`.
    #[inline]
    pub fn value(&self, face: &BoundaryFace) -> f64 {
        self.values[face.value_index]
    }

    /// Faces paired with their values.
    pub fn iter(&self) -> impl Iterator<Item = (&BoundaryFace, f64)> {
        self.faces.iter().map(move |f| (f, self.value(f)))
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// A named boundary patch with one kind, split by subgrid.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryPatch {
    pub name: String,
    pub kind: BoundaryKind,
    /// One entry per subgrid of the partition, in partition order
    pub per_subgrid: Vec<PatchFaces>,
}

impl BoundaryPatch {
    /// Empty patch for a partition with `num_subgrids` subgrids.
    pub fn new(name: impl Into<String>, kind: BoundaryKind, num_subgrids: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            per_subgrid: vec![PatchFaces::default(); num_subgrids],
        }
    }

    /// Add a face to subgrid `subgrid`.
    pub fn push(&mut self, subgrid: usize, cell: CellIndex, normal: FaceNormal, value: f64) {
        self.per_subgrid[subgrid].push(cell, normal, value);
    }

    /// Faces on subgrid `subgrid`, `None` if the patch has no entry for it.
    pub fn faces_on(&self, subgrid: usize) -> Option<&PatchFaces> {
        self.per_subgrid.get(subgrid)
    }

    /// Total number of faces over all subgrids.
    pub fn num_faces(&self) -> usize {
        self.per_subgrid.iter().map(PatchFaces::len).sum()
    }
}

/// All boundary patches for one evaluation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundaryPatchSet {
    pub patches: Vec<BoundaryPatch>,
}

impl BoundaryPatchSet {
    pub fn new(patches: Vec<BoundaryPatch>) -> Self {
        Self { patches }
    }

    pub fn push(&mut self, patch: BoundaryPatch) {
        self.patches.push(patch);
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundaryPatch> {
        self.patches.iter()
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Patches of the given kind.
    pub fn of_kind(&self, kind: BoundaryKind) -> impl Iterator<Item = &BoundaryPatch> {
        self.patches.iter().filter(move |p| p.kind == kind)
    }

    /// True if any patch routes overland flow.
    pub fn has_overland(&self) -> bool {
        self.of_kind(BoundaryKind::Overland).next().is_some()
    }
}

/// Produces the boundary patch set for a partition, mask and time.
pub trait BoundaryBuilder: Send + Sync {
    fn build(
        &self,
        partition: &Partition,
        mask: &dyn GeometryMask,
        time: f64,
    ) -> BoundaryPatchSet;

    /// Name for logging.
    fn name(&self) -> &'static str;
}

/// A precomputed patch set is its own (time-independent) builder.
impl BoundaryBuilder for BoundaryPatchSet {
    fn build(
        &self,
        _partition: &Partition,
        _mask: &dyn GeometryMask,
        _time: f64,
    ) -> BoundaryPatchSet {
        self.clone()
    }

    fn name(&self) -> &'static str {
        "fixed patch set"
    }
}
