//! Subgrids and the structured partition of the computational domain.

use std::fmt;

use crate::error::GridError;
use crate::types::{CellIndex, IndexBox};

/// One axis-aligned block of cells owned by this process.
///
/// The refinement level is a single scalar shared by all three axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Subgrid {
    /// Owned cells in global indices
    pub bounds: IndexBox,
    /// Refinement level (identical in x, y, z)
    pub refinement: u32,
    /// Cell spacing [dx, dy, dz]
    pub spacing: [f64; 3],
}

impl Subgrid {
    /// Create a subgrid at refinement level 0.
    ///
    /// Fails if any spacing is not a positive finite number or any extent
    /// is zero.
    pub fn new(lower: CellIndex, extent: [usize; 3], spacing: [f64; 3]) -> Result<Self, GridError> {
        if spacing.iter().any(|&h| !(h.is_finite() && h > 0.0)) {
            return Err(GridError::InvalidSpacing {
                dx: spacing[0],
                dy: spacing[1],
                dz: spacing[2],
            });
        }
        if extent.contains(&0) {
            return Err(GridError::EmptyExtent(extent));
        }
        Ok(Self {
            bounds: IndexBox::new(lower, extent),
            refinement: 0,
            spacing,
        })
    }

    /// Set the refinement level.
    pub fn with_refinement(mut self, level: u32) -> Self {
        self.refinement = level;
        self
    }

    #[inline]
    pub fn dx(&self) -> f64 {
        self.spacing[0]
    }

    #[inline]
    pub fn dy(&self) -> f64 {
        self.spacing[1]
    }

    #[inline]
    pub fn dz(&self) -> f64 {
        self.spacing[2]
    }

    /// Cell volume `dx * dy * dz`.
    #[inline]
    pub fn cell_volume(&self) -> f64 {
        self.spacing[0] * self.spacing[1] * self.spacing[2]
    }

    /// Face areas normal to x, y, z: `[dy*dz, dx*dz, dx*dy]`.
    #[inline]
    pub fn face_areas(&self) -> [f64; 3] {
        let [dx, dy, dz] = self.spacing;
        [dy * dz, dx * dz, dx * dy]
    }

    /// The one-layer surface footprint of this subgrid.
    pub fn surface(&self) -> IndexBox {
        self.bounds.footprint()
    }
}

impl fmt::Display for Subgrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Subgrid[{} r={} h=({}, {}, {})]",
            self.bounds, self.refinement, self.spacing[0], self.spacing[1], self.spacing[2]
        )
    }
}

/// The set of subgrids local to this process plus the global extents.
///
/// Subgrids lie inside the global box, never overlap and share one spacing
/// and refinement level; all of this is checked at construction.
///
/// # Example
///
/// ```
/// use richards_fv::grid::Partition;
///
/// let partition = Partition::split([8, 4, 3], [1.0, 1.0, 0.5], [2, 1, 1]).unwrap();
/// assert_eq!(partition.len(), 2);
/// assert_eq!(partition.global_extent(), [8, 4, 3]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Partition {
    subgrids: Vec<Subgrid>,
    global: IndexBox,
}

impl Partition {
    /// Build a partition from explicit subgrids.
    pub fn new(subgrids: Vec<Subgrid>, global_extent: [usize; 3]) -> Result<Self, GridError> {
        if subgrids.is_empty() {
            return Err(GridError::EmptyPartition);
        }
        if global_extent.contains(&0) {
            return Err(GridError::EmptyExtent(global_extent));
        }
        let global = IndexBox::from_extent(global_extent);
        let spacing = subgrids[0].spacing;
        let refinement = subgrids[0].refinement;

        for (n, sg) in subgrids.iter().enumerate() {
            if !global.encloses(&sg.bounds) {
                return Err(GridError::OutsideGlobal {
                    index: sg.bounds,
                    global,
                });
            }
            if sg.spacing != spacing {
                return Err(GridError::SpacingMismatch {
                    expected: spacing,
                    found: sg.spacing,
                });
            }
            if sg.refinement != refinement {
                return Err(GridError::RefinementMismatch {
                    expected: refinement,
                    found: sg.refinement,
                });
            }
            if let Some(other) = subgrids[..n].iter().find(|o| o.bounds.intersects(&sg.bounds)) {
                return Err(GridError::Overlap {
                    first: other.bounds,
                    second: sg.bounds,
                });
            }
        }

        Ok(Self { subgrids, global })
    }

    /// One subgrid covering the whole global box.
    pub fn single(extent: [usize; 3], spacing: [f64; 3]) -> Result<Self, GridError> {
        let sg = Subgrid::new(CellIndex::new(0, 0, 0), extent, spacing)?;
        Self::new(vec![sg], extent)
    }

    /// Split the global box into `pieces[0] x pieces[1] x pieces[2]` blocks.
    ///
    /// Leftover cells go to the leading blocks along each axis.
    pub fn split(
        extent: [usize; 3],
        spacing: [f64; 3],
        pieces: [usize; 3],
    ) -> Result<Self, GridError> {
        if extent.contains(&0) {
            return Err(GridError::EmptyExtent(extent));
        }
        let ranges: Vec<Vec<(usize, usize)>> = (0..3)
            .map(|a| split_range(extent[a], pieces[a].clamp(1, extent[a])))
            .collect();

        let mut subgrids = Vec::new();
        for &(z0, nz) in &ranges[2] {
            for &(y0, ny) in &ranges[1] {
                for &(x0, nx) in &ranges[0] {
                    subgrids.push(Subgrid::new(
                        CellIndex::new(x0 as i32, y0 as i32, z0 as i32),
                        [nx, ny, nz],
                        spacing,
                    )?);
                }
            }
        }
        Self::new(subgrids, extent)
    }

    /// Global box `[0, NX) x [0, NY) x [0, NZ)`.
    pub fn global_box(&self) -> IndexBox {
        self.global
    }

    /// Global extents `[NX, NY, NZ]`.
    pub fn global_extent(&self) -> [usize; 3] {
        self.global.extent
    }

    /// Cell spacing shared by all subgrids.
    pub fn spacing(&self) -> [f64; 3] {
        self.subgrids[0].spacing
    }

    pub fn subgrids(&self) -> &[Subgrid] {
        &self.subgrids
    }

    pub fn subgrid(&self, index: usize) -> &Subgrid {
        &self.subgrids[index]
    }

    pub fn len(&self) -> usize {
        self.subgrids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subgrids.is_empty()
    }

    /// Position of the subgrid owning `cell`, if any.
    pub fn owner_of(&self, cell: CellIndex) -> Option<usize> {
        self.subgrids.iter().position(|sg| sg.bounds.contains(cell))
    }
}

/// Split `n` cells into `parts` contiguous `(start, len)` ranges.
fn split_range(n: usize, parts: usize) -> Vec<(usize, usize)> {
    let base = n / parts;
    let extra = n % parts;
    let mut start = 0;
    (0..parts)
        .map(|p| {
            let len = base + usize::from(p < extra);
            let range = (start, len);
            start += len;
            range
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subgrid_rejects_bad_spacing() {
        let err = Subgrid::new(CellIndex::new(0, 0, 0), [2, 2, 2], [1.0, 0.0, 1.0]);
        assert!(matches!(err, Err(GridError::InvalidSpacing { .. })));
        let err = Subgrid::new(CellIndex::new(0, 0, 0), [2, 2, 2], [1.0, f64::NAN, 1.0]);
        assert!(matches!(err, Err(GridError::InvalidSpacing { .. })));
    }

    #[test]
    fn test_subgrid_rejects_empty_extent() {
        let err = Subgrid::new(CellIndex::new(0, 0, 0), [2, 0, 2], [1.0; 3]);
        assert_eq!(err, Err(GridError::EmptyExtent([2, 0, 2])));
    }

    #[test]
    fn test_subgrid_geometry() {
        let sg = Subgrid::new(CellIndex::new(0, 0, 0), [1, 1, 1], [2.0, 3.0, 0.5]).unwrap();
        assert_eq!(sg.cell_volume(), 3.0);
        assert_eq!(sg.face_areas(), [1.5, 1.0, 6.0]);
        assert_eq!(sg.with_refinement(2).refinement, 2);
    }

    #[test]
    fn test_partition_rejects_overlap() {
        let a = Subgrid::new(CellIndex::new(0, 0, 0), [3, 2, 1], [1.0; 3]).unwrap();
        let b = Subgrid::new(CellIndex::new(2, 0, 0), [2, 2, 1], [1.0; 3]).unwrap();
        let err = Partition::new(vec![a, b], [4, 2, 1]);
        assert!(matches!(err, Err(GridError::Overlap { .. })));
    }

    #[test]
    fn test_partition_rejects_mixed_refinement() {
        let a = Subgrid::new(CellIndex::new(0, 0, 0), [2, 2, 1], [1.0; 3]).unwrap();
        let b = Subgrid::new(CellIndex::new(2, 0, 0), [2, 2, 1], [1.0; 3]).unwrap();
        let err = Partition::new(vec![a, b.with_refinement(1)], [4, 2, 1]);
        assert_eq!(
            err,
            Err(GridError::RefinementMismatch {
                expected: 0,
                found: 1
            })
        );
        let ok = Partition::new(vec![a.with_refinement(1), b.with_refinement(1)], [4, 2, 1]);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_partition_rejects_outside() {
        let a = Subgrid::new(CellIndex::new(0, 0, 0), [5, 2, 1], [1.0; 3]).unwrap();
        let err = Partition::new(vec![a], [4, 2, 1]);
        assert!(matches!(err, Err(GridError::OutsideGlobal { .. })));
    }

    #[test]
    fn test_split_covers_domain() {
        let p = Partition::split([5, 4, 2], [1.0; 3], [2, 2, 1]).unwrap();
        assert_eq!(p.len(), 4);
        let total: usize = p.subgrids().iter().map(|s| s.bounds.volume()).sum();
        assert_eq!(total, 40);
        assert_eq!(p.subgrid(0).bounds.extent, [3, 2, 2]);
        assert_eq!(p.subgrid(1).bounds.extent, [2, 2, 2]);
        assert_eq!(p.owner_of(CellIndex::new(4, 3, 1)), Some(3));
        assert_eq!(p.owner_of(CellIndex::new(5, 0, 0)), None);
    }
}
