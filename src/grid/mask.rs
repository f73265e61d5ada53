//! Geometry masks: which cells belong to the simulated domain.

use crate::error::GridError;
use crate::types::{CellIndex, IndexBox};

/// Interior/exterior classification over global cell indices.
///
/// Every cell is exactly one of interior or exterior.
pub trait GeometryMask: Send + Sync {
    fn is_interior(&self, cell: CellIndex) -> bool;

    #[inline]
    fn is_exterior(&self, cell: CellIndex) -> bool {
        !self.is_interior(cell)
    }

    /// Name for logging.
    fn name(&self) -> &'static str;
}

/// Interior cells of `region`, visited `i` fastest.
pub fn interior_cells<'a>(
    mask: &'a dyn GeometryMask,
    region: IndexBox,
) -> impl Iterator<Item = CellIndex> + 'a {
    region.cells().filter(move |c| mask.is_interior(*c))
}

/// Exterior cells of `region`, visited `i` fastest.
pub fn exterior_cells<'a>(
    mask: &'a dyn GeometryMask,
    region: IndexBox,
) -> impl Iterator<Item = CellIndex> + 'a {
    region.cells().filter(move |c| mask.is_exterior(*c))
}

/// Mask whose interior is an index box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxMask {
    pub region: IndexBox,
}

impl BoxMask {
    pub fn new(region: IndexBox) -> Self {
        Self { region }
    }

    /// Whole global box `[0, extent)`.
    pub fn from_extent(extent: [usize; 3]) -> Self {
        Self::new(IndexBox::from_extent(extent))
    }
}

impl GeometryMask for BoxMask {
    #[inline]
    fn is_interior(&self, cell: CellIndex) -> bool {
        self.region.contains(cell)
    }

    fn name(&self) -> &'static str {
        "box"
    }
}

/// Mask built from a per-cell indicator over the global box.
///
/// Cells outside the global box are exterior.
///
/// # Example
///
/// ```
/// use richards_fv::grid::{GeometryMask, IndicatorMask};
/// use richards_fv::types::CellIndex;
///
/// // 2x1x1 domain, only the first cell carries indicator 1
/// let mask = IndicatorMask::from_indicator([2, 1, 1], &[1.0, 0.0], 1.0).unwrap();
/// assert!(mask.is_interior(CellIndex::new(0, 0, 0)));
/// assert!(mask.is_exterior(CellIndex::new(1, 0, 0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct IndicatorMask {
    global: IndexBox,
    interior: Vec<bool>,
}

impl IndicatorMask {
    /// Interior where `indicator == target`, `i` fastest ordering.
    pub fn from_indicator(
        global_extent: [usize; 3],
        indicator: &[f64],
        target: f64,
    ) -> Result<Self, GridError> {
        let global = IndexBox::from_extent(global_extent);
        if indicator.len() != global.volume() {
            return Err(GridError::length_mismatch(global.volume(), indicator.len()));
        }
        Ok(Self {
            global,
            interior: indicator.iter().map(|&v| v == target).collect(),
        })
    }

    /// Interior where `predicate(cell)` holds.
    pub fn from_fn<F>(global_extent: [usize; 3], predicate: F) -> Self
    where
        F: Fn(CellIndex) -> bool,
    {
        let global = IndexBox::from_extent(global_extent);
        Self {
            global,
            interior: global.cells().map(predicate).collect(),
        }
    }

    /// Number of interior cells.
    pub fn count_interior(&self) -> usize {
        self.interior.iter().filter(|&&w| w).count()
    }
}

impl GeometryMask for IndicatorMask {
    fn is_interior(&self, cell: CellIndex) -> bool {
        if !self.global.contains(cell) {
            return false;
        }
        let [nx, ny, _] = self.global.extent;
        let idx = cell.i as usize + nx * (cell.j as usize + ny * cell.k as usize);
        self.interior[idx]
    }

    fn name(&self) -> &'static str {
        "indicator"
    }
}
