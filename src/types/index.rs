//! Structured-grid cell indices and index boxes.
//!
//! All indices are *global*: a cell keeps the same `(i, j, k)` no matter
//! which subgrid (or which ghost halo) it is viewed through.

use std::fmt;

use super::FaceNormal;

/// Global index of one grid cell.
///
/// # Example
///
/// ```
/// use richards_fv::types::{CellIndex, FaceNormal};
///
/// let c = CellIndex::new(3, 4, 5);
/// assert_eq!(c.step(FaceNormal::XUpper), CellIndex::new(4, 4, 5));
/// assert_eq!(c.column(), CellIndex::new(3, 4, 0));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellIndex {
    pub i: i32,
    pub j: i32,
    pub k: i32,
}

impl CellIndex {
    /// Create a new cell index.
    #[inline]
    pub const fn new(i: i32, j: i32, k: i32) -> Self {
        Self { i, j, k }
    }

    /// Shift by an arbitrary offset.
    #[inline]
    pub const fn offset(self, di: i32, dj: i32, dk: i32) -> Self {
        Self {
            i: self.i + di,
            j: self.j + dj,
            k: self.k + dk,
        }
    }

    /// The neighbouring cell across the face with the given outward normal.
    #[inline]
    pub fn step(self, normal: FaceNormal) -> Self {
        let [di, dj, dk] = normal.components();
        self.offset(di, dj, dk)
    }

    /// Index of this cell's column in a one-layer surface field.
    #[inline]
    pub const fn column(self) -> Self {
        Self {
            i: self.i,
            j: self.j,
            k: 0,
        }
    }

    /// Components as an array `[i, j, k]`.
    #[inline]
    pub const fn to_array(self) -> [i32; 3] {
        [self.i, self.j, self.k]
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.i, self.j, self.k)
    }
}

impl From<[i32; 3]> for CellIndex {
    #[inline]
    fn from([i, j, k]: [i32; 3]) -> Self {
        Self { i, j, k }
    }
}

/// Axis-aligned box of cells: a lower corner plus an extent per axis.
///
/// Cells are visited (and stored) with `i` fastest, then `j`, then `k`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IndexBox {
    /// Lowest cell of the box
    pub lower: CellIndex,
    /// Number of cells along x, y, z
    pub extent: [usize; 3],
}

impl IndexBox {
    /// Create a box from its lower corner and extent.
    pub const fn new(lower: CellIndex, extent: [usize; 3]) -> Self {
        Self { lower, extent }
    }

    /// Box with lower corner at the origin.
    pub const fn from_extent(extent: [usize; 3]) -> Self {
        Self::new(CellIndex::new(0, 0, 0), extent)
    }

    /// Highest cell of the box (inclusive).
    ///
    /// Meaningless for empty boxes.
    pub fn upper(&self) -> CellIndex {
        self.lower.offset(
            self.extent[0] as i32 - 1,
            self.extent[1] as i32 - 1,
            self.extent[2] as i32 - 1,
        )
    }

    /// Total number of cells.
    pub fn volume(&self) -> usize {
        self.extent.iter().product()
    }

    /// True if the box holds no cells.
    pub fn is_empty(&self) -> bool {
        self.volume() == 0
    }

    /// True if `cell` lies inside the box.
    #[inline]
    pub fn contains(&self, cell: CellIndex) -> bool {
        let c = cell.to_array();
        let lo = self.lower.to_array();
        (0..3).all(|a| c[a] >= lo[a] && ((c[a] - lo[a]) as usize) < self.extent[a])
    }

    /// True if the two boxes share at least one cell.
    pub fn intersects(&self, other: &IndexBox) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let (a_lo, a_hi) = (self.lower.to_array(), self.upper().to_array());
        let (b_lo, b_hi) = (other.lower.to_array(), other.upper().to_array());
        (0..3).all(|a| a_lo[a] <= b_hi[a] && b_lo[a] <= a_hi[a])
    }

    /// True if every cell of `other` lies inside this box.
    pub fn encloses(&self, other: &IndexBox) -> bool {
        other.is_empty() || (self.contains(other.lower) && self.contains(other.upper()))
    }

    /// Grow the box on both sides by `width[axis]` cells per axis.
    pub fn grow(&self, width: [usize; 3]) -> Self {
        Self {
            lower: self
                .lower
                .offset(-(width[0] as i32), -(width[1] as i32), -(width[2] as i32)),
            extent: [
                self.extent[0] + 2 * width[0],
                self.extent[1] + 2 * width[1],
                self.extent[2] + 2 * width[2],
            ],
        }
    }

    /// Grow the box by one cell on the low side of every axis.
    pub fn grow_lower(&self) -> Self {
        Self {
            lower: self.lower.offset(-1, -1, -1),
            extent: [self.extent[0] + 1, self.extent[1] + 1, self.extent[2] + 1],
        }
    }

    /// The one-layer footprint of this box at `k = 0`.
    pub fn footprint(&self) -> Self {
        Self {
            lower: self.lower.column(),
            extent: [self.extent[0], self.extent[1], 1],
        }
    }

    /// Iterate over all cells, `i` fastest.
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> + use<> {
        let lower = self.lower;
        let [nx, ny, nz] = self.extent;
        (0..nz as i32).flat_map(move |dk| {
            (0..ny as i32)
                .flat_map(move |dj| (0..nx as i32).map(move |di| lower.offset(di, dj, dk)))
        })
    }
}

impl fmt::Display for IndexBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} + {}x{}x{}",
            self.lower, self.extent[0], self.extent[1], self.extent[2]
        )
    }
}
