//! Distributed fields: one dense buffer per subgrid with a ghost halo.
//!
//! Every buffer is indexed by *global* cell indices. Volume fields cover the
//! subgrid grown by the halo in all three axes; surface fields cover the
//! one-layer footprint (`k = 0`) grown in x and y only.

use crate::error::GridError;
use crate::grid::Partition;
use crate::types::{CellIndex, IndexBox};

/// Storage layout of a distributed field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldLayout {
    /// Full 3-D cells
    Volume,
    /// One layer per column, indexed with `k = 0`
    Surface,
}

/// Dense per-subgrid buffer covering `data_box`, `i` fastest.
#[derive(Clone, Debug, PartialEq)]
pub struct Subvector {
    data_box: IndexBox,
    data: Vec<f64>,
}

impl Subvector {
    /// Allocate a buffer filled with `value`.
    pub fn new(data_box: IndexBox, value: f64) -> Self {
        Self {
            data_box,
            data: vec![value; data_box.volume()],
        }
    }

    /// Box of cells stored in this buffer (owned cells plus halo).
    #[inline]
    pub fn data_box(&self) -> IndexBox {
        self.data_box
    }

    /// Offset of `cell` in the linear buffer.
    #[inline]
    pub fn index(&self, cell: CellIndex) -> usize {
        debug_assert!(
            self.data_box.contains(cell),
            "cell {} outside buffer {}",
            cell,
            self.data_box
        );
        let lo = self.data_box.lower;
        let [nx, ny, _] = self.data_box.extent;
        let di = (cell.i - lo.i) as usize;
        let dj = (cell.j - lo.j) as usize;
        let dk = (cell.k - lo.k) as usize;
        di + nx * (dj + ny * dk)
    }

    /// Linear offset between `j` and `j + 1`.
    #[inline]
    pub fn stride_y(&self) -> usize {
        self.data_box.extent[0]
    }

    /// Linear offset between `k` and `k + 1`.
    #[inline]
    pub fn stride_z(&self) -> usize {
        self.data_box.extent[0] * self.data_box.extent[1]
    }

    #[inline]
    pub fn contains(&self, cell: CellIndex) -> bool {
        self.data_box.contains(cell)
    }

    #[inline]
    pub fn get(&self, cell: CellIndex) -> f64 {
        self.data[self.index(cell)]
    }

    #[inline]
    pub fn set(&mut self, cell: CellIndex, value: f64) {
        let idx = self.index(cell);
        self.data[idx] = value;
    }

    #[inline]
    pub fn add(&mut self, cell: CellIndex, value: f64) {
        let idx = self.index(cell);
        self.data[idx] += value;
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

/// A field distributed over the subgrids of one [`Partition`].
///
/// # Example
///
/// ```
/// use richards_fv::grid::{DistributedField, Partition};
/// use richards_fv::types::CellIndex;
///
/// let partition = Partition::single([4, 4, 2], [1.0, 1.0, 1.0]).unwrap();
/// let mut p = DistributedField::constant(&partition, 1, -0.5);
/// p.set(CellIndex::new(0, 0, 0), 2.0);
/// assert_eq!(p.get(CellIndex::new(0, 0, 0)), Some(2.0));
/// // ghost cells are stored too
/// assert_eq!(p.get(CellIndex::new(-1, 0, 0)), Some(-0.5));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DistributedField {
    layout: FieldLayout,
    ghost: usize,
    owned: Vec<IndexBox>,
    subvectors: Vec<Subvector>,
}

impl DistributedField {
    /// Zero volume field with a halo of `ghost` cells.
    pub fn new(partition: &Partition, ghost: usize) -> Self {
        Self::constant(partition, ghost, 0.0)
    }

    /// Zero surface field with a halo of `ghost` cells in x and y.
    pub fn new_surface(partition: &Partition, ghost: usize) -> Self {
        Self::surface_constant(partition, ghost, 0.0)
    }

    pub fn constant(partition: &Partition, ghost: usize, value: f64) -> Self {
        Self::allocate(partition, FieldLayout::Volume, ghost, value)
    }

    pub fn surface_constant(partition: &Partition, ghost: usize, value: f64) -> Self {
        Self::allocate(partition, FieldLayout::Surface, ghost, value)
    }

    /// Volume field with every stored cell (ghosts included) set to `f(cell)`.
    pub fn from_fn<F>(partition: &Partition, ghost: usize, f: F) -> Self
    where
        F: Fn(CellIndex) -> f64,
    {
        let mut field = Self::new(partition, ghost);
        field.fill_with(f);
        field
    }

    /// Surface field with every stored column set to `f(column)`.
    pub fn surface_from_fn<F>(partition: &Partition, ghost: usize, f: F) -> Self
    where
        F: Fn(CellIndex) -> f64,
    {
        let mut field = Self::new_surface(partition, ghost);
        field.fill_with(f);
        field
    }

    fn allocate(partition: &Partition, layout: FieldLayout, ghost: usize, value: f64) -> Self {
        let (owned, subvectors) = partition
            .subgrids()
            .iter()
            .map(|sg| {
                let (owned, data_box) = match layout {
                    FieldLayout::Volume => (sg.bounds, sg.bounds.grow([ghost; 3])),
                    FieldLayout::Surface => {
                        let fp = sg.surface();
                        (fp, fp.grow([ghost, ghost, 0]))
                    }
                };
                (owned, Subvector::new(data_box, value))
            })
            .unzip();
        Self {
            layout,
            ghost,
            owned,
            subvectors,
        }
    }

    /// Same layout, all zeros.
    pub fn zeros_like(&self) -> Self {
        let mut field = self.clone();
        field.fill(0.0);
        field
    }

    pub fn layout(&self) -> FieldLayout {
        self.layout
    }

    /// Halo width.
    pub fn ghost(&self) -> usize {
        self.ghost
    }

    /// Number of subvectors (one per subgrid).
    pub fn len(&self) -> usize {
        self.subvectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subvectors.is_empty()
    }

    /// Cells owned by subvector `index` (its subgrid box, or footprint).
    pub fn owned_box(&self, index: usize) -> IndexBox {
        self.owned[index]
    }

    pub fn subvector(&self, index: usize) -> &Subvector {
        &self.subvectors[index]
    }

    pub fn subvector_mut(&mut self, index: usize) -> &mut Subvector {
        &mut self.subvectors[index]
    }

    pub fn subvectors(&self) -> &[Subvector] {
        &self.subvectors
    }

    pub fn subvectors_mut(&mut self) -> &mut [Subvector] {
        &mut self.subvectors
    }

    /// True if both fields have identical layout, halo and buffer boxes.
    pub fn same_layout(&self, other: &DistributedField) -> bool {
        self.layout == other.layout
            && self.ghost == other.ghost
            && self.owned == other.owned
            && self
                .subvectors
                .iter()
                .zip(&other.subvectors)
                .all(|(a, b)| a.data_box == b.data_box)
    }

    /// Value at `cell`, preferring the owning subvector over ghost copies.
    pub fn get(&self, cell: CellIndex) -> Option<f64> {
        self.owned
            .iter()
            .position(|b| b.contains(cell))
            .or_else(|| self.subvectors.iter().position(|s| s.contains(cell)))
            .map(|n| self.subvectors[n].get(cell))
    }

    /// Write `value` into every stored copy of `cell`; returns the number of
    /// copies written.
    pub fn set(&mut self, cell: CellIndex, value: f64) -> usize {
        let mut copies = 0;
        for sv in self.subvectors.iter_mut().filter(|s| s.contains(cell)) {
            sv.set(cell, value);
            copies += 1;
        }
        copies
    }

    /// Like [`set`](Self::set) but fails when no buffer stores `cell`.
    pub fn try_set(&mut self, cell: CellIndex, value: f64) -> Result<(), GridError> {
        match self.set(cell, value) {
            0 => Err(GridError::CellNotStored(cell)),
            _ => Ok(()),
        }
    }

    pub fn fill(&mut self, value: f64) {
        for sv in &mut self.subvectors {
            sv.fill(value);
        }
    }

    /// Overwrite every stored cell with `f(cell)`.
    pub fn fill_with<F>(&mut self, f: F)
    where
        F: Fn(CellIndex) -> f64,
    {
        for sv in &mut self.subvectors {
            let data_box = sv.data_box;
            for (slot, cell) in sv.data.iter_mut().zip(data_box.cells()) {
                *slot = f(cell);
            }
        }
    }

    /// Copy owned cells from a global `i`-fastest array of the given extent.
    pub fn set_owned_from_slice(
        &mut self,
        global_extent: [usize; 3],
        values: &[f64],
    ) -> Result<(), GridError> {
        let expected: usize = global_extent.iter().product();
        if values.len() != expected {
            return Err(GridError::length_mismatch(expected, values.len()));
        }
        let global = IndexBox::from_extent(global_extent);
        for (owned, sv) in self.owned.iter().zip(&mut self.subvectors) {
            for cell in owned.cells() {
                if !global.contains(cell) {
                    return Err(GridError::CellNotStored(cell));
                }
                let g = cell.i as usize
                    + global_extent[0] * (cell.j as usize + global_extent[1] * cell.k as usize);
                sv.set(cell, values[g]);
            }
        }
        Ok(())
    }

    /// `(cell, value)` for every owned cell, subvector by subvector.
    pub fn owned_values(&self) -> impl Iterator<Item = (CellIndex, f64)> + '_ {
        self.owned
            .iter()
            .zip(&self.subvectors)
            .flat_map(|(owned, sv)| owned.cells().map(move |c| (c, sv.get(c))))
    }

    /// Largest absolute value over owned cells.
    pub fn max_abs(&self) -> f64 {
        self.owned_values().fold(0.0, |m, (_, v)| m.max(v.abs()))
    }

    /// True if every owned value is finite.
    pub fn is_finite(&self) -> bool {
        self.owned_values().all(|(_, v)| v.is_finite())
    }
}
