//! Internal boundary conditions: constraints on interior cells.

use serde::{Deserialize, Serialize};

use crate::grid::DistributedField;
use crate::types::CellIndex;

/// Correction applied to the residual after all face terms.
pub trait InternalBoundary: Send + Sync {
    /// Adjust `residual` in place using the current `pressure`.
    fn correct(&self, residual: &mut DistributedField, pressure: &DistributedField, time: f64);

    /// Name for logging.
    fn name(&self) -> &'static str;
}

/// No internal constraints.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInternalBoundary;

impl InternalBoundary for NoInternalBoundary {
    fn correct(&self, _residual: &mut DistributedField, _pressure: &DistributedField, _time: f64) {}

    fn name(&self) -> &'static str {
        "none"
    }
}

/// A cell held at a fixed pressure.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PressurePoint {
    pub cell: [i32; 3],
    pub pressure: f64,
}

impl PressurePoint {
    pub fn new(cell: CellIndex, pressure: f64) -> Self {
        Self {
            cell: cell.to_array(),
            pressure,
        }
    }
}

/// Fixed-pressure cells: the residual there becomes `p - value`.
///
/// Points outside every owned box are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InternalPressurePoints {
    pub points: Vec<PressurePoint>,
}

impl InternalPressurePoints {
    pub fn new(points: Vec<PressurePoint>) -> Self {
        Self { points }
    }

    pub fn with_point(mut self, cell: CellIndex, pressure: f64) -> Self {
        self.points.push(PressurePoint::new(cell, pressure));
        self
    }
}

impl InternalBoundary for InternalPressurePoints {
    fn correct(&self, residual: &mut DistributedField, pressure: &DistributedField, _time: f64) {
        for n in 0..residual.len() {
            let owned = residual.owned_box(n);
            for point in &self.points {
                let cell = CellIndex::from(point.cell);
                if owned.contains(cell) {
                    let p = pressure.subvector(n).get(cell);
                    residual.subvector_mut(n).set(cell, p - point.pressure);
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "pressure points"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Partition;

    #[test]
    fn test_pressure_points_override_residual() {
        let partition = Partition::split([4, 1, 1], [1.0; 3], [2, 1, 1]).unwrap();
        let pressure = DistributedField::from_fn(&partition, 1, |c| c.i as f64);
        let mut residual = DistributedField::constant(&partition, 1, 9.0);

        let points = InternalPressurePoints::default()
            .with_point(CellIndex::new(3, 0, 0), 1.0)
            .with_point(CellIndex::new(7, 0, 0), 1.0);
        points.correct(&mut residual, &pressure, 0.0);

        assert_eq!(residual.get(CellIndex::new(3, 0, 0)), Some(2.0));
        assert_eq!(residual.get(CellIndex::new(2, 0, 0)), Some(9.0));
    }

    #[test]
    fn test_no_internal_boundary_is_noop() {
        let partition = Partition::single([2, 2, 2], [1.0; 3]).unwrap();
        let pressure = DistributedField::new(&partition, 1);
        let mut residual = DistributedField::constant(&partition, 1, 4.0);
        let before = residual.clone();
        NoInternalBoundary.correct(&mut residual, &pressure, 0.0);
        assert_eq!(residual, before);
    }
}
