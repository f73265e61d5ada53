//! Phase source terms.

use serde::{Deserialize, Serialize};

use super::PhaseSource;
use crate::types::{CellIndex, IndexBox};

/// No injection or extraction anywhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSource;

impl PhaseSource for NoSource {
    #[inline]
    fn source(&self, _cell: CellIndex, _time: f64) -> f64 {
        0.0
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// The same rate in every cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstantSource {
    pub rate: f64,
}

impl ConstantSource {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }
}

impl PhaseSource for ConstantSource {
    #[inline]
    fn source(&self, _cell: CellIndex, _time: f64) -> f64 {
        self.rate
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

/// A constant rate inside an index box, zero elsewhere (a simple well).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxSource {
    pub region: IndexBox,
    pub rate: f64,
}

impl BoxSource {
    pub fn new(region: IndexBox, rate: f64) -> Self {
        Self { region, rate }
    }
}

impl PhaseSource for BoxSource {
    #[inline]
    fn source(&self, cell: CellIndex, _time: f64) -> f64 {
        if self.region.contains(cell) {
            self.rate
        } else {
            0.0
        }
    }

    fn name(&self) -> &'static str {
        "box"
    }
}

/// Sum of several sources.
///
/// # Example
///
/// ```
/// use richards_fv::constitutive::{CombinedSource, ConstantSource, PhaseSource};
/// use richards_fv::types::CellIndex;
///
/// let a = ConstantSource::new(1.0);
/// let b = ConstantSource::new(-0.25);
/// let both = CombinedSource::new(vec![&a, &b]);
/// assert_eq!(both.source(CellIndex::new(0, 0, 0), 0.0), 0.75);
/// ```
pub struct CombinedSource<'a> {
    sources: Vec<&'a dyn PhaseSource>,
}

impl<'a> CombinedSource<'a> {
    pub fn new(sources: Vec<&'a dyn PhaseSource>) -> Self {
        Self { sources }
    }

    pub fn add(&mut self, source: &'a dyn PhaseSource) {
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl PhaseSource for CombinedSource<'_> {
    fn source(&self, cell: CellIndex, time: f64) -> f64 {
        self.sources.iter().map(|s| s.source(cell, time)).sum()
    }

    fn name(&self) -> &'static str {
        "combined"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_source() {
        let well = BoxSource::new(IndexBox::new(CellIndex::new(1, 1, 0), [1, 1, 2]), -2.0);
        assert_eq!(well.source(CellIndex::new(1, 1, 1), 0.0), -2.0);
        assert_eq!(well.source(CellIndex::new(0, 1, 1), 0.0), 0.0);
    }

    #[test]
    fn test_combined_source() {
        let well = BoxSource::new(IndexBox::from_extent([1, 1, 1]), 3.0);
        let recharge = ConstantSource::new(0.5);
        let mut combined = CombinedSource::new(vec![&well]);
        combined.add(&recharge);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.source(CellIndex::new(0, 0, 0), 1.0), 3.5);
        assert_eq!(combined.source(CellIndex::new(2, 0, 0), 1.0), 0.5);
        assert_eq!(NoSource.source(CellIndex::new(0, 0, 0), 1.0), 0.0);
    }
}
