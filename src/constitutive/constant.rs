//! Spatially uniform saturation and relative permeability.

use serde::{Deserialize, Serialize};

use super::{RelPermModel, SaturationModel};
use crate::types::CellIndex;

/// Saturation independent of pressure.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstantSaturation {
    pub value: f64,
}

impl ConstantSaturation {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Default for ConstantSaturation {
    fn default() -> Self {
        Self { value: 1.0 }
    }
}

impl SaturationModel for ConstantSaturation {
    #[inline]
    fn saturation(&self, _pressure: f64, _density: f64, _gravity: f64, _cell: CellIndex) -> f64 {
        self.value
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

/// Relative permeability independent of pressure.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstantRelPerm {
    pub value: f64,
}

impl ConstantRelPerm {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Default for ConstantRelPerm {
    fn default() -> Self {
        Self { value: 1.0 }
    }
}

impl RelPermModel for ConstantRelPerm {
    #[inline]
    fn relative_permeability(
        &self,
        _pressure: f64,
        _density: f64,
        _gravity: f64,
        _cell: CellIndex,
    ) -> f64 {
        self.value
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}
