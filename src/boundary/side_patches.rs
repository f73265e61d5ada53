//! Boundary patches on the six sides of a masked domain.
//!
//! A face belongs to a side patch when its cell is interior and the
//! neighbour across that side is exterior. Each side carries a
//! [`PatchCondition`]: a kind plus a value law that may vary in time
//! ([`TimeCycle`]), with depth (hydrostatic equilibrium) or with the size
//! of the patch (a volumetric rate).

use log::trace;
use serde::{Deserialize, Serialize};

use super::{BoundaryBuilder, BoundaryKind, BoundaryPatch, BoundaryPatchSet};
use crate::constitutive::DensityModel;
use crate::error::ConfigError;
use crate::grid::{GeometryMask, Partition, interior_cells};
use crate::types::{BoxSides, CellIndex, FaceNormal};

/// One piece of a piecewise-constant time series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub length: f64,
    pub value: f64,
}

/// Piecewise-constant values over consecutive intervals starting at t = 0.
///
/// With `repeat` the sequence restarts after the last interval; without it
/// the last value holds forever.
///
/// # Example
///
/// ```
/// use richards_fv::boundary::{TimeCycle, TimeInterval};
///
/// let rain = TimeCycle::repeating(vec![
///     TimeInterval { length: 1.0, value: -0.005 },
///     TimeInterval { length: 3.0, value: 0.0 },
/// ]);
/// assert_eq!(rain.value_at(0.5), -0.005);
/// assert_eq!(rain.value_at(2.0), 0.0);
/// assert_eq!(rain.value_at(4.5), -0.005);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeCycle {
    pub intervals: Vec<TimeInterval>,
    #[serde(default)]
    pub repeat: bool,
}

impl TimeCycle {
    pub fn repeating(intervals: Vec<TimeInterval>) -> Self {
        Self {
            intervals,
            repeat: true,
        }
    }

    pub fn once(intervals: Vec<TimeInterval>) -> Self {
        Self {
            intervals,
            repeat: false,
        }
    }

    /// Total length of one pass through the intervals.
    pub fn period(&self) -> f64 {
        self.intervals.iter().map(|iv| iv.length).sum()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.intervals.is_empty() {
            return Err(ConfigError::EmptyCycle);
        }
        for (index, iv) in self.intervals.iter().enumerate() {
            if !(iv.length > 0.0 && iv.length.is_finite()) {
                return Err(ConfigError::NonPositiveInterval {
                    index,
                    length: iv.length,
                });
            }
        }
        Ok(())
    }

    /// Value active at `time`. An empty cycle yields 0.
    pub fn value_at(&self, time: f64) -> f64 {
        let Some(last) = self.intervals.last() else {
            return 0.0;
        };
        let t = if self.repeat {
            time.rem_euclid(self.period())
        } else {
            time
        };

        let mut end = 0.0;
        for iv in &self.intervals {
            end += iv.length;
            if t < end {
                return iv.value;
            }
        }
        last.value
    }
}

/// How the value on a side patch is obtained.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PatchValue {
    /// Same value everywhere, at all times
    Constant { value: f64 },
    /// Piecewise-constant in time
    Cycle(TimeCycle),
    /// Hydrostatic pressure `p_ref - rho_ref * g * (z - z_ref)` at the cell centre
    Hydrostatic {
        reference_pressure: f64,
        reference_elevation: f64,
    },
    /// Total flow rate along +axis, spread evenly over the patch faces
    Volumetric { rate: f64 },
}

impl PatchValue {
    pub fn constant(value: f64) -> Self {
        PatchValue::Constant { value }
    }

    pub fn hydrostatic(reference_pressure: f64, reference_elevation: f64) -> Self {
        PatchValue::Hydrostatic {
            reference_pressure,
            reference_elevation,
        }
    }

    pub fn volumetric(rate: f64) -> Self {
        PatchValue::Volumetric { rate }
    }

    /// Evaluate at cell-centre elevation `z` and `time`.
    ///
    /// A volumetric value yields its total rate; the builder divides it by
    /// the patch area.
    pub fn value_at(&self, z: f64, time: f64, gravity: f64, reference_density: f64) -> f64 {
        match self {
            PatchValue::Constant { value } => *value,
            PatchValue::Cycle(cycle) => cycle.value_at(time),
            PatchValue::Hydrostatic {
                reference_pressure,
                reference_elevation,
            } => reference_pressure - reference_density * gravity * (z - reference_elevation),
            PatchValue::Volumetric { rate } => *rate,
        }
    }
}

/// Kind and value law of one side patch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchCondition {
    pub kind: BoundaryKind,
    pub value: PatchValue,
}

impl PatchCondition {
    pub fn new(kind: BoundaryKind, value: PatchValue) -> Self {
        Self { kind, value }
    }

    /// Constant prescribed pressure.
    pub fn dirichlet(pressure: f64) -> Self {
        Self::new(BoundaryKind::Dirichlet, PatchValue::constant(pressure))
    }

    /// Constant prescribed flux along +axis.
    pub fn flux(value: f64) -> Self {
        Self::new(BoundaryKind::Flux, PatchValue::constant(value))
    }

    /// Constant flux with overland routing.
    pub fn overland(value: f64) -> Self {
        Self::new(BoundaryKind::Overland, PatchValue::constant(value))
    }

    /// Zero-flux wall.
    pub fn no_flow() -> Self {
        Self::flux(0.0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.value {
            PatchValue::Cycle(cycle) => cycle.validate(),
            PatchValue::Volumetric { .. } if self.kind == BoundaryKind::Dirichlet => {
                Err(ConfigError::VolumetricDirichlet)
            }
            _ => Ok(()),
        }
    }
}

impl Default for PatchCondition {
    fn default() -> Self {
        Self::no_flow()
    }
}

/// Builds one patch per side of the masked domain.
///
/// Patches are named `x_lower`, `x_upper`, `y_lower`, `y_upper`,
/// `z_lower`, `z_upper`, in that order.
///
/// # Example
///
/// ```
/// use richards_fv::boundary::{BoundaryBuilder, PatchCondition, SidePatchBuilder};
/// use richards_fv::grid::{BoxMask, Partition};
/// use richards_fv::types::BoxSides;
///
/// let sides = BoxSides {
///     z_upper: PatchCondition::overland(-1e-4),
///     ..BoxSides::default()
/// };
/// let builder = SidePatchBuilder::new(sides);
/// let partition = Partition::single([3, 2, 4], [1.0, 1.0, 0.5]).unwrap();
/// let patches = builder.build(&partition, &BoxMask::from_extent([3, 2, 4]), 0.0);
/// assert_eq!(patches.len(), 6);
/// assert_eq!(patches.patches[5].num_faces(), 6);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SidePatchBuilder {
    pub sides: BoxSides<PatchCondition>,
    /// Gravity used by hydrostatic values
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    /// Reference density used by hydrostatic values
    #[serde(default = "default_density")]
    pub reference_density: f64,
}

fn default_gravity() -> f64 {
    1.0
}

fn default_density() -> f64 {
    1.0
}

const SIDE_NAMES: [&str; 6] = ["x_lower", "x_upper", "y_lower", "y_upper", "z_lower", "z_upper"];

impl SidePatchBuilder {
    pub fn new(sides: BoxSides<PatchCondition>) -> Self {
        Self {
            sides,
            gravity: default_gravity(),
            reference_density: default_density(),
        }
    }

    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_reference_density(mut self, density: f64) -> Self {
        self.reference_density = density;
        self
    }

    /// Take the hydrostatic reference density from a density model.
    pub fn with_density_model(self, model: &dyn DensityModel) -> Self {
        self.with_reference_density(model.reference_density())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (_, condition) in self.sides.iter() {
            condition.validate()?;
        }
        Ok(())
    }

    fn value_for(&self, condition: &PatchCondition, cell: CellIndex, dz: f64, time: f64) -> f64 {
        let z = (cell.k as f64 + 0.5) * dz;
        condition
            .value
            .value_at(z, time, self.gravity, self.reference_density)
    }
}

impl BoundaryBuilder for SidePatchBuilder {
    fn build(
        &self,
        partition: &Partition,
        mask: &dyn GeometryMask,
        time: f64,
    ) -> BoundaryPatchSet {
        let mut patches: Vec<BoundaryPatch> = self
            .sides
            .iter()
            .zip(SIDE_NAMES)
            .map(|((_, cond), name)| BoundaryPatch::new(name, cond.kind, partition.len()))
            .collect();

        for (n, sg) in partition.subgrids().iter().enumerate() {
            for cell in interior_cells(mask, sg.bounds) {
                for (side, normal) in FaceNormal::ALL.into_iter().enumerate() {
                    if mask.is_exterior(cell.step(normal)) {
                        let value = self.value_for(self.sides.get(normal), cell, sg.dz(), time);
                        patches[side].push(n, cell, normal, value);
                    }
                }
            }
        }

        let areas = partition.subgrid(0).face_areas();
        for ((normal, cond), patch) in self.sides.iter().zip(patches.iter_mut()) {
            if let PatchValue::Volumetric { rate } = cond.value {
                let total = areas[normal.axis().index()] * patch.num_faces() as f64;
                let flux = if total > 0.0 { rate / total } else { 0.0 };
                for faces in &mut patch.per_subgrid {
                    faces.values.fill(flux);
                }
            }
        }

        for patch in &patches {
            trace!(
                "side patch {} ({}): {} faces at t={}",
                patch.name,
                patch.kind,
                patch.num_faces(),
                time
            );
        }

        BoundaryPatchSet::new(patches)
    }

    fn name(&self) -> &'static str {
        "side patches"
    }
}
