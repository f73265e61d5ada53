//! The residual assembler.

use std::time::Instant;

use log::{debug, warn};

use super::boundary::{
    CorrectionInputs, CorrectionOutputs, apply_corrections, inject_dirichlet, overland_discharge,
};
use super::config::ResidualConfig;
use super::for_each_subgrid;
use super::stencil::{StencilFields, accumulate_fluxes};
use super::terms::{
    AccumulationInputs, accumulate, apply_exterior_identity, apply_sources,
    evaluate_fluid_properties, evaluate_rel_perm,
};
use crate::boundary::{BoundaryBuilder, InternalBoundary, NoInternalBoundary};
use crate::constitutive::Constitutive;
use crate::flux::DarcyParams;
use crate::grid::{DistributedField, GeometryMask, HaloExchange, LocalHaloExchange, Partition};
use crate::overland::{OverlandScratch, RoutingContext, SurfaceParams};
use crate::problem::ProblemData;

/// Per-call inputs and work buffers.
///
/// All fields share the partition and layout of `pressure`, which needs a
/// halo of at least one cell. Layout mismatches are caller errors and are
/// only checked in debug builds.
pub struct ResidualState<'a> {
    /// Trial pressure. Ghosts are refreshed and Dirichlet ghosts overwritten
    /// in place; both changes remain visible after the call.
    pub pressure: &'a mut DistributedField,
    pub old_pressure: &'a DistributedField,
    /// Overwritten with the density of `pressure`
    pub density: &'a mut DistributedField,
    pub old_density: &'a DistributedField,
    /// Overwritten with the saturation of `pressure`
    pub saturation: &'a mut DistributedField,
    pub old_saturation: &'a DistributedField,
    /// Evapotranspiration flux per unit volume
    pub evap_trans: &'a DistributedField,
    pub dt: f64,
    pub time: f64,
}

/// Output of one evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct ResidualEvaluation {
    /// Residual on owned cells (ghost entries carry no meaning)
    pub residual: DistributedField,
    /// Overland outflow `|KS| + |KW|` at the global south-west column, 0 if
    /// no overland patch covers it
    pub outflow: f64,
    /// Per-column overland boundary flux (surface layout)
    pub overland_bc_flux: DistributedField,
}

impl ResidualEvaluation {
    /// True if every owned residual entry is finite.
    pub fn is_finite(&self) -> bool {
        self.residual.is_finite()
    }

    /// Max-norm of the residual over owned cells.
    pub fn max_abs(&self) -> f64 {
        self.residual.max_abs()
    }
}

/// Assembles the residual for a fixed problem setup.
///
/// Construct once, then call [`evaluate`](Self::evaluate) for every trial
/// pressure. The assembler only borrows its collaborators.
///
/// # Example
///
/// ```
/// use richards_fv::boundary::{PatchCondition, SidePatchBuilder};
/// use richards_fv::constitutive::{Constitutive, ConstantDensity, NoSource, VanGenuchten};
/// use richards_fv::grid::{BoxMask, DistributedField, Partition};
/// use richards_fv::problem::{ProblemData, SiteProperties};
/// use richards_fv::residual::{ResidualAssembler, ResidualConfig, ResidualState};
/// use richards_fv::types::BoxSides;
///
/// let partition = Partition::single([4, 4, 4], [1.0, 1.0, 0.25]).unwrap();
/// let problem = ProblemData::homogeneous(&partition, &SiteProperties::default());
/// let mask = BoxMask::from_extent([4, 4, 4]);
/// let density = ConstantDensity::new(1.0);
/// let vg = VanGenuchten::new(1.0, 2.0, 0.2, 1.0).unwrap();
/// let models = Constitutive::new(&density, &vg, &vg, &NoSource);
/// let sides = BoxSides { z_upper: PatchCondition::overland(0.0), ..BoxSides::default() };
/// let boundaries = SidePatchBuilder::new(sides);
///
/// let assembler = ResidualAssembler::new(
///     ResidualConfig::default(),
///     &partition,
///     &problem,
///     &mask,
///     models,
///     &boundaries,
/// );
///
/// let mut pressure = DistributedField::constant(&partition, 1, -1.0);
/// let old = pressure.clone();
/// let mut rho = DistributedField::new(&partition, 1);
/// let mut sat = DistributedField::new(&partition, 1);
/// let old_rho = DistributedField::constant(&partition, 1, 1.0);
/// let old_sat = DistributedField::constant(&partition, 1, 0.5);
/// let et = DistributedField::new(&partition, 1);
///
/// let eval = assembler.evaluate(ResidualState {
///     pressure: &mut pressure,
///     old_pressure: &old,
///     density: &mut rho,
///     old_density: &old_rho,
///     saturation: &mut sat,
///     old_saturation: &old_sat,
///     evap_trans: &et,
///     dt: 0.1,
///     time: 0.0,
/// });
/// assert!(eval.is_finite());
/// ```
pub struct ResidualAssembler<'a> {
    config: ResidualConfig,
    partition: &'a Partition,
    problem: &'a ProblemData,
    mask: &'a dyn GeometryMask,
    constitutive: Constitutive<'a>,
    boundaries: &'a dyn BoundaryBuilder,
    internal: &'a dyn InternalBoundary,
    halo: &'a dyn HaloExchange,
}

impl<'a> ResidualAssembler<'a> {
    /// Create an assembler with no internal boundary and in-process halo
    /// exchange.
    pub fn new(
        config: ResidualConfig,
        partition: &'a Partition,
        problem: &'a ProblemData,
        mask: &'a dyn GeometryMask,
        constitutive: Constitutive<'a>,
        boundaries: &'a dyn BoundaryBuilder,
    ) -> Self {
        Self {
            config,
            partition,
            problem,
            mask,
            constitutive,
            boundaries,
            internal: &NoInternalBoundary,
            halo: &LocalHaloExchange,
        }
    }

    pub fn with_internal_boundary(mut self, internal: &'a dyn InternalBoundary) -> Self {
        self.internal = internal;
        self
    }

    pub fn with_halo_exchange(mut self, halo: &'a dyn HaloExchange) -> Self {
        self.halo = halo;
        self
    }

    pub fn config(&self) -> &ResidualConfig {
        &self.config
    }

    pub fn partition(&self) -> &Partition {
        self.partition
    }

    fn stencil_fields<'s>(
        &'s self,
        n: usize,
        pressure: &'s DistributedField,
        density: &'s DistributedField,
        rel_perm: &'s DistributedField,
    ) -> StencilFields<'s> {
        StencilFields {
            pressure: pressure.subvector(n),
            density: density.subvector(n),
            rel_perm: rel_perm.subvector(n),
            permeability: [
                self.problem.permeability_x.subvector(n),
                self.problem.permeability_y.subvector(n),
                self.problem.permeability_z.subvector(n),
            ],
        }
    }

    /// Evaluate the residual for `state`.
    ///
    /// Never fails: degenerate inputs (zero roughness, zero viscosity)
    /// produce non-finite entries, which [`ResidualEvaluation::is_finite`]
    /// reports.
    pub fn evaluate(&self, state: ResidualState<'_>) -> ResidualEvaluation {
        let start = Instant::now();
        let ResidualState {
            pressure,
            old_pressure,
            density,
            old_density,
            saturation,
            old_saturation,
            evap_trans,
            dt,
            time,
        } = state;

        debug_assert!(pressure.ghost() >= 1, "pressure needs a ghost halo");
        debug_assert_eq!(pressure.len(), self.partition.len());
        debug_assert!(
            [&*old_pressure, &*density, &*old_density, &*saturation, &*old_saturation, evap_trans]
                .iter()
                .all(|f| f.same_layout(pressure)),
            "all volume fields must share the pressure layout"
        );

        let gravity = self.config.gravity;
        let viscosity = self.config.viscosity;
        let models = &self.constitutive;
        let mask = self.mask;
        let problem = self.problem;
        let partition = self.partition;

        self.halo.exchange(pressure);
        let mut residual = pressure.zeros_like();

        {
            let pressure: &DistributedField = &*pressure;
            let items: Vec<_> = density
                .subvectors_mut()
                .iter_mut()
                .zip(saturation.subvectors_mut().iter_mut())
                .collect();
            for_each_subgrid(items, |n, (rho, sat)| {
                evaluate_fluid_properties(rho, sat, pressure.subvector(n), models, gravity)
            });
        }

        // Source scratch; reused for relative permeability once consumed
        let mut source = pressure.zeros_like();
        {
            let pressure: &DistributedField = &*pressure;
            let density: &DistributedField = &*density;
            let saturation: &DistributedField = &*saturation;
            let items: Vec<_> = residual
                .subvectors_mut()
                .iter_mut()
                .zip(source.subvectors_mut().iter_mut())
                .collect();
            for_each_subgrid(items, |n, (r, src)| {
                let sg = partition.subgrid(n);
                let volume = sg.cell_volume();
                let inputs = AccumulationInputs {
                    pressure: pressure.subvector(n),
                    old_pressure: old_pressure.subvector(n),
                    saturation: saturation.subvector(n),
                    old_saturation: old_saturation.subvector(n),
                    density: density.subvector(n),
                    old_density: old_density.subvector(n),
                    porosity: problem.porosity.subvector(n),
                    specific_storage: problem.specific_storage.subvector(n),
                };
                accumulate(r, sg.bounds, mask, &inputs, volume);
                apply_sources(
                    r,
                    src,
                    evap_trans.subvector(n),
                    sg.bounds,
                    mask,
                    models,
                    time,
                    volume,
                    dt,
                );
            });
        }

        let patches = self.boundaries.build(partition, mask, time);
        {
            let items: Vec<_> = pressure.subvectors_mut().iter_mut().collect();
            for_each_subgrid(items, |n, p| inject_dirichlet(p, &patches, n));
        }

        let mut rel_perm = source;
        rel_perm.fill(0.0);
        {
            let pressure: &DistributedField = &*pressure;
            let density: &DistributedField = &*density;
            let items: Vec<_> = rel_perm.subvectors_mut().iter_mut().collect();
            for_each_subgrid(items, |n, kr| {
                evaluate_rel_perm(
                    kr,
                    pressure.subvector(n),
                    density.subvector(n),
                    partition.subgrid(n).bounds,
                    mask,
                    models,
                    gravity,
                )
            });
        }

        {
            let pressure: &DistributedField = &*pressure;
            let density: &DistributedField = &*density;
            let rel_perm = &rel_perm;
            let items: Vec<_> = residual.subvectors_mut().iter_mut().collect();
            for_each_subgrid(items, |n, r| {
                let sg = partition.subgrid(n);
                let params = DarcyParams::new(sg.spacing, viscosity, gravity);
                let fields = self.stencil_fields(n, pressure, density, rel_perm);
                accumulate_fluxes(r, sg.bounds, mask, &fields, &params, dt);
            });
        }

        let mut overland_bc_flux = DistributedField::new_surface(partition, 1);
        let mut scratch = OverlandScratch::new(partition);
        if patches.has_overland() {
            let pressure: &DistributedField = &*pressure;
            let patches = &patches;
            let items: Vec<_> = scratch.columns.iter_mut().collect();
            for_each_subgrid(items, |n, columns| {
                let surface = SurfaceParams {
                    x_slope: problem.x_slope.subvector(n),
                    y_slope: problem.y_slope.subvector(n),
                    mannings: problem.mannings.subvector(n),
                };
                overland_discharge(patches, n, pressure.subvector(n), surface, columns)
            });
            // neighbour columns may route on another subgrid, at another layer
            scratch.share_discharge();
        }
        let global = self.config.global_columns(partition);
        let outflow = {
            let pressure: &DistributedField = &*pressure;
            let density: &DistributedField = &*density;
            let rel_perm = &rel_perm;
            let patches = &patches;
            let items: Vec<_> = residual
                .subvectors_mut()
                .iter_mut()
                .zip(overland_bc_flux.subvectors_mut().iter_mut())
                .zip(scratch.columns.iter_mut())
                .collect();
            let outflows = for_each_subgrid(items, |n, ((r, obf), columns)| {
                let sg = partition.subgrid(n);
                let inputs = CorrectionInputs {
                    fields: self.stencil_fields(n, pressure, density, rel_perm),
                    old_pressure: old_pressure.subvector(n),
                    params: DarcyParams::new(sg.spacing, viscosity, gravity),
                    routing: RoutingContext {
                        dt,
                        spacing: sg.spacing,
                        global,
                    },
                    mask,
                    dt,
                };
                apply_corrections(
                    patches,
                    n,
                    &inputs,
                    CorrectionOutputs {
                        residual: r,
                        overland_flux: obf,
                        scratch: columns,
                    },
                )
            });
            outflows.into_iter().flatten().last().unwrap_or(0.0)
        };
        drop(scratch);
        drop(rel_perm);

        self.internal.correct(&mut residual, pressure, time);

        {
            let pressure: &DistributedField = &*pressure;
            let items: Vec<_> = residual.subvectors_mut().iter_mut().collect();
            for_each_subgrid(items, |n, r| {
                apply_exterior_identity(r, pressure.subvector(n), partition.subgrid(n).bounds, mask)
            });
        }

        let evaluation = ResidualEvaluation {
            residual,
            outflow,
            overland_bc_flux,
        };

        if !evaluation.is_finite() {
            warn!(
                "residual contains non-finite entries (t={}, dt={}); check roughness, spacing and viscosity",
                time, dt
            );
        }
        debug!(
            "residual: {} subgrids, {} patches ({}), max|r|={:.3e}, outflow={:.3e}, {:.2?}",
            partition.len(),
            patches.len(),
            self.boundaries.name(),
            evaluation.max_abs(),
            evaluation.outflow,
            start.elapsed()
        );

        evaluation
    }
}
