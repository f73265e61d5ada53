//! A domain split across several subgrids must give the same residual as
//! the same domain held in one subgrid.

use approx::assert_relative_eq;
use richards_fv::boundary::{BoundaryKind, PatchCondition, PatchValue, SidePatchBuilder};
use richards_fv::constitutive::{
    CompressibleDensity, ConstantDensity, ConstantRelPerm, ConstantSaturation, Constitutive,
    NoSource, VanGenuchten,
};
use richards_fv::grid::{BoxMask, DistributedField, GeometryMask, IndicatorMask, Partition};
use richards_fv::problem::{ProblemData, SiteProperties};
use richards_fv::residual::{ResidualAssembler, ResidualConfig, ResidualEvaluation, ResidualState};
use richards_fv::types::{BoxSides, CellIndex};

const EXTENT: [usize; 3] = [6, 4, 3];
const SPACING: [f64; 3] = [10.0, 8.0, 0.5];

fn pressure(c: CellIndex) -> f64 {
    0.2 + 0.05 * c.i as f64 - 0.03 * c.j as f64 - 0.5 * (2 - c.k) as f64
}

fn evaluate(partition: &Partition, mask: &dyn GeometryMask) -> ResidualEvaluation {
    let site = SiteProperties::default()
        .with_anisotropic_permeability([2.0, 1.0, 0.5])
        .with_specific_storage(1e-3)
        .with_slopes(0.01, -0.02)
        .with_mannings(0.3);
    let problem = ProblemData::homogeneous(partition, &site);
    let density = CompressibleDensity::new(1.0, 1e-3);
    let vg = VanGenuchten::new(1.5, 2.2, 0.1, 1.0).unwrap();
    let models = Constitutive::new(&density, &vg, &vg, &NoSource);

    let sides = BoxSides {
        x_lower: PatchCondition::new(
            BoundaryKind::Dirichlet,
            PatchValue::hydrostatic(1.0, 0.0),
        ),
        x_upper: PatchCondition::flux(1e-3),
        z_upper: PatchCondition::overland(-1e-3),
        ..BoxSides::default()
    };
    let boundaries = SidePatchBuilder::new(sides).with_density_model(&density);

    let config = ResidualConfig::default().with_gravity(1.0);
    let assembler = ResidualAssembler::new(config, partition, &problem, mask, models, &boundaries);

    let mut p = DistributedField::from_fn(partition, 1, pressure);
    let p_old = DistributedField::from_fn(partition, 1, |c| pressure(c) - 0.01);
    let mut rho = DistributedField::new(partition, 1);
    let mut sat = DistributedField::new(partition, 1);
    let old_rho = DistributedField::constant(partition, 1, 1.0);
    let old_sat = DistributedField::constant(partition, 1, 0.5);
    let et = DistributedField::constant(partition, 1, 1e-4);

    assembler.evaluate(ResidualState {
        pressure: &mut p,
        old_pressure: &p_old,
        density: &mut rho,
        old_density: &old_rho,
        saturation: &mut sat,
        old_saturation: &old_sat,
        evap_trans: &et,
        dt: 0.25,
        time: 0.0,
    })
}

fn assert_same(single: &ResidualEvaluation, split: &ResidualEvaluation) {
    for (cell, r) in single.residual.owned_values() {
        let other = split.residual.get(cell).unwrap();
        assert_relative_eq!(r, other, epsilon = 1e-12, max_relative = 1e-10);
    }
    for (column, q) in single.overland_bc_flux.owned_values() {
        let other = split.overland_bc_flux.get(column).unwrap();
        assert_relative_eq!(q, other, epsilon = 1e-12, max_relative = 1e-10);
    }
    assert_relative_eq!(single.outflow, split.outflow, epsilon = 1e-12);
}

#[test]
fn test_split_box_matches_single() {
    let single = Partition::single(EXTENT, SPACING).unwrap();
    let split = Partition::split(EXTENT, SPACING, [2, 2, 1]).unwrap();
    let mask = BoxMask::from_extent(EXTENT);

    let a = evaluate(&single, &mask);
    let b = evaluate(&split, &mask);
    assert!(a.is_finite());
    assert!(a.outflow > 0.0);
    assert_same(&a, &b);
}

#[test]
fn test_split_masked_domain_matches_single() {
    let single = Partition::single(EXTENT, SPACING).unwrap();
    let split = Partition::split(EXTENT, SPACING, [3, 1, 2]).unwrap();
    // notch out the north-east column
    let mask = IndicatorMask::from_fn(EXTENT, |c| !(c.i == 5 && c.j == 3));

    let a = evaluate(&single, &mask);
    let b = evaluate(&split, &mask);
    assert_same(&a, &b);
    let notch = CellIndex::new(5, 3, 1);
    assert_eq!(b.residual.get(notch), Some(pressure(notch)));
}

/// Land surface at k=0 for i < 2 and at k=1 for i >= 2, ponded water
/// running west down the step.
fn evaluate_step(partition: &Partition) -> ResidualEvaluation {
    let extent = [4, 1, 2];
    let mask = IndicatorMask::from_fn(extent, |c| !(c.i < 2 && c.k == 1));
    // impermeable soil: only the surface moves water
    let site = SiteProperties::default()
        .with_permeability(0.0)
        .with_specific_storage(0.0)
        .with_slopes(-0.04, 0.0)
        .with_mannings(0.5);
    let problem = ProblemData::homogeneous(partition, &site);
    let (rho, sat, kr) = (
        ConstantDensity::default(),
        ConstantSaturation::default(),
        ConstantRelPerm::default(),
    );
    let models = Constitutive::new(&rho, &sat, &kr, &NoSource);
    let boundaries = SidePatchBuilder::new(BoxSides {
        z_upper: PatchCondition::overland(0.0),
        ..BoxSides::default()
    });
    let config = ResidualConfig::default().with_gravity(0.0);
    let assembler = ResidualAssembler::new(config, partition, &problem, &mask, models, &boundaries);

    let ponded = |c: CellIndex| 0.25 * (c.i + 1) as f64 + 0.5 * c.k as f64;
    let mut p = DistributedField::from_fn(partition, 1, ponded);
    let p_old = DistributedField::from_fn(partition, 1, ponded);
    let mut density = DistributedField::new(partition, 1);
    let mut saturation = DistributedField::new(partition, 1);
    let ones = DistributedField::constant(partition, 1, 1.0);
    let et = DistributedField::new(partition, 1);

    assembler.evaluate(ResidualState {
        pressure: &mut p,
        old_pressure: &p_old,
        density: &mut density,
        old_density: &ones,
        saturation: &mut saturation,
        old_saturation: &ones,
        evap_trans: &et,
        dt: 1.0,
        time: 0.0,
    })
}

#[test]
fn test_stepped_surface_across_seam() {
    let single = evaluate_step(&Partition::single([4, 1, 2], [1.0; 3]).unwrap());
    let split = evaluate_step(&Partition::split([4, 1, 2], [1.0; 3], [2, 1, 1]).unwrap());
    assert_same(&single, &split);

    // negative slope: water runs east with q = 0.4 * p^(5/3), p read at
    // each column's own surface cell: 0.25 and 0.5 at k=0, 1.25 at k=1
    let q = |p: f64| 0.4 * p.powf(5.0 / 3.0);
    let r_low = split.residual.get(CellIndex::new(1, 0, 0)).unwrap();
    let r_high = split.residual.get(CellIndex::new(2, 0, 1)).unwrap();
    assert_relative_eq!(r_low, q(0.5) - q(0.25), epsilon = 1e-12);
    assert_relative_eq!(r_high, q(1.25) - q(0.5), epsilon = 1e-12);
}

#[test]
fn test_stepped_surface_matches_single() {
    let single = Partition::single(EXTENT, SPACING).unwrap();
    // land surface one layer lower for i < 3
    let mask = IndicatorMask::from_fn(EXTENT, |c| !(c.i < 3 && c.k == 2));
    let a = evaluate(&single, &mask);

    for pieces in [[2, 1, 1], [2, 2, 2], [3, 1, 2]] {
        let split = Partition::split(EXTENT, SPACING, pieces).unwrap();
        let b = evaluate(&split, &mask);
        assert_same(&a, &b);
    }
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_matches_serial() {
    let single = Partition::single(EXTENT, SPACING).unwrap();
    let split = Partition::split(EXTENT, SPACING, [3, 2, 1]).unwrap();
    let mask = BoxMask::from_extent(EXTENT);

    let serial = evaluate(&single, &mask);
    let first = evaluate(&split, &mask);
    let second = evaluate(&split, &mask);

    // every subvector has exactly one writer, so runs are bitwise repeatable
    assert_eq!(first, second);
    assert_same(&serial, &first);
}
