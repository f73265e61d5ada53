//! Overland routing through the full residual evaluation.

use approx::assert_relative_eq;
use richards_fv::boundary::{
    BoundaryBuilder, BoundaryKind, BoundaryPatch, PatchCondition, PatchValue, SidePatchBuilder,
    TimeCycle, TimeInterval,
};
use richards_fv::constitutive::{
    ConstantDensity, ConstantRelPerm, ConstantSaturation, Constitutive, NoSource,
};
use richards_fv::grid::{BoxMask, DistributedField, GeometryMask, IndicatorMask, Partition};
use richards_fv::problem::{ProblemData, SiteProperties};
use richards_fv::residual::{ResidualAssembler, ResidualConfig, ResidualEvaluation, ResidualState};
use richards_fv::types::{BoxSides, CellIndex};

fn at(field: &DistributedField, i: i32, j: i32, k: i32) -> f64 {
    field.get(CellIndex::new(i, j, k)).unwrap()
}

/// Evaluate a single-subgrid domain with unit constitutive models, no
/// gravity and the given pressures.
fn evaluate(
    partition: &Partition,
    site: &SiteProperties,
    mask: &dyn GeometryMask,
    top: PatchCondition,
    pressure: impl Fn(CellIndex) -> f64,
    old_pressure: impl Fn(CellIndex) -> f64,
    time: f64,
) -> ResidualEvaluation {
    let boundaries = SidePatchBuilder::new(BoxSides {
        z_upper: top,
        ..BoxSides::default()
    });
    evaluate_with(partition, site, mask, &boundaries, pressure, old_pressure, time)
}

fn evaluate_with(
    partition: &Partition,
    site: &SiteProperties,
    mask: &dyn GeometryMask,
    boundaries: &dyn BoundaryBuilder,
    pressure: impl Fn(CellIndex) -> f64,
    old_pressure: impl Fn(CellIndex) -> f64,
    time: f64,
) -> ResidualEvaluation {
    let problem = ProblemData::homogeneous(partition, site);
    let (rho, sat, kr) = (
        ConstantDensity::default(),
        ConstantSaturation::default(),
        ConstantRelPerm::default(),
    );
    let models = Constitutive::new(&rho, &sat, &kr, &NoSource);
    let config = ResidualConfig::default().with_gravity(0.0);
    let assembler = ResidualAssembler::new(config, partition, &problem, mask, models, boundaries);

    let mut p = DistributedField::from_fn(partition, 1, pressure);
    let p_old = DistributedField::from_fn(partition, 1, old_pressure);
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
        time,
    })
}

fn flat_site() -> SiteProperties {
    SiteProperties::default()
        .with_specific_storage(0.0)
        .with_slopes(0.0, 0.0)
}

#[test]
fn test_flat_column_only_stores_water() {
    let partition = Partition::single([1, 1, 1], [1.0; 3]).unwrap();
    let mask = BoxMask::from_extent([1, 1, 1]);
    let eval = evaluate(
        &partition,
        &flat_site(),
        &mask,
        PatchCondition::overland(0.0),
        |_| 0.5,
        |_| -0.1,
        0.0,
    );

    // ponded depth 0.5, previously dry
    assert_relative_eq!(at(&eval.residual, 0, 0, 0), 0.5, epsilon = 1e-14);
    assert_eq!(eval.outflow, 0.0);
    assert_eq!(at(&eval.overland_bc_flux, 0, 0, 0), 0.0);
}

#[test]
fn test_sloped_surface_drains_west() {
    let partition = Partition::single([2, 1, 1], [1.0; 3]).unwrap();
    let mask = BoxMask::from_extent([2, 1, 1]);
    let site = flat_site().with_slopes(0.04, 0.0).with_mannings(0.5);
    // ponded inside, dry ghosts
    let ponded = |c: CellIndex| {
        if (0..2).contains(&c.i) && c.j == 0 && c.k == 0 {
            1.0
        } else {
            -1.0
        }
    };
    let eval = evaluate(
        &partition,
        &site,
        &mask,
        PatchCondition::overland(0.0),
        ponded,
        ponded,
        0.0,
    );

    // q = -sqrt(0.04) / 0.5 = -0.4 in both columns: the east column loses
    // 0.4 to the west one, which passes it out through the west edge
    assert_relative_eq!(at(&eval.residual, 0, 0, 0), 0.0, epsilon = 1e-12);
    assert_relative_eq!(at(&eval.residual, 1, 0, 0), 0.4, epsilon = 1e-12);
    assert_relative_eq!(eval.outflow, 0.4, epsilon = 1e-12);
    assert_relative_eq!(at(&eval.overland_bc_flux, 0, 0, 0), 0.4, epsilon = 1e-12);
    assert_eq!(at(&eval.overland_bc_flux, 1, 0, 0), 0.0);
}

#[test]
fn test_outflow_kept_when_later_patch_misses_south_west_column() {
    let partition = Partition::single([2, 1, 1], [1.0; 3]).unwrap();
    let mask = BoxMask::from_extent([2, 1, 1]);
    let site = flat_site().with_slopes(0.04, 0.0).with_mannings(0.5);
    let ponded = |c: CellIndex| {
        if (0..2).contains(&c.i) && c.j == 0 && c.k == 0 {
            1.0
        } else {
            -1.0
        }
    };

    // the top split into a west patch holding (0, 0) and an east patch after it
    let mut set = SidePatchBuilder::new(BoxSides {
        z_upper: PatchCondition::overland(0.0),
        ..BoxSides::default()
    })
    .build(&partition, &mask, 0.0);
    let top = set.patches.pop().unwrap();
    let mut west = BoundaryPatch::new("west", BoundaryKind::Overland, 1);
    let mut east = BoundaryPatch::new("east", BoundaryKind::Overland, 1);
    for (face, value) in top.faces_on(0).unwrap().iter() {
        let patch = if face.cell.i == 0 { &mut west } else { &mut east };
        patch.push(0, face.cell, face.normal, value);
    }
    set.push(west);
    set.push(east);

    let eval = evaluate_with(&partition, &site, &mask, &set, ponded, ponded, 0.0);

    // same routing as a single top patch
    assert_relative_eq!(eval.outflow, 0.4, epsilon = 1e-12);
    assert_relative_eq!(at(&eval.residual, 0, 0, 0), 0.0, epsilon = 1e-12);
    assert_relative_eq!(at(&eval.residual, 1, 0, 0), 0.4, epsilon = 1e-12);
}

#[test]
fn test_outflow_zero_without_south_west_column() {
    let partition = Partition::single([2, 1, 1], [1.0; 3]).unwrap();
    let mask = IndicatorMask::from_fn([2, 1, 1], |c| c.i >= 1);
    let site = flat_site().with_slopes(0.04, 0.0).with_mannings(0.5);
    let eval = evaluate(
        &partition,
        &site,
        &mask,
        PatchCondition::overland(0.0),
        |_| 1.0,
        |_| 1.0,
        0.0,
    );

    assert_eq!(eval.outflow, 0.0);
    // the excluded column keeps the exterior identity
    assert_eq!(at(&eval.residual, 0, 0, 0), 1.0);
}

#[test]
fn test_rain_follows_time_cycle() {
    let partition = Partition::single([1, 1, 1], [1.0; 3]).unwrap();
    let mask = BoxMask::from_extent([1, 1, 1]);
    let rain = TimeCycle::once(vec![
        TimeInterval {
            length: 1.0,
            value: -0.1,
        },
        TimeInterval {
            length: 1.0,
            value: 0.0,
        },
    ]);
    let top = PatchCondition::new(BoundaryKind::Overland, PatchValue::Cycle(rain));

    let wet = evaluate(&partition, &flat_site(), &mask, top.clone(), |_| -0.2, |_| -0.2, 0.5);
    let dry = evaluate(&partition, &flat_site(), &mask, top, |_| -0.2, |_| -0.2, 1.5);

    // rain enters through the top face: dt * (+1) * area * value
    assert_relative_eq!(at(&wet.residual, 0, 0, 0), -0.1, epsilon = 1e-14);
    assert_relative_eq!(at(&dry.residual, 0, 0, 0), 0.0, epsilon = 1e-14);
}
