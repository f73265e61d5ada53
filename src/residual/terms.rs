//! Pointwise terms of the residual: fluid properties, accumulation,
//! storage, sources, relative permeability and the exterior identity.
//!
//! Each function works on one subgrid's subvectors.

use crate::constitutive::Constitutive;
use crate::grid::{GeometryMask, Subvector, exterior_cells, interior_cells};
use crate::types::{CellIndex, FaceNormal, IndexBox};

/// Density and saturation at every stored cell, ghosts included.
pub(crate) fn evaluate_fluid_properties(
    density: &mut Subvector,
    saturation: &mut Subvector,
    pressure: &Subvector,
    models: &Constitutive<'_>,
    gravity: f64,
) {
    for cell in pressure.data_box().cells() {
        let p = pressure.get(cell);
        let (rho, _) = models.density.density(p);
        density.set(cell, rho);
        saturation.set(cell, models.saturation.saturation(p, rho, gravity, cell));
    }
}

/// Current and previous values feeding the accumulation terms.
pub(crate) struct AccumulationInputs<'a> {
    pub pressure: &'a Subvector,
    pub old_pressure: &'a Subvector,
    pub saturation: &'a Subvector,
    pub old_saturation: &'a Subvector,
    pub density: &'a Subvector,
    pub old_density: &'a Subvector,
    pub porosity: &'a Subvector,
    pub specific_storage: &'a Subvector,
}

/// Mass accumulation plus compressible storage on interior cells.
pub(crate) fn accumulate(
    residual: &mut Subvector,
    owned: IndexBox,
    mask: &dyn GeometryMask,
    inputs: &AccumulationInputs<'_>,
    volume: f64,
) {
    for cell in interior_cells(mask, owned) {
        let s_rho = inputs.saturation.get(cell) * inputs.density.get(cell);
        let s_rho_old = inputs.old_saturation.get(cell) * inputs.old_density.get(cell);

        let mass = (s_rho - s_rho_old) * inputs.porosity.get(cell) * volume;
        let storage = inputs.specific_storage.get(cell)
            * volume
            * (inputs.pressure.get(cell) * s_rho - inputs.old_pressure.get(cell) * s_rho_old);

        residual.add(cell, mass + storage);
    }
}

/// Evaluate the phase source into `source` and subtract source plus
/// evapotranspiration from interior cells.
#[allow(clippy::too_many_arguments)]
pub(crate) fn apply_sources(
    residual: &mut Subvector,
    source: &mut Subvector,
    evap_trans: &Subvector,
    owned: IndexBox,
    mask: &dyn GeometryMask,
    models: &Constitutive<'_>,
    time: f64,
    volume: f64,
    dt: f64,
) {
    for cell in interior_cells(mask, owned) {
        source.set(cell, models.source.source(cell, time));
    }
    for cell in interior_cells(mask, owned) {
        residual.add(cell, -volume * dt * (source.get(cell) + evap_trans.get(cell)));
    }
}

/// Relative permeability on interior cells and the ring of exterior cells
/// touching them.
pub(crate) fn evaluate_rel_perm(
    rel_perm: &mut Subvector,
    pressure: &Subvector,
    density: &Subvector,
    owned: IndexBox,
    mask: &dyn GeometryMask,
    models: &Constitutive<'_>,
    gravity: f64,
) {
    let touches_interior = |cell: CellIndex| {
        mask.is_interior(cell)
            || FaceNormal::ALL
                .into_iter()
                .any(|n| mask.is_interior(cell.step(n)))
    };

    for cell in owned.grow([1, 1, 1]).cells().filter(|c| touches_interior(*c)) {
        let kr = models.rel_perm.relative_permeability(
            pressure.get(cell),
            density.get(cell),
            gravity,
            cell,
        );
        rel_perm.set(cell, kr);
    }
}

/// Exterior cells solve `r = p`.
pub(crate) fn apply_exterior_identity(
    residual: &mut Subvector,
    pressure: &Subvector,
    owned: IndexBox,
    mask: &dyn GeometryMask,
) {
    for cell in exterior_cells(mask, owned) {
        residual.set(cell, pressure.get(cell));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constitutive::{
        ConstantDensity, ConstantRelPerm, ConstantSaturation, ConstantSource, NoSource,
    };
    use crate::grid::{BoxMask, IndicatorMask};
    use approx::assert_relative_eq;

    fn buffer(owned: IndexBox, value: f64) -> Subvector {
        Subvector::new(owned.grow([1, 1, 1]), value)
    }

    #[test]
    fn test_uniform_state_has_no_accumulation() {
        let owned = IndexBox::from_extent([2, 2, 2]);
        let mask = BoxMask::new(owned);
        let p = buffer(owned, -1.0);
        let s = buffer(owned, 0.7);
        let rho = buffer(owned, 1.2);
        let phi = buffer(owned, 0.3);
        let ss = buffer(owned, 1e-3);
        let mut r = buffer(owned, 0.0);

        let inputs = AccumulationInputs {
            pressure: &p,
            old_pressure: &p,
            saturation: &s,
            old_saturation: &s,
            density: &rho,
            old_density: &rho,
            porosity: &phi,
            specific_storage: &ss,
        };
        accumulate(&mut r, owned, &mask, &inputs, 0.5);
        assert!(owned.cells().all(|c| r.get(c) == 0.0));
    }

    #[test]
    fn test_accumulation_and_storage() {
        let owned = IndexBox::from_extent([1, 1, 1]);
        let mask = BoxMask::new(owned);
        let (p, p_old) = (buffer(owned, 2.0), buffer(owned, 1.0));
        let (s, s_old) = (buffer(owned, 1.0), buffer(owned, 0.5));
        let rho = buffer(owned, 1.0);
        let phi = buffer(owned, 0.4);
        let ss = buffer(owned, 0.1);
        let mut r = buffer(owned, 0.0);

        let inputs = AccumulationInputs {
            pressure: &p,
            old_pressure: &p_old,
            saturation: &s,
            old_saturation: &s_old,
            density: &rho,
            old_density: &rho,
            porosity: &phi,
            specific_storage: &ss,
        };
        accumulate(&mut r, owned, &mask, &inputs, 2.0);
        // (1 - 0.5) * 0.4 * 2 + 0.1 * 2 * (2 * 1 - 1 * 0.5)
        assert_relative_eq!(r.get(CellIndex::new(0, 0, 0)), 0.4 + 0.3, epsilon = 1e-14);
    }

    #[test]
    fn test_sources_subtracted_from_interior_only() {
        let owned = IndexBox::from_extent([2, 1, 1]);
        let mask = IndicatorMask::from_fn([2, 1, 1], |c| c.i == 0);
        let density = ConstantDensity::default();
        let sat = ConstantSaturation::default();
        let kr = ConstantRelPerm::default();
        let src = ConstantSource::new(2.0);
        let models = Constitutive::new(&density, &sat, &kr, &src);

        let mut r = buffer(owned, 0.0);
        let mut source = buffer(owned, 0.0);
        let et = buffer(owned, 0.5);
        apply_sources(&mut r, &mut source, &et, owned, &mask, &models, 0.0, 3.0, 0.1);

        assert_relative_eq!(r.get(CellIndex::new(0, 0, 0)), -3.0 * 0.1 * 2.5);
        assert_eq!(r.get(CellIndex::new(1, 0, 0)), 0.0);
        assert_eq!(source.get(CellIndex::new(0, 0, 0)), 2.0);
    }

    #[test]
    fn test_rel_perm_ring() {
        let owned = IndexBox::from_extent([3, 1, 1]);
        let mask = IndicatorMask::from_fn([3, 1, 1], |c| c.i == 0);
        let density = ConstantDensity::default();
        let sat = ConstantSaturation::default();
        let kr = ConstantRelPerm::new(0.5);
        let models = Constitutive::new(&density, &sat, &kr, &NoSource);

        let p = buffer(owned, 0.0);
        let rho = buffer(owned, 1.0);
        let mut rel = buffer(owned, 0.0);
        evaluate_rel_perm(&mut rel, &p, &rho, owned, &mask, &models, 1.0);

        assert_eq!(rel.get(CellIndex::new(-1, 0, 0)), 0.5);
        assert_eq!(rel.get(CellIndex::new(0, 0, 0)), 0.5);
        assert_eq!(rel.get(CellIndex::new(1, 0, 0)), 0.5);
        assert_eq!(rel.get(CellIndex::new(0, 0, 1)), 0.5);
        // two cells away from the interior
        assert_eq!(rel.get(CellIndex::new(2, 0, 0)), 0.0);
    }

    #[test]
    fn test_exterior_identity() {
        let owned = IndexBox::from_extent([2, 1, 1]);
        let mask = IndicatorMask::from_fn([2, 1, 1], |c| c.i == 0);
        let p = buffer(owned, 4.0);
        let mut r = buffer(owned, 1.0);
        apply_exterior_identity(&mut r, &p, owned, &mask);
        assert_eq!(r.get(CellIndex::new(0, 0, 0)), 1.0);
        assert_eq!(r.get(CellIndex::new(1, 0, 0)), 4.0);
    }
}
