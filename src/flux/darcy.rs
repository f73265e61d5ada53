//! Two-point Darcy fluxes across cell faces.
//!
//! Lateral faces use the pressure difference over the cell spacing. Vertical
//! faces compare the potentials `p/dz - rho g/2` (lower cell, top half) and
//! `p/dz + rho g/2` (upper cell, bottom half). Face permeability is the
//! harmonic mean of the two cells; mobility (relative permeability times
//! density) is taken from the upstream cell.

use super::{harmonic_mean, upstream_mean};
use crate::types::{Axis, FaceNormal};

/// Cell values needed on one side of a face.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FaceCell {
    pub pressure: f64,
    pub density: f64,
    /// Permeability along the face's axis
    pub permeability: f64,
    /// Relative permeability times density
    pub mobility: f64,
}

/// Geometry and fluid constants shared by every face flux.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DarcyParams {
    /// Cell spacing [dx, dy, dz]
    pub spacing: [f64; 3],
    pub viscosity: f64,
    pub gravity: f64,
}

impl DarcyParams {
    pub fn new(spacing: [f64; 3], viscosity: f64, gravity: f64) -> Self {
        Self {
            spacing,
            viscosity,
            gravity,
        }
    }

    /// Face area normal to `axis`.
    #[inline]
    pub fn area(&self, axis: Axis) -> f64 {
        let [dx, dy, dz] = self.spacing;
        match axis {
            Axis::X => dy * dz,
            Axis::Y => dx * dz,
            Axis::Z => dx * dy,
        }
    }
}

/// Vertical potentials `(lower, upper)` for the face between `lower` and the
/// cell above it.
#[inline]
pub fn vertical_potentials(lower: &FaceCell, upper: &FaceCell, dz: f64, gravity: f64) -> (f64, f64) {
    (
        lower.pressure / dz - 0.5 * lower.density * gravity,
        upper.pressure / dz + 0.5 * upper.density * gravity,
    )
}

/// Flux from `lo` to its +axis neighbour `hi` (positive = toward `hi`).
///
/// A zero potential difference gives exactly zero flux.
#[inline]
pub fn face_flux(axis: Axis, lo: &FaceCell, hi: &FaceCell, params: &DarcyParams) -> f64 {
    let k_face = harmonic_mean(lo.permeability, hi.permeability);
    let area = params.area(axis);
    match axis {
        Axis::X | Axis::Y => {
            let h = params.spacing[axis.index()];
            let diff = lo.pressure - hi.pressure;
            let mob = upstream_mean(lo.pressure, hi.pressure, lo.mobility, hi.mobility);
            area * k_face * (diff / h) * mob / params.viscosity
        }
        Axis::Z => {
            let (lower, upper) =
                vertical_potentials(lo, hi, params.spacing[2], params.gravity);
            let diff = lower - upper;
            let mob = upstream_mean(lower, upper, lo.mobility, hi.mobility);
            area * k_face * diff * mob / params.viscosity
        }
    }
}

/// One-sided flux through a Dirichlet face along +axis.
///
/// `cell` is the interior cell, `ghost` the cell across the face (whose
/// mobility is used when flow enters the domain) and `value` the prescribed
/// pressure. The half-cell distance doubles the gradient; vertical faces use
/// a quarter-cell gravity term on each side.
pub fn dirichlet_flux(
    normal: FaceNormal,
    cell: &FaceCell,
    ghost: &FaceCell,
    value: f64,
    params: &DarcyParams,
) -> f64 {
    let axis = normal.axis();
    let area = params.area(axis);
    let scale = area * cell.permeability / params.viscosity * 2.0;

    match axis {
        Axis::X | Axis::Y => {
            let h = params.spacing[axis.index()];
            let (diff, mob) = if normal.is_upper() {
                (
                    cell.pressure - value,
                    upstream_mean(cell.pressure, value, cell.mobility, ghost.mobility),
                )
            } else {
                (
                    value - cell.pressure,
                    upstream_mean(value, cell.pressure, ghost.mobility, cell.mobility),
                )
            };
            mob * scale * diff / h
        }
        Axis::Z => {
            let dz = params.spacing[2];
            let half_weight = 0.25 * cell.density * params.gravity;
            let (lower, upper, lower_mob, upper_mob) = if normal.is_upper() {
                (
                    cell.pressure / dz - half_weight,
                    value / dz + half_weight,
                    cell.mobility,
                    ghost.mobility,
                )
            } else {
                (
                    value / dz - half_weight,
                    cell.pressure / dz + half_weight,
                    ghost.mobility,
                    cell.mobility,
                )
            };
            let mob = upstream_mean(lower, upper, lower_mob, upper_mob);
            mob * scale * (lower - upper)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cell(pressure: f64) -> FaceCell {
        FaceCell {
            pressure,
            density: 1.0,
            permeability: 1.0,
            mobility: 1.0,
        }
    }

    #[test]
    fn test_lateral_flux_unit_cells() {
        let params = DarcyParams::new([1.0; 3], 1.0, 0.0);
        assert_relative_eq!(face_flux(Axis::X, &cell(1.0), &cell(0.0), &params), 1.0);
        assert_relative_eq!(face_flux(Axis::Y, &cell(0.0), &cell(1.0), &params), -1.0);
    }

    #[test]
    fn test_zero_difference_is_exactly_zero() {
        let params = DarcyParams::new([0.5, 2.0, 0.1], 1.3, 0.0);
        for axis in Axis::ALL {
            let f = face_flux(axis, &cell(-2.0), &cell(-2.0), &params);
            assert_eq!(f, 0.0);
            assert!(f.is_finite());
        }
    }

    #[test]
    fn test_vertical_hydrostatic_balance() {
        // p decreasing upward by rho g dz: no flow
        let params = DarcyParams::new([1.0, 1.0, 0.5], 1.0, 2.0);
        let lo = cell(1.0);
        let hi = cell(1.0 - 1.0 * 2.0 * 0.5);
        assert_relative_eq!(face_flux(Axis::Z, &lo, &hi, &params), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_upstream_mobility_selected() {
        let params = DarcyParams::new([1.0; 3], 1.0, 0.0);
        let wet = FaceCell {
            mobility: 0.8,
            ..cell(1.0)
        };
        let dry = FaceCell {
            mobility: 0.1,
            ..cell(0.0)
        };
        assert_relative_eq!(face_flux(Axis::X, &wet, &dry, &params), 0.8);
        assert_relative_eq!(face_flux(Axis::X, &dry, &wet, &params), -0.8);
    }

    #[test]
    fn test_dirichlet_flux_signs() {
        let params = DarcyParams::new([1.0; 3], 1.0, 0.0);
        let c = cell(1.0);
        let g = cell(0.0);
        // outflow through +x: cell pressure above boundary value
        assert_relative_eq!(dirichlet_flux(FaceNormal::XUpper, &c, &g, 0.0, &params), 2.0);
        // through -x the flux is measured along +x, so outflow is negative
        assert_relative_eq!(dirichlet_flux(FaceNormal::XLower, &c, &g, 0.0, &params), -2.0);
        // equal pressures: nothing moves
        assert_eq!(dirichlet_flux(FaceNormal::YUpper, &c, &g, 1.0, &params), 0.0);
    }

    #[test]
    fn test_dirichlet_flux_vertical_gravity() {
        // quarter-cell weights: p/dz - rho g/4 vs value/dz + rho g/4
        let params = DarcyParams::new([1.0, 1.0, 1.0], 1.0, 4.0);
        let c = cell(3.0);
        let g = cell(0.0);
        let f = dirichlet_flux(FaceNormal::ZUpper, &c, &g, 1.0, &params);
        // lower = 3 - 1 = 2, upper = 1 + 1 = 2
        assert_eq!(f, 0.0);
        let f = dirichlet_flux(FaceNormal::ZLower, &c, &g, 5.0, &params);
        // lower = 5 - 1 = 4, upper = 3 + 1 = 4
        assert_eq!(f, 0.0);
    }
}
