//! Interior seven-point flux stencil.

use crate::flux::{DarcyParams, FaceCell, face_flux};
use crate::grid::{GeometryMask, Subvector, interior_cells};
use crate::types::{Axis, CellIndex, IndexBox};

/// Read-only fields the face fluxes need on one subgrid.
#[derive(Clone, Copy)]
pub(crate) struct StencilFields<'a> {
    pub pressure: &'a Subvector,
    pub density: &'a Subvector,
    pub rel_perm: &'a Subvector,
    /// Permeability along x, y, z
    pub permeability: [&'a Subvector; 3],
}

impl StencilFields<'_> {
    /// Values of `cell` seen from a face normal to `axis`.
    #[inline]
    pub fn face_cell(&self, cell: CellIndex, axis: Axis) -> FaceCell {
        let density = self.density.get(cell);
        FaceCell {
            pressure: self.pressure.get(cell),
            density,
            permeability: self.permeability[axis.index()].get(cell),
            mobility: self.rel_perm.get(cell) * density,
        }
    }

    /// Flux from `cell` to its +axis neighbour.
    #[inline]
    pub fn upper_flux(&self, cell: CellIndex, axis: Axis, params: &DarcyParams) -> f64 {
        let upper = cell.step(axis.upper());
        face_flux(
            axis,
            &self.face_cell(cell, axis),
            &self.face_cell(upper, axis),
            params,
        )
    }
}

/// Add `+dt * flux` to every interior cell and `-dt * flux` to its +x, +y,
/// +z neighbours.
///
/// Cells are visited over the owned box grown by one on the low side, so a
/// face shared with a lower subgrid is seen from both owners.
pub(crate) fn accumulate_fluxes(
    residual: &mut Subvector,
    owned: IndexBox,
    mask: &dyn GeometryMask,
    fields: &StencilFields<'_>,
    params: &DarcyParams,
    dt: f64,
) {
    for cell in interior_cells(mask, owned.grow_lower()) {
        let fluxes = Axis::ALL.map(|axis| fields.upper_flux(cell, axis, params));

        residual.add(cell, dt * (fluxes[0] + fluxes[1] + fluxes[2]));
        for (axis, flux) in Axis::ALL.into_iter().zip(fluxes) {
            residual.add(cell.step(axis.upper()), -dt * flux);
        }
    }
}
