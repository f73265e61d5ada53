//! Boundary-condition handling inside the residual: Dirichlet ghost
//! injection and per-face flux corrections.

use log::trace;

use super::stencil::StencilFields;
use crate::boundary::{BoundaryFace, BoundaryKind, BoundaryPatchSet, PatchFaces};
use crate::flux::{DarcyParams, dirichlet_flux};
use crate::grid::{GeometryMask, Subvector};
use crate::overland::{
    ColumnScratch, RoutingContext, RoutingOutput, SurfaceParams, compute_discharge, route_patch,
};

/// Write every Dirichlet value into the pressure ghost across its face.
pub(crate) fn inject_dirichlet(pressure: &mut Subvector, patches: &BoundaryPatchSet, subgrid: usize) {
    for patch in patches.of_kind(BoundaryKind::Dirichlet) {
        if let Some(faces) = patch.faces_on(subgrid) {
            for (face, value) in faces.iter() {
                pressure.set(face.neighbor(), value);
            }
        }
    }
}

/// Flux the interior stencil applied at `face`, measured along +axis.
///
/// An upper face was seen from its own cell. A lower face was seen only if
/// the neighbour below is interior; otherwise nothing was applied.
fn stencil_flux(
    face: &BoundaryFace,
    fields: &StencilFields<'_>,
    params: &DarcyParams,
    mask: &dyn GeometryMask,
) -> f64 {
    let axis = face.normal.axis();
    if face.normal.is_upper() {
        fields.upper_flux(face.cell, axis, params)
    } else {
        let below = face.neighbor();
        if mask.is_interior(below) {
            fields.upper_flux(below, axis, params)
        } else {
            0.0
        }
    }
}

/// Surface discharge for every overland patch on one subgrid.
pub(crate) fn overland_discharge(
    patches: &BoundaryPatchSet,
    subgrid: usize,
    pressure: &Subvector,
    surface: SurfaceParams<'_>,
    scratch: &mut ColumnScratch,
) {
    for patch in patches.of_kind(BoundaryKind::Overland) {
        if let Some(faces) = patch.faces_on(subgrid) {
            compute_discharge(faces, pressure, surface, scratch);
        }
    }
}

/// Everything the corrections on one subgrid read.
pub(crate) struct CorrectionInputs<'a> {
    pub fields: StencilFields<'a>,
    pub old_pressure: &'a Subvector,
    pub params: DarcyParams,
    pub routing: RoutingContext,
    pub mask: &'a dyn GeometryMask,
    pub dt: f64,
}

/// Fields on one subgrid written by the corrections.
pub(crate) struct CorrectionOutputs<'a> {
    pub residual: &'a mut Subvector,
    pub overland_flux: &'a mut Subvector,
    pub scratch: &'a mut ColumnScratch,
}

/// Apply every patch's correction on one subgrid.
///
/// Returns the south-west outflow if an overland patch on this subgrid
/// covers the global column `(0, 0)`.
pub(crate) fn apply_corrections(
    patches: &BoundaryPatchSet,
    subgrid: usize,
    inputs: &CorrectionInputs<'_>,
    out: CorrectionOutputs<'_>,
) -> Option<f64> {
    let CorrectionOutputs {
        residual,
        overland_flux,
        scratch,
    } = out;
    let mut outflow = None;

    for patch in patches.iter() {
        let Some(faces) = patch.faces_on(subgrid) else {
            continue;
        };
        if faces.is_empty() {
            continue;
        }
        trace!(
            "subgrid {}: {} patch '{}' with {} faces",
            subgrid,
            patch.kind,
            patch.name,
            faces.len()
        );

        match patch.kind {
            BoundaryKind::Dirichlet => apply_dirichlet(residual, faces, inputs),
            BoundaryKind::Flux => apply_flux(residual, faces, inputs),
            BoundaryKind::Overland => {
                apply_flux(residual, faces, inputs);
                let routed = route_patch(
                    faces,
                    &inputs.routing,
                    inputs.fields.pressure,
                    inputs.old_pressure,
                    scratch,
                    RoutingOutput {
                        residual: &mut *residual,
                        overland_flux: &mut *overland_flux,
                    },
                );
                if routed.is_some() {
                    outflow = routed;
                }
            }
        }
    }

    outflow
}

/// Replace the stencil flux with the one-sided flux to the prescribed
/// pressure.
fn apply_dirichlet(residual: &mut Subvector, faces: &PatchFaces, inputs: &CorrectionInputs<'_>) {
    for (face, value) in faces.iter() {
        let axis = face.normal.axis();
        let dir = face.normal.sign();
        let old = stencil_flux(face, &inputs.fields, &inputs.params, inputs.mask);
        let new = dirichlet_flux(
            face.normal,
            &inputs.fields.face_cell(face.cell, axis),
            &inputs.fields.face_cell(face.neighbor(), axis),
            value,
            &inputs.params,
        );
        residual.add(face.cell, -inputs.dt * dir * old);
        residual.add(face.cell, inputs.dt * dir * new);
    }
}

/// Replace the stencil flux with `area * value`.
fn apply_flux(residual: &mut Subvector, faces: &PatchFaces, inputs: &CorrectionInputs<'_>) {
    for (face, value) in faces.iter() {
        let dir = face.normal.sign();
        let old = stencil_flux(face, &inputs.fields, &inputs.params, inputs.mask);
        let new = inputs.params.area(face.normal.axis()) * value;
        residual.add(face.cell, -inputs.dt * dir * old);
        residual.add(face.cell, inputs.dt * dir * new);
    }
}
