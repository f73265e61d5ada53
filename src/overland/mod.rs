//! Kinematic-wave overland routing on the land surface.
//!
//! Ponded water (positive pressure in a top cell) flows down the surface
//! slope with Manning's law
//!
//! ```text
//! q = dir * sqrt(|S|) / n * max(p, 0)^(5/3),   dir = -sign(S)
//! ```
//!
//! and is split into upwinded face fluxes `KE`, `KW`, `KN`, `KS` per column.
//! The column balance (storage change plus net lateral outflow) is added to
//! the residual of the top cell. Only overland faces with outward normal
//! `+z` take part.
//!
//! Routing runs in two passes. [`compute_discharge`] fills `qx`/`qy` for the
//! columns a subgrid routes, [`OverlandScratch::share_discharge`] hands those
//! values to every subgrid storing the column, and [`route_patch`] then does
//! the upwind split and the column balance.

use log::trace;

use crate::boundary::PatchFaces;
use crate::grid::{Partition, Subvector};
use crate::types::{CellIndex, FaceNormal, IndexBox};

/// Flow direction along one axis: -1 for positive slope, +1 for negative, 0
/// for flat.
#[inline]
pub fn flow_direction(slope: f64) -> f64 {
    if slope > 0.0 {
        -1.0
    } else if slope < 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Manning discharge per unit width along one axis.
///
/// Roughness 0 is not guarded and yields a non-finite result.
///
/// # Example
///
/// ```
/// use richards_fv::overland::kinematic_discharge;
///
/// // downhill toward -x for a positive slope
/// let q = kinematic_discharge(0.04, 0.5, 1.0);
/// assert!((q + 0.4).abs() < 1e-12);
/// // dry surface: no flow
/// assert_eq!(kinematic_discharge(0.04, 0.5, -1.0), 0.0);
/// ```
#[inline]
pub fn kinematic_discharge(slope: f64, mannings: f64, pressure: f64) -> f64 {
    flow_direction(slope) * (slope.abs().sqrt() / mannings) * pressure.max(0.0).powf(5.0 / 3.0)
}

/// Per-column routing scratch for one subgrid.
///
/// `qx` and `qy` cover the subgrid's footprint plus one ring of ghost
/// columns. A column carries discharge only if some subgrid routes an
/// overland face there; every other column holds 0.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnScratch {
    pub ke: Subvector,
    pub kw: Subvector,
    pub kn: Subvector,
    pub ks: Subvector,
    pub qx: Subvector,
    pub qy: Subvector,
    footprint: IndexBox,
    /// Layer of the land-surface face that set `qx`/`qy`, per stored column
    layer: Vec<Option<i32>>,
}

impl ColumnScratch {
    fn zeros(footprint: IndexBox) -> Self {
        let data_box = footprint.grow([1, 1, 0]);
        let zeros = Subvector::new(data_box, 0.0);
        let columns = zeros.as_slice().len();
        Self {
            ke: zeros.clone(),
            kw: zeros.clone(),
            kn: zeros.clone(),
            ks: zeros.clone(),
            qx: zeros.clone(),
            qy: zeros,
            footprint,
            layer: vec![None; columns],
        }
    }

    /// Layer of the routed face in `column`, if one was routed here.
    pub fn surface_layer(&self, column: CellIndex) -> Option<i32> {
        self.layer[self.qx.index(column)]
    }

    fn set_discharge(&mut self, column: CellIndex, layer: Option<i32>, qx: f64, qy: f64) {
        let idx = self.qx.index(column);
        self.layer[idx] = layer;
        self.qx.as_mut_slice()[idx] = qx;
        self.qy.as_mut_slice()[idx] = qy;
    }
}

/// Routing scratch for every subgrid; lives for one residual evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlandScratch {
    pub columns: Vec<ColumnScratch>,
}

impl OverlandScratch {
    pub fn new(partition: &Partition) -> Self {
        Self {
            columns: partition
                .subgrids()
                .iter()
                .map(|sg| ColumnScratch::zeros(sg.surface()))
                .collect(),
        }
    }

    /// Make every subgrid see the same discharge in every stored column.
    ///
    /// A column's discharge comes from the subgrid that routed its highest
    /// land-surface face, whichever subgrid stores the column. Columns that
    /// no subgrid routed get 0.
    pub fn share_discharge(&mut self) {
        let mut updates: Vec<(usize, CellIndex, Option<i32>, f64, f64)> = Vec::new();
        for (n, scratch) in self.columns.iter().enumerate() {
            for column in scratch.qx.data_box().cells() {
                let source = self
                    .columns
                    .iter()
                    .filter(|other| other.footprint.contains(column))
                    .filter_map(|other| other.surface_layer(column).map(|k| (k, other)))
                    .max_by_key(|(k, _)| *k);
                let (layer, qx, qy) = match source {
                    Some((k, other)) => (Some(k), other.qx.get(column), other.qy.get(column)),
                    None => (None, 0.0, 0.0),
                };
                updates.push((n, column, layer, qx, qy));
            }
        }

        trace!(
            "overland: shared discharge over {} columns in {} subgrids",
            updates.len(),
            self.columns.len()
        );

        for (n, column, layer, qx, qy) in updates {
            self.columns[n].set_discharge(column, layer, qx, qy);
        }
    }
}

/// Surface properties of one subgrid.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceParams<'a> {
    pub x_slope: &'a Subvector,
    pub y_slope: &'a Subvector,
    pub mannings: &'a Subvector,
}

/// Time step, spacing and global extents needed by the routing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoutingContext {
    pub dt: f64,
    /// Cell spacing [dx, dy, dz]
    pub spacing: [f64; 3],
    /// Global extents [NX, NY]
    pub global: [usize; 2],
}

/// Surface fields of one subgrid written by the routing.
pub struct RoutingOutput<'a> {
    pub residual: &'a mut Subvector,
    pub overland_flux: &'a mut Subvector,
}

fn land_surface_faces(faces: &PatchFaces) -> impl Iterator<Item = CellIndex> + '_ {
    faces
        .faces
        .iter()
        .filter(|f| f.normal == FaceNormal::ZUpper)
        .map(|f| f.cell)
}

/// Manning discharge in each column holding a `+z` face of this patch,
/// from the pressure of the face's own cell.
///
/// If a column holds several faces the highest one wins. Run this for
/// every overland patch on every subgrid, then
/// [`OverlandScratch::share_discharge`], before [`route_patch`].
pub fn compute_discharge(
    faces: &PatchFaces,
    pressure: &Subvector,
    surface: SurfaceParams<'_>,
    scratch: &mut ColumnScratch,
) {
    for cell in land_surface_faces(faces) {
        let column = cell.column();
        if scratch.surface_layer(column).is_some_and(|k| k > cell.k) {
            continue;
        }
        let p = pressure.get(cell);
        let n = surface.mannings.get(column);
        let qx = kinematic_discharge(surface.x_slope.get(column), n, p);
        let qy = kinematic_discharge(surface.y_slope.get(column), n, p);
        scratch.set_discharge(column, Some(cell.k), qx, qy);
    }
}

/// Route ponded water for the `+z` faces of one overland patch on one
/// subgrid, using the discharge already in `scratch`.
///
/// Adds the column balance to `out.residual` and records the per-column
/// boundary flux. Returns `Some(|KS| + |KW|)` when the patch contains the
/// global south-west column `(0, 0)`.
pub fn route_patch(
    faces: &PatchFaces,
    ctx: &RoutingContext,
    pressure: &Subvector,
    old_pressure: &Subvector,
    scratch: &mut ColumnScratch,
    out: RoutingOutput<'_>,
) -> Option<f64> {
    let [dx, dy, dz] = ctx.spacing;
    let vol = dx * dy * dz;
    let [gnx, gny] = [ctx.global[0] as i32, ctx.global[1] as i32];
    let mut outflow = None;

    for cell in land_surface_faces(faces) {
        let c = cell.column();
        let qx = scratch.qx.get(c);
        let qy = scratch.qy.get(c);
        let qx_east = scratch.qx.get(c.offset(1, 0, 0));
        let qx_west = scratch.qx.get(c.offset(-1, 0, 0));
        let qy_north = scratch.qy.get(c.offset(0, 1, 0));
        let qy_south = scratch.qy.get(c.offset(0, -1, 0));

        let ke = qx.max(0.0) - (-qx_east).max(0.0);
        let kw = qx_west.max(0.0) - (-qx).max(0.0);
        let kn = qy.max(0.0) - (-qy_north).max(0.0);
        let ks = qy_south.max(0.0) - (-qy).max(0.0);
        scratch.ke.set(c, ke);
        scratch.kw.set(c, kw);
        scratch.kn.set(c, kn);
        scratch.ks.set(c, ks);

        let storage = vol * (pressure.get(cell).max(0.0) - old_pressure.get(cell).max(0.0)) / dz;
        let lateral = ctx.dt * vol * ((ke - kw) / dx + (kn - ks) / dy) / dz;
        out.residual.add(cell, storage + lateral);

        out.overland_flux.set(c, edge_flux(c.i, c.j, gnx, gny, qx, qy));

        if c.i == 0 && c.j == 0 {
            outflow = Some(ks.abs() + kw.abs());
        }
    }

    outflow
}

/// Boundary flux recorded for column `(i, j)`; the first matching edge wins.
fn edge_flux(i: i32, j: i32, gnx: i32, gny: i32, qx: f64, qy: f64) -> f64 {
    let on_x = (0..gnx).contains(&i);
    let on_y = (0..gny).contains(&j);
    if on_x && j == 0 && qy < 0.0 {
        qy.abs()
    } else if i == 0 && on_y && qx < 0.0 {
        qx.abs()
    } else if on_x && j == gny - 1 && qy > 0.0 {
        qy.abs()
    } else if i == gnx - 1 && on_y && qx > 0.0 {
        qx.abs()
    } else if i > 0 && i < gnx - 1 && j > 0 && j < gny - 1 {
        qx
    } else {
        0.0
    }
}
