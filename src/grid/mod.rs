//! Structured-grid partition, distributed fields, halo exchange and masks.
//!
//! A [`Partition`] is the set of [`Subgrid`]s local to one process. Every
//! [`DistributedField`] holds one [`Subvector`] per subgrid, indexed by
//! global cell indices and padded with a ghost halo that a
//! [`HaloExchange`] refreshes.

mod field;
mod halo;
mod mask;
mod subgrid;

pub use field::{DistributedField, FieldLayout, Subvector};
pub use halo::{HaloExchange, LocalHaloExchange, NoHaloExchange};
pub use mask::{BoxMask, GeometryMask, IndicatorMask, exterior_cells, interior_cells};
pub use subgrid::{Partition, Subgrid};
