//! Strongly-typed index and direction types.
//!
//! Cell indices are global `(i, j, k)` triples, face normals are a closed
//! enum instead of integer triples, and per-side data uses named fields.
//!
//! # Example
//!
//! ```
//! use richards_fv::types::{CellIndex, FaceNormal, IndexBox};
//!
//! let bx = IndexBox::from_extent([4, 3, 2]);
//! let corner = CellIndex::new(3, 2, 1);
//! assert!(bx.contains(corner));
//! assert!(!bx.contains(corner.step(FaceNormal::XUpper)));
//! ```

mod direction;
mod index;
mod sides;

pub use direction::{Axis, FaceNormal};
pub use index::{CellIndex, IndexBox};
pub use sides::BoxSides;
