//! Bound metadata: the resolved, immutable view handed to document code.
//!
//! Handles are cheap to clone. Each shares its binding with every other handle
//! produced by the same request on the same [`Schema`], so identity can be
//! compared with `ptr_eq`.
//!
//! [`Schema`]: crate::Schema

mod attribute;
mod element;
mod iter;

pub use attribute::AttributeMetadata;
pub use element::ElementMetadata;
pub use iter::{AttributeIter, ElementIter};
