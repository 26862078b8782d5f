//! Multi-key ordering
//!
//! - [`SortKey`]: field path plus direction, parsed from `"field"` or
//!   `"-field"` tokens
//! - [`build_comparator`]: composite, type-aware comparator
//!
//! Sorting itself always uses a stable sort so records equal on every key
//! keep their relative order.

mod comparator;
mod key;

pub use comparator::build_comparator;
pub use key::{InvalidDirection, SortDirection, SortKey};
