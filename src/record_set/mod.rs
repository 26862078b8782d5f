//! Record set core
//!
//! - [`RecordSet`]: immutable ordered container with the chainable API
//! - [`Document`]: the named-field view the engine needs from a record
//! - [`Groups`]: ordered result of `group_by`
//! - [`Cursor`]: lazy, pull-based query execution
//!
//! Construction from JSON is the only fallible entry point; every other
//! operation is total and returns `None` or an empty set instead of failing.

mod cursor;
mod document;
mod errors;
mod group;
mod set;

pub use cursor::{Cursor, CursorOptions};
pub use document::Document;
pub use errors::ConstructionError;
pub use group::Groups;
pub use set::{Iter, RecordSet};
