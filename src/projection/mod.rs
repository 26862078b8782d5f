//! Field projection
//!
//! A raw spec (token string, token list or flag map) resolves into a single
//! include-or-exclude decision, which is then applied per record as a
//! shallow copy.

mod apply;
mod spec;

pub use apply::{apply, omit, pick, project};
pub use spec::{ProjectionError, ProjectionSpec, RawProjection};
