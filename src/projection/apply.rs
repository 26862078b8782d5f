//! Pick / omit over a record's top-level fields
//!
//! Both produce a new field map. Values are cloned at the top level only;
//! the input record is never touched.

use serde_json::{Map, Value};

use super::spec::ProjectionSpec;
use crate::record_set::Document;

/// Copies only the named fields that are present.
pub fn pick<'a, I>(fields: &Map<String, Value>, names: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut picked = Map::new();
    for name in names {
        if let Some(value) = fields.get(name) {
            picked.insert(name.to_string(), value.clone());
        }
    }
    picked
}

/// Copies every field except the named ones.
pub fn omit<'a, I>(fields: &Map<String, Value>, names: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut kept = fields.clone();
    for name in names {
        kept.remove(name);
    }
    kept
}

/// Applies a resolved spec to a field map.
pub fn apply(fields: &Map<String, Value>, spec: &ProjectionSpec) -> Map<String, Value> {
    match spec {
        ProjectionSpec::Include(names) => pick(fields, names.iter().map(String::as_str)),
        ProjectionSpec::Exclude(names) => omit(fields, names.iter().map(String::as_str)),
    }
}

/// Applies a resolved spec to a record, producing a new record. A record
/// without a field map projects to an empty one.
pub fn project<D: Document>(record: &D, spec: &ProjectionSpec) -> D {
    let projected = match record.fields() {
        Some(fields) => apply(fields, spec),
        None => Map::new(),
    };
    D::from_fields(projected)
}
