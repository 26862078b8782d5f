//! Record access
//!
//! The engine never looks inside a record beyond its top-level field map.

use serde_json::{Map, Value};

/// A record with named fields
pub trait Document {
    /// The record's top-level fields, or `None` if it has no field map.
    fn fields(&self) -> Option<&Map<String, Value>>;

    /// Builds a record from a field map.
    fn from_fields(fields: Map<String, Value>) -> Self
    where
        Self: Sized;
}

impl Document for Value {
    fn fields(&self) -> Option<&Map<String, Value>> {
        self.as_object()
    }

    fn from_fields(fields: Map<String, Value>) -> Self {
        Value::Object(fields)
    }
}

impl Document for Map<String, Value> {
    fn fields(&self) -> Option<&Map<String, Value>> {
        Some(self)
    }

    fn from_fields(fields: Map<String, Value>) -> Self {
        fields
    }
}

/// Shallow copy of `record` with `changes` written over its fields.
pub(crate) fn overlay<D: Document>(record: &D, changes: &Map<String, Value>) -> D {
    let mut fields = record.fields().cloned().unwrap_or_default();
    for (key, value) in changes {
        fields.insert(key.clone(), value.clone());
    }
    D::from_fields(fields)
}
