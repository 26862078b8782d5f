//! Field path resolution with implicit array traversal

use serde_json::{Map, Value};

use super::FieldPath;

/// Candidates for a path plus whether any branch ended on an object that
/// lacks the next segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution<'a> {
    pub values: Vec<&'a Value>,
    pub gap: bool,
}

/// Resolves `path` against a record's top-level fields.
///
/// Returns every candidate value in document order. A missing segment
/// anywhere yields no candidates for that branch, never an error. Arrays met
/// before the last segment fan out: the rest of the path is applied to each
/// element. A numeric segment additionally addresses the element at that
/// position. The value at the last segment is returned as is, arrays
/// included.
pub fn resolve<'a>(fields: &'a Map<String, Value>, path: &FieldPath) -> Vec<&'a Value> {
    resolve_with_gaps(fields, path).values
}

/// Like [`resolve`], also reporting branches that stopped at a missing key.
pub fn resolve_with_gaps<'a>(fields: &'a Map<String, Value>, path: &FieldPath) -> Resolution<'a> {
    let mut resolution = Resolution::default();
    if let Some((head, rest)) = path.segments().split_first() {
        match fields.get(head) {
            Some(value) => walk(value, rest, &mut resolution, true),
            None => resolution.gap = true,
        }
    }
    resolution
}

/// Resolves `path` starting from an arbitrary value rather than a field map.
pub fn resolve_value<'a>(root: &'a Value, path: &FieldPath) -> Vec<&'a Value> {
    resolve_value_with_gaps(root, path).values
}

/// Like [`resolve_value`], also reporting branches that stopped at a missing key.
pub fn resolve_value_with_gaps<'a>(root: &'a Value, path: &FieldPath) -> Resolution<'a> {
    let mut resolution = Resolution::default();
    walk(root, path.segments(), &mut resolution, true);
    resolution
}

/// First candidate only. Used where a single value per record is needed.
pub fn lookup<'a>(fields: &'a Map<String, Value>, path: &FieldPath) -> Option<&'a Value> {
    if path.is_top_level() {
        return fields.get(&path.segments()[0]);
    }
    resolve(fields, path).into_iter().next()
}

// `track_gaps` is off for the element-wise branch of a positional segment:
// elements lacking a key named "0" are not missing the field.
fn walk<'a>(current: &'a Value, rest: &[String], out: &mut Resolution<'a>, track_gaps: bool) {
    let Some((segment, tail)) = rest.split_first() else {
        out.values.push(current);
        return;
    };

    match current {
        Value::Object(map) => match map.get(segment) {
            Some(next) => walk(next, tail, out, track_gaps),
            None => out.gap |= track_gaps,
        },
        Value::Array(items) => {
            let index = segment.parse::<usize>().ok();
            if let Some(item) = index.and_then(|i| items.get(i)) {
                walk(item, tail, out, track_gaps);
            }
            for item in items {
                walk(item, rest, out, track_gaps && index.is_none());
            }
        }
        _ => {}
    }
}
