//! Composite comparators over sort keys
//!
//! Each key resolves a single value per record (first candidate). Keys are
//! tried in order and a later key only breaks ties of the earlier ones.
//! `Desc` negates that key's ordering alone, so ties still fall through to
//! the following keys in their own direction. Full ties compare equal and
//! the stable sort keeps input order.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::key::SortKey;
use crate::path;
use crate::record_set::Document;
use crate::value::{total_order, Collation};

/// Builds a comparator for `keys` under `collation`.
pub fn build_comparator<'k, D>(
    keys: &'k [SortKey],
    collation: Collation,
) -> impl Fn(&D, &D) -> Ordering + 'k
where
    D: Document + ?Sized,
{
    move |a: &D, b: &D| compare_by_keys(a.fields(), b.fields(), keys, collation)
}

fn compare_by_keys(
    a: Option<&Map<String, Value>>,
    b: Option<&Map<String, Value>>,
    keys: &[SortKey],
    collation: Collation,
) -> Ordering {
    for key in keys {
        let left = a.and_then(|fields| path::lookup(fields, &key.field));
        let right = b.and_then(|fields| path::lookup(fields, &key.field));
        let ordering = key.direction.apply(total_order(left, right, collation));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
