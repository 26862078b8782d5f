//! The immutable record set
//!
//! A set owns a shared, never-mutated sequence of record references. Every
//! operation returns a new value; records that survive an operation
//! unchanged are shared with the source set, not copied.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::cursor::{Cursor, CursorOptions};
use super::document::{overlay, Document};
use super::errors::ConstructionError;
use super::group::Groups;
use crate::config::EngineConfig;
use crate::observability::{log_event_with_fields, Event};
use crate::path::{self, FieldPath};
use crate::projection::{self, ProjectionSpec, RawProjection};
use crate::query::{Query, QueryResult};
use crate::sort::{build_comparator, SortDirection, SortKey};
use crate::value::{kind_name, values_equal};

/// An ordered, immutable sequence of records
pub struct RecordSet<T> {
    records: Arc<[Arc<T>]>,
    config: EngineConfig,
}

// ============================================================================
// Construction
// ============================================================================

impl<T> RecordSet<T> {
    /// Builds a set from owned records.
    pub fn of(records: Vec<T>) -> Self {
        records.into_iter().collect()
    }

    pub fn empty() -> Self {
        Self::from_shared(Vec::new(), EngineConfig::default())
    }

    pub(crate) fn from_shared(records: Vec<Arc<T>>, config: EngineConfig) -> Self {
        Self {
            records: records.into(),
            config,
        }
    }

    /// Returns the same records under `config`.
    pub fn with_config(&self, config: EngineConfig) -> Self {
        Self {
            records: Arc::clone(&self.records),
            config,
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub(crate) fn shared(&self) -> &[Arc<T>] {
        &self.records
    }

    /// New set over `records` inheriting this set's config.
    fn derive(&self, records: Vec<Arc<T>>) -> Self {
        Self::from_shared(records, self.config)
    }

    /// Same references, in a fresh sequence.
    fn references(&self) -> Vec<Arc<T>> {
        self.records.to_vec()
    }
}

impl<T: DeserializeOwned> RecordSet<T> {
    /// Builds a set from a JSON array. `null` yields an empty set; any other
    /// non-array input is rejected.
    pub fn from_json(input: Value) -> Result<Self, ConstructionError> {
        let items = match input {
            Value::Array(items) => items,
            Value::Null => return Ok(Self::empty()),
            other => {
                let err = ConstructionError::NotASequence {
                    found: kind_name(&other),
                };
                reject(&err);
                return Err(err);
            }
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value(item) {
                Ok(record) => records.push(record),
                Err(source) => {
                    let err = ConstructionError::InvalidRecord {
                        index,
                        reason: source.to_string(),
                    };
                    reject(&err);
                    return Err(err);
                }
            }
        }
        Ok(Self::of(records))
    }
}

fn reject(err: &ConstructionError) {
    let reason = err.to_string();
    log_event_with_fields(
        Event::ConstructionRejected,
        &[("code", err.code()), ("reason", &reason)],
    );
}

impl<T> Clone for RecordSet<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            config: self.config,
        }
    }
}

impl<T> Default for RecordSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: fmt::Debug> fmt::Debug for RecordSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for RecordSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T> FromIterator<T> for RecordSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_shared(iter.into_iter().map(Arc::new).collect(), EngineConfig::default())
    }
}

impl<T> From<Vec<T>> for RecordSet<T> {
    fn from(records: Vec<T>) -> Self {
        Self::of(records)
    }
}

// ============================================================================
// Accessors and iteration
// ============================================================================

impl<T> RecordSet<T> {
    /// Defensive copy of the record references.
    pub fn all(&self) -> Vec<Arc<T>> {
        self.references()
    }

    /// Owned copies of every record.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Record at `index`; negative indices count from the end.
    pub fn at(&self, index: isize) -> Option<&T> {
        let len = self.len() as isize;
        let position = if index < 0 { len + index } else { index };
        if position < 0 || position >= len {
            return None;
        }
        self.records.get(position as usize).map(|r| &**r)
    }

    pub fn first(&self) -> Option<&T> {
        self.records.first().map(|r| &**r)
    }

    pub fn last(&self) -> Option<&T> {
        self.records.last().map(|r| &**r)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.records.iter(),
        }
    }

    /// True if both sets share the same backing sequence.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}

/// Borrowing iterator over a record set
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    inner: std::slice::Iter<'a, Arc<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|r| &**r)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|r| &**r)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a RecordSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

// ============================================================================
// Slicing
// ============================================================================

impl<T> RecordSet<T> {
    /// Drops the first `n` records.
    pub fn skip(&self, n: usize) -> Self {
        if n == 0 {
            return self.clone();
        }
        self.derive(self.records.iter().skip(n).cloned().collect())
    }

    /// Keeps at most the first `n` records.
    pub fn limit(&self, n: usize) -> Self {
        self.derive(self.records.iter().take(n).cloned().collect())
    }

    /// One-based page of `page_size` records. Page 0, size 0, or a page past
    /// the end yields an empty set.
    pub fn page(&self, page: usize, page_size: usize) -> Self {
        if page < 1 || page_size < 1 {
            return self.derive(Vec::new());
        }
        match (page - 1).checked_mul(page_size) {
            Some(start) if start < self.len() => self.skip(start).limit(page_size),
            _ => self.derive(Vec::new()),
        }
    }

    /// Number of pages of `page_size` records; 0 for a zero page size.
    pub fn page_count(&self, page_size: usize) -> usize {
        if page_size == 0 {
            return 0;
        }
        self.len().div_ceil(page_size)
    }

    /// Array-style slice: negative bounds count from the end, `end` defaults
    /// to the length and out-of-range bounds are clamped.
    pub fn slice(&self, start: isize, end: Option<isize>) -> Self {
        let len = self.len() as isize;
        let clamp = |bound: isize| {
            if bound < 0 {
                (len + bound).max(0)
            } else {
                bound.min(len)
            }
        };
        let from = clamp(start);
        let to = end.map_or(len, clamp);
        if to <= from {
            return self.derive(Vec::new());
        }
        self.derive(self.records[from as usize..to as usize].to_vec())
    }
}

// ============================================================================
// Transformation
// ============================================================================

impl<T> RecordSet<T> {
    /// Maps every record into a new set.
    pub fn map<U, F>(&self, f: F) -> RecordSet<U>
    where
        F: FnMut(&T) -> U,
    {
        let mapped: RecordSet<U> = self.iter().map(f).collect();
        mapped.with_config(self.config)
    }

    /// Maps every record to zero or more records, flattened one level.
    pub fn flat_map<U, I, F>(&self, f: F) -> RecordSet<U>
    where
        I: IntoIterator<Item = U>,
        F: FnMut(&T) -> I,
    {
        let mapped: RecordSet<U> = self.iter().flat_map(f).collect();
        mapped.with_config(self.config)
    }

    /// Folds the records in order, starting from `initial`.
    pub fn reduce<A, F>(&self, initial: A, f: F) -> A
    where
        F: FnMut(A, &T) -> A,
    {
        self.iter().fold(initial, f)
    }

    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(f)
    }

    /// This set followed by `other`.
    pub fn concat(&self, other: &RecordSet<T>) -> Self {
        let mut records = self.references();
        records.extend(other.records.iter().cloned());
        self.derive(records)
    }

    pub fn reverse(&self) -> Self {
        self.derive(self.records.iter().rev().cloned().collect())
    }

    /// Inserts `records` at `index`; an absent or out-of-range index appends.
    pub fn add<I>(&self, records: I, index: Option<usize>) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut merged = self.references();
        let at = index.filter(|&i| i <= merged.len()).unwrap_or(merged.len());
        let tail = merged.split_off(at);
        merged.extend(records.into_iter().map(Arc::new));
        merged.extend(tail);
        self.derive(merged)
    }

    /// Stable sort with a caller-supplied comparator.
    pub fn sort<F>(&self, mut compare: F) -> Self
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut records = self.references();
        records.sort_by(|a, b| compare(&**a, &**b));
        self.derive(records)
    }

    /// Groups records by a derived key.
    pub fn group_by<K, F>(&self, key_fn: F) -> Groups<K, T>
    where
        K: Eq + Hash + Clone,
        F: FnMut(&T) -> K,
    {
        Groups::build(self.records.iter(), self.config, key_fn)
    }
}

// ============================================================================
// Query operations
// ============================================================================

impl<T: Document> RecordSet<T> {
    /// Compiles a query document under this set's config.
    pub fn compile(&self, document: &Value) -> QueryResult<Query> {
        Query::parse_with(document, &self.config)
    }

    /// Records matching `query`. The empty query returns this very set.
    pub fn find(&self, query: &Query) -> Self {
        if query.is_empty() {
            return self.clone();
        }
        self.derive(
            self.records
                .iter()
                .filter(|r| query.matches(&***r))
                .cloned()
                .collect(),
        )
    }

    /// First match; the first record for the empty query.
    pub fn find_one(&self, query: &Query) -> Option<&T> {
        if query.is_empty() {
            return self.first();
        }
        self.iter().find(|r| query.matches(*r))
    }

    /// Position of the first match.
    pub fn find_index(&self, query: &Query) -> Option<usize> {
        self.iter().position(|r| query.matches(r))
    }

    pub fn count(&self, query: &Query) -> usize {
        if query.is_empty() {
            return self.len();
        }
        self.iter().filter(|r| query.matches(*r)).count()
    }

    /// True if any record matches. False on an empty set.
    pub fn exists(&self, query: &Query) -> bool {
        if query.is_empty() {
            return !self.is_empty();
        }
        self.iter().any(|r| query.matches(r))
    }

    /// True if the set is non-empty and every record matches.
    pub fn every(&self, query: &Query) -> bool {
        !self.is_empty() && self.iter().all(|r| query.matches(r))
    }

    /// True if no record matches.
    pub fn none(&self, query: &Query) -> bool {
        !self.exists(query)
    }

    /// Unique values of `field` among matching records, in first-seen
    /// order. A missing field contributes `null`.
    pub fn distinct(&self, field: &str, query: &Query) -> Vec<Value> {
        let path = FieldPath::new(field);
        let mut seen: Vec<Value> = Vec::new();
        for record in self.iter().filter(|r| query.matches(*r)) {
            let value = field_value(record, &path);
            if !seen.iter().any(|existing| values_equal(existing, &value)) {
                seen.push(value);
            }
        }
        seen
    }

    /// Set without any matching record.
    pub fn remove(&self, query: &Query) -> Self {
        self.derive(
            self.records
                .iter()
                .filter(|r| !query.matches(&***r))
                .cloned()
                .collect(),
        )
    }

    /// Set without the first matching record.
    pub fn remove_one(&self, query: &Query) -> Self {
        match self.find_index(query) {
            Some(position) => {
                let mut records = self.references();
                records.remove(position);
                self.derive(records)
            }
            None => self.clone(),
        }
    }

    /// Every match replaced by a copy overlaid with `changes`.
    pub fn update(&self, query: &Query, changes: &Map<String, Value>) -> Self {
        self.derive(
            self.records
                .iter()
                .map(|r| {
                    if query.matches(&**r) {
                        Arc::new(overlay(&**r, changes))
                    } else {
                        Arc::clone(r)
                    }
                })
                .collect(),
        )
    }

    /// Only the first match replaced by a copy overlaid with `changes`.
    pub fn update_one(&self, query: &Query, changes: &Map<String, Value>) -> Self {
        match self.find_index(query) {
            Some(position) => {
                let mut records = self.references();
                records[position] = Arc::new(overlay(&*records[position], changes));
                self.derive(records)
            }
            None => self.clone(),
        }
    }

    /// Lazy cursor over the records matching `condition`.
    pub fn query(&self, condition: &Value, options: CursorOptions) -> QueryResult<Cursor<T>> {
        let query = self.compile(condition)?;
        Ok(Cursor::open(Arc::clone(&self.records), query, options))
    }
}

// ============================================================================
// Shaping and key ordering
// ============================================================================

impl<T: Document> RecordSet<T> {
    /// Value of `field` on every record, in order. Missing fields are `null`.
    pub fn pluck(&self, field: &str) -> Vec<Value> {
        let path = FieldPath::new(field);
        self.iter().map(|r| field_value(r, &path)).collect()
    }

    /// Records reduced to the listed fields.
    pub fn pick(&self, fields: &[&str]) -> Self {
        self.project(&ProjectionSpec::Include(
            fields.iter().map(|f| f.to_string()).collect(),
        ))
    }

    /// Records without the listed fields.
    pub fn omit(&self, fields: &[&str]) -> Self {
        self.project(&ProjectionSpec::Exclude(
            fields.iter().map(|f| f.to_string()).collect(),
        ))
    }

    /// Projects every record through a raw projection spec.
    pub fn select(&self, spec: impl Into<RawProjection>) -> Self {
        self.project(&ProjectionSpec::resolve(&spec.into()))
    }

    pub fn project(&self, spec: &ProjectionSpec) -> Self {
        self.derive(
            self.records
                .iter()
                .map(|r| Arc::new(projection::project(&**r, spec)))
                .collect(),
        )
    }

    /// Stable multi-key sort under this set's collation.
    pub fn sort_by(&self, keys: &[SortKey]) -> Self {
        let compare = build_comparator::<T>(keys, self.config.collation);
        let mut records = self.references();
        records.sort_by(|a, b| compare(&**a, &**b));
        self.derive(records)
    }

    /// Sorts by parallel field and direction lists. Fields without a
    /// direction sort ascending.
    pub fn sort_by_fields(&self, fields: &[&str], directions: &[SortDirection]) -> Self {
        self.sort_by(&SortKey::zip(fields, directions))
    }
}

fn field_value<D: Document + ?Sized>(record: &D, path: &FieldPath) -> Value {
    record
        .fields()
        .and_then(|fields| path::lookup(fields, path))
        .cloned()
        .unwrap_or(Value::Null)
}
