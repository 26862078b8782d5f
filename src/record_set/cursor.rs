//! Lazy query cursor
//!
//! Pull-based evaluation over a snapshot of a record set. Matching, skip,
//! limit and projection are applied one record at a time as the cursor is
//! advanced. A cursor is finite and cannot be restarted.

use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event};
use crate::projection::{self, ProjectionSpec, RawProjection};
use crate::query::Query;

use super::document::Document;

/// Execution options for [`Cursor`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorOptions {
    /// Matches to pass over before yielding
    pub skip: usize,
    /// Maximum number of records to yield
    pub limit: Option<usize>,
    /// Projection applied to each yielded record
    pub projection: Option<RawProjection>,
}

impl CursorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn projection(mut self, spec: impl Into<RawProjection>) -> Self {
        self.projection = Some(spec.into());
        self
    }
}

/// Lazily evaluated query results
pub struct Cursor<T> {
    records: Arc<[Arc<T>]>,
    query: Query,
    position: usize,
    to_skip: usize,
    remaining: Option<usize>,
    projection: Option<ProjectionSpec>,
    yielded: usize,
    exhausted: bool,
}

impl<T: Document> Cursor<T> {
    pub(crate) fn open(records: Arc<[Arc<T>]>, query: Query, options: CursorOptions) -> Self {
        let total = records.len().to_string();
        log_event_with_fields(Event::CursorOpened, &[("records", &total)]);

        Self {
            records,
            query,
            position: 0,
            to_skip: options.skip,
            remaining: options.limit,
            projection: options.projection.as_ref().map(ProjectionSpec::resolve),
            yielded: 0,
            exhausted: false,
        }
    }

    /// Records yielded so far
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn finish(&mut self) {
        if !self.exhausted {
            self.exhausted = true;
            let yielded = self.yielded.to_string();
            log_event_with_fields(Event::CursorExhausted, &[("yielded", &yielded)]);
        }
    }
}

impl<T: Document> Iterator for Cursor<T> {
    type Item = Arc<T>;

    fn next(&mut self) -> Option<Arc<T>> {
        if self.exhausted || self.remaining == Some(0) {
            self.finish();
            return None;
        }

        while let Some(record) = self.records.get(self.position) {
            self.position += 1;
            if !self.query.matches(&**record) {
                continue;
            }
            if self.to_skip > 0 {
                self.to_skip -= 1;
                continue;
            }

            if let Some(remaining) = self.remaining.as_mut() {
                *remaining -= 1;
            }
            self.yielded += 1;
            return Some(match &self.projection {
                Some(spec) => Arc::new(projection::project(&**record, spec)),
                None => Arc::clone(record),
            });
        }

        self.finish();
        None
    }
}
