//! Mongo-style query language
//!
//! A query document is compiled once into a [`QueryNode`] tree and then
//! evaluated against any number of records.
//!
//! # Flow
//!
//! 1. [`Query::parse`] validates the document and compiles every operator,
//!    including regex patterns. Unknown operators fail here.
//! 2. [`Query::matches`] walks the tree against one record. Matching never
//!    fails.
//!
//! ```
//! use recordset::Query;
//! use serde_json::json;
//!
//! let adults = Query::parse(&json!({"age": {"$gte": 18}})).unwrap();
//! assert!(adults.matches(&json!({"name": "Alice", "age": 30})));
//! assert!(!adults.matches(&json!({"name": "Tim", "age": 9})));
//! ```

mod ast;
mod compiler;
mod errors;
mod matcher;

use std::str::FromStr;

use serde_json::{Map, Value};

pub use ast::{CompareOp, ElemCondition, QueryNode, RegexPattern, ValuePredicate};
pub use errors::{QueryError, QueryResult};

use crate::config::EngineConfig;
use crate::observability::{log_event_with_fields, Event};
use crate::record_set::Document;

/// A compiled, reusable query
#[derive(Debug, Clone)]
pub struct Query {
    root: QueryNode,
}

impl Query {
    /// The empty query; matches every record.
    pub fn all() -> Self {
        Self {
            root: QueryNode::match_all(),
        }
    }

    /// Compiles a query document with the default config.
    pub fn parse(document: &Value) -> QueryResult<Self> {
        Self::parse_with(document, &EngineConfig::default())
    }

    /// Compiles a query document.
    pub fn parse_with(document: &Value, config: &EngineConfig) -> QueryResult<Self> {
        match compiler::compile(document, config) {
            Ok(root) => {
                let nodes = root.node_count().to_string();
                log_event_with_fields(Event::QueryCompiled, &[("nodes", &nodes)]);
                Ok(Self { root })
            }
            Err(err) => {
                let reason = err.to_string();
                log_event_with_fields(
                    Event::QueryRejected,
                    &[("code", err.code()), ("reason", &reason)],
                );
                Err(err)
            }
        }
    }

    /// Wraps an already built tree.
    pub fn from_node(root: QueryNode) -> Self {
        Self { root }
    }

    pub fn node(&self) -> &QueryNode {
        &self.root
    }

    /// True if this query matches every record without evaluation
    pub fn is_empty(&self) -> bool {
        self.root.is_match_all()
    }

    /// Evaluates the query against a record's field map.
    pub fn matches_fields(&self, fields: &Map<String, Value>) -> bool {
        matcher::matches(fields, &self.root)
    }

    /// Evaluates the query against a record. A record without a field map
    /// is evaluated as an empty field map.
    pub fn matches<D: Document + ?Sized>(&self, record: &D) -> bool {
        if self.is_empty() {
            return true;
        }
        match record.fields() {
            Some(fields) => self.matches_fields(fields),
            None => self.matches_fields(&Map::new()),
        }
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::all()
    }
}

impl TryFrom<&Value> for Query {
    type Error = QueryError;

    fn try_from(document: &Value) -> QueryResult<Self> {
        Self::parse(document)
    }
}

impl TryFrom<Value> for Query {
    type Error = QueryError;

    fn try_from(document: Value) -> QueryResult<Self> {
        Self::parse(&document)
    }
}

impl FromStr for Query {
    type Err = QueryError;

    /// Parses JSON text. Text that is not JSON is reported as an invalid
    /// document.
    fn from_str(text: &str) -> QueryResult<Self> {
        let document: Value = serde_json::from_str(text).map_err(|_| QueryError::InvalidDocument {
            found: "malformed JSON",
        })?;
        Self::parse(&document)
    }
}
