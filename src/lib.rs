//! recordset - Immutable in-memory record sets with a mongo-style query language
//!
//! Records are JSON-shaped documents. A [`RecordSet`] is never mutated:
//! filtering, projection, sorting, grouping and pagination all return new
//! sets that share the surviving records with their source.
//!
//! ```
//! use recordset::{Query, RecordSet, SortKey};
//! use serde_json::json;
//!
//! let people = RecordSet::of(vec![
//!     json!({"id": 1, "name": "Alice", "age": 30}),
//!     json!({"id": 2, "name": "Bob", "age": 25}),
//! ]);
//!
//! let adults = people.find(&Query::parse(&json!({"age": {"$gte": 26}})).unwrap());
//! assert_eq!(adults.len(), 1);
//! assert_eq!(people.sort_by(&[SortKey::asc("age")]).pluck("id"), vec![json!(2), json!(1)]);
//! ```

pub mod config;
pub mod observability;
pub mod path;
pub mod projection;
pub mod query;
pub mod record_set;
pub mod sort;
pub mod value;

pub use config::EngineConfig;
pub use path::FieldPath;
pub use projection::{ProjectionError, ProjectionSpec, RawProjection};
pub use query::{Query, QueryError, QueryNode, QueryResult, ValuePredicate};
pub use record_set::{ConstructionError, Cursor, CursorOptions, Document, Groups, RecordSet};
pub use sort::{SortDirection, SortKey};
pub use value::Collation;
