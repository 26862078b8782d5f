//! JSON value semantics shared by matching and sorting
//!
//! - Kind ranking and type-aware comparison
//! - Numeric equality across integer/float representations
//! - Chronological ordering of timestamp strings
//! - String collation

mod collation;
mod compare;
mod kind;

pub use collation::Collation;
pub use compare::{
    compare_numbers, compare_strings, compare_values, order_strings, parse_timestamp, total_order,
    type_rank, values_equal,
};
pub use kind::{kind_name, TypeKind};
