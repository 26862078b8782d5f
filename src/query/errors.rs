//! Query compilation errors
//!
//! Error codes:
//! - QUERY_INVALID_DOCUMENT
//! - QUERY_UNKNOWN_OPERATOR
//! - QUERY_INVALID_OPERAND
//! - QUERY_INVALID_REGEX
//! - QUERY_INVALID_REGEX_FLAGS
//! - QUERY_UNKNOWN_TYPE
//!
//! All of these are programmer errors in the query document. They are raised
//! when the document is compiled, never deferred to matching.

use thiserror::Error;

/// Result type for query compilation
pub type QueryResult<T> = Result<T, QueryError>;

/// A query document that cannot be compiled
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// The query (or a nested clause) is not a JSON object
    #[error("query document must be an object, got {found}")]
    InvalidDocument { found: &'static str },

    /// A `$`-prefixed key that is not part of the operator grammar
    #[error("unknown operator '{operator}'{}", at_path(.path))]
    UnknownOperator {
        operator: String,
        path: Option<String>,
    },

    /// A known operator given an operand of the wrong shape
    #[error("invalid operand for '{operator}': {reason}")]
    InvalidOperand {
        operator: &'static str,
        reason: String,
    },

    /// `$regex` pattern that does not compile
    #[error("invalid regex pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// `$options` containing a flag other than i, m, s, x
    #[error("invalid regex flags '{0}'")]
    InvalidRegexFlags(String),

    /// `$type` naming no known kind
    #[error("unknown type '{0}'")]
    UnknownType(String),
}

fn at_path(path: &Option<String>) -> String {
    match path {
        Some(path) => format!(" at '{}'", path),
        None => String::new(),
    }
}

impl QueryError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidDocument { .. } => "QUERY_INVALID_DOCUMENT",
            QueryError::UnknownOperator { .. } => "QUERY_UNKNOWN_OPERATOR",
            QueryError::InvalidOperand { .. } => "QUERY_INVALID_OPERAND",
            QueryError::InvalidRegex { .. } => "QUERY_INVALID_REGEX",
            QueryError::InvalidRegexFlags(_) => "QUERY_INVALID_REGEX_FLAGS",
            QueryError::UnknownType(_) => "QUERY_UNKNOWN_TYPE",
        }
    }

    pub(crate) fn operand(operator: &'static str, reason: impl Into<String>) -> Self {
        QueryError::InvalidOperand {
            operator,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = QueryError::UnknownOperator {
            operator: "$foo".into(),
            path: None,
        };
        assert_eq!(err.code(), "QUERY_UNKNOWN_OPERATOR");
        assert_eq!(QueryError::UnknownType("x".into()).code(), "QUERY_UNKNOWN_TYPE");
    }

    #[test]
    fn test_unknown_operator_display_names_path() {
        let err = QueryError::UnknownOperator {
            operator: "$near".into(),
            path: Some("location".into()),
        };
        let display = err.to_string();
        assert!(display.contains("$near"));
        assert!(display.contains("location"));
    }

    #[test]
    fn test_invalid_operand_display() {
        let err = QueryError::operand("$size", "expected a non-negative integer");
        assert_eq!(
            err.to_string(),
            "invalid operand for '$size': expected a non-negative integer"
        );
    }
}
