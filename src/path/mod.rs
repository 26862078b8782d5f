//! Dotted field paths and their resolution against records
//!
//! A path such as `"comments.author.name"` walks nested objects segment by
//! segment and fans out across arrays, so it can resolve to many candidate
//! values. Predicates hold when they hold for any candidate; sorting and
//! plucking take the first one.

mod resolver;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use resolver::{
    lookup, resolve, resolve_value, resolve_value_with_gaps, resolve_with_gaps, Resolution,
};

/// A parsed dotted field path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dotted path. Never fails: a path naming nothing resolves to
    /// no candidates.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self {
            segments: path.as_ref().split('.').map(str::to_string).collect(),
        }
    }

    /// The empty path, addressing the value it is resolved against
    pub(crate) fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True for a single-segment path addressing a top-level field
    pub fn is_top_level(&self) -> bool {
        self.segments.len() == 1
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for FieldPath {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments() {
        let path = FieldPath::new("comments.author.name");
        assert_eq!(path.segments(), ["comments", "author", "name"]);
        assert!(!path.is_top_level());
        assert!(FieldPath::new("age").is_top_level());
    }

    #[test]
    fn test_path_display_round_trips() {
        assert_eq!(FieldPath::new("a.b.0").to_string(), "a.b.0");
    }

    #[test]
    fn test_path_serde_as_string() {
        let path: FieldPath = serde_json::from_str("\"a.b\"").unwrap();
        assert_eq!(path, FieldPath::new("a.b"));
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"a.b\"");
    }
}
