//! Projection spec resolution
//!
//! Raw specs come in three notations:
//! - token string: `"a b -c +d"`
//! - token list: `["a", "-b"]`
//! - flag map: `{"a": 1, "b": 1}` or `{"c": 0}`
//!
//! Each resolves to exactly one of include or exclude. Tokens: any positive
//! token (bare or `+`) makes the projection inclusive over the positive
//! tokens only; otherwise it excludes the `-` tokens. Flag map: any field set
//! to 1 makes it inclusive over those fields; otherwise it excludes the
//! fields set to 0.

use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;

/// A projection spec that cannot be interpreted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// The spec is not a string, array or object
    #[error("projection must be a string, array or object, got {0}")]
    InvalidSpec(&'static str),

    /// A token list containing a non-string
    #[error("projection tokens must be strings, got {0}")]
    InvalidToken(String),

    /// A flag map value other than 0/1/false/true
    #[error("projection flag for '{field}' must be 0 or 1, got {value}")]
    InvalidFlag { field: String, value: String },
}

impl ProjectionError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ProjectionError::InvalidSpec(_) => "PROJECTION_INVALID_SPEC",
            ProjectionError::InvalidToken(_) => "PROJECTION_INVALID_TOKEN",
            ProjectionError::InvalidFlag { .. } => "PROJECTION_INVALID_FLAG",
        }
    }
}

/// A projection as written by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawProjection {
    /// Whitespace-separated tokens with optional `-`/`+` prefixes
    Tokens(String),
    /// Individual tokens with optional `-`/`+` prefixes
    List(Vec<String>),
    /// Field to include (`true`) / exclude (`false`) flags
    Flags(Vec<(String, bool)>),
}

/// A resolved projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionSpec {
    /// Keep only these top-level fields
    Include(BTreeSet<String>),
    /// Drop these top-level fields
    Exclude(BTreeSet<String>),
}

impl ProjectionSpec {
    /// Resolves a raw spec into include or exclude.
    pub fn resolve(raw: &RawProjection) -> Self {
        match raw {
            RawProjection::Tokens(tokens) => Self::from_tokens(tokens.split_whitespace()),
            RawProjection::List(tokens) => Self::from_tokens(tokens.iter().map(String::as_str)),
            RawProjection::Flags(flags) => {
                if flags.iter().any(|(_, include)| *include) {
                    ProjectionSpec::Include(
                        flags
                            .iter()
                            .filter(|(_, include)| *include)
                            .map(|(field, _)| field.clone())
                            .collect(),
                    )
                } else {
                    ProjectionSpec::Exclude(flags.iter().map(|(field, _)| field.clone()).collect())
                }
            }
        }
    }

    fn from_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> Self {
        let mut includes = BTreeSet::new();
        let mut excludes = BTreeSet::new();

        for token in tokens.filter(|t| !t.is_empty()) {
            if let Some(field) = token.strip_prefix('-') {
                excludes.insert(field.to_string());
            } else {
                includes.insert(token.strip_prefix('+').unwrap_or(token).to_string());
            }
        }

        if includes.is_empty() {
            ProjectionSpec::Exclude(excludes)
        } else {
            ProjectionSpec::Include(includes)
        }
    }

    pub fn is_inclusive(&self) -> bool {
        matches!(self, ProjectionSpec::Include(_))
    }
}

impl From<&str> for RawProjection {
    fn from(tokens: &str) -> Self {
        RawProjection::Tokens(tokens.to_string())
    }
}

impl From<String> for RawProjection {
    fn from(tokens: String) -> Self {
        RawProjection::Tokens(tokens)
    }
}

impl From<Vec<String>> for RawProjection {
    fn from(tokens: Vec<String>) -> Self {
        RawProjection::List(tokens)
    }
}

impl From<&[&str]> for RawProjection {
    fn from(tokens: &[&str]) -> Self {
        RawProjection::List(tokens.iter().map(|t| t.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RawProjection {
    fn from(tokens: [&str; N]) -> Self {
        RawProjection::List(tokens.iter().map(|t| t.to_string()).collect())
    }
}

impl From<Vec<&str>> for RawProjection {
    fn from(tokens: Vec<&str>) -> Self {
        Self::from(tokens.as_slice())
    }
}

impl TryFrom<&Value> for RawProjection {
    type Error = ProjectionError;

    fn try_from(spec: &Value) -> Result<Self, Self::Error> {
        match spec {
            Value::String(tokens) => Ok(RawProjection::Tokens(tokens.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(token) => Ok(token.clone()),
                    other => Err(ProjectionError::InvalidToken(other.to_string())),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(RawProjection::List),
            Value::Object(flags) => flags
                .iter()
                .map(|(field, flag)| {
                    let include = match flag {
                        Value::Bool(b) => Some(*b),
                        Value::Number(n) => match n.as_f64() {
                            Some(f) if f == 1.0 => Some(true),
                            Some(f) if f == 0.0 => Some(false),
                            _ => None,
                        },
                        _ => None,
                    };
                    include
                        .map(|include| (field.clone(), include))
                        .ok_or_else(|| ProjectionError::InvalidFlag {
                            field: field.clone(),
                            value: flag.to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(RawProjection::Flags),
            Value::Null => Err(ProjectionError::InvalidSpec("null")),
            Value::Bool(_) => Err(ProjectionError::InvalidSpec("boolean")),
            Value::Number(_) => Err(ProjectionError::InvalidSpec("number")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set(fields: &[&str]) -> BTreeSet<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_token_string_inclusive() {
        assert_eq!(
            ProjectionSpec::resolve(&"id  name".into()),
            ProjectionSpec::Include(set(&["id", "name"]))
        );
    }

    #[test]
    fn test_token_string_exclusive() {
        assert_eq!(
            ProjectionSpec::resolve(&"-age -email".into()),
            ProjectionSpec::Exclude(set(&["age", "email"]))
        );
    }

    #[test]
    fn test_mixed_tokens_resolve_inclusive() {
        assert_eq!(
            ProjectionSpec::resolve(&"a b -c +d".into()),
            ProjectionSpec::Include(set(&["a", "b", "d"]))
        );
    }

    #[test]
    fn test_token_list() {
        assert_eq!(
            ProjectionSpec::resolve(&["a", "-b"].into()),
            ProjectionSpec::Include(set(&["a"]))
        );
        assert_eq!(
            ProjectionSpec::resolve(&["-b"].into()),
            ProjectionSpec::Exclude(set(&["b"]))
        );
    }

    #[test]
    fn test_flag_map() {
        let raw = RawProjection::try_from(&json!({"a": 1, "b": 0})).unwrap();
        assert_eq!(ProjectionSpec::resolve(&raw), ProjectionSpec::Include(set(&["a"])));

        let raw = RawProjection::try_from(&json!({"c": 0, "d": false})).unwrap();
        assert_eq!(ProjectionSpec::resolve(&raw), ProjectionSpec::Exclude(set(&["c", "d"])));
    }

    #[test]
    fn test_empty_spec_excludes_nothing() {
        assert_eq!(
            ProjectionSpec::resolve(&"   ".into()),
            ProjectionSpec::Exclude(BTreeSet::new())
        );
    }

    #[test]
    fn test_invalid_json_specs() {
        assert_eq!(
            RawProjection::try_from(&json!(5)).unwrap_err().code(),
            "PROJECTION_INVALID_SPEC"
        );
        assert_eq!(
            RawProjection::try_from(&json!(["a", 1])).unwrap_err().code(),
            "PROJECTION_INVALID_TOKEN"
        );
        assert_eq!(
            RawProjection::try_from(&json!({"a": 2})).unwrap_err().code(),
            "PROJECTION_INVALID_FLAG"
        );
    }
}
