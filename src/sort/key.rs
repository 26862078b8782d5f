//! Sort keys and directions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::path::FieldPath;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Applies the direction to an ascending ordering.
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for a direction token that is neither ascending nor descending
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sort direction '{0}'")]
pub struct InvalidDirection(pub String);

impl FromStr for SortDirection {
    type Err = InvalidDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Ok(SortDirection::Asc),
            "desc" | "descending" | "-1" => Ok(SortDirection::Desc),
            _ => Err(InvalidDirection(s.to_string())),
        }
    }
}

/// A field path plus the direction to order it in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub field: FieldPath,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<FieldPath>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<FieldPath>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<FieldPath>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Parses `"age"`, `"+age"` (ascending) or `"-age"` (descending).
    pub fn parse(token: &str) -> Self {
        match token.strip_prefix('-') {
            Some(field) => Self::desc(field),
            None => Self::asc(token.strip_prefix('+').unwrap_or(token)),
        }
    }

    /// Pairs fields with directions; missing directions default to ascending.
    pub fn zip(fields: &[&str], directions: &[SortDirection]) -> Vec<SortKey> {
        fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                SortKey::new(*field, directions.get(i).copied().unwrap_or_default())
            })
            .collect()
    }
}

impl From<&str> for SortKey {
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}
