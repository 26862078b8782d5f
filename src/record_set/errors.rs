//! Record set construction errors
//!
//! Error codes:
//! - RECORDSET_CONSTRUCTION_INVALID
//! - RECORDSET_RECORD_INVALID
//!
//! Construction is the only fallible step of a record set's life. Every
//! other operation is total.

use thiserror::Error;

/// Input that cannot become a record set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// The input is not a sequence
    #[error("record set input must be an array, got {found}")]
    NotASequence { found: &'static str },

    /// An element could not be read as a record
    #[error("record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

impl ConstructionError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConstructionError::NotASequence { .. } => "RECORDSET_CONSTRUCTION_INVALID",
            ConstructionError::InvalidRecord { .. } => "RECORDSET_RECORD_INVALID",
        }
    }
}
