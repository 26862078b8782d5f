//! Engine configuration
//!
//! Plain data, cheap to copy. A record set carries one and every set derived
//! from it inherits it.

use serde::{Deserialize, Serialize};

use crate::observability::{Logger, Severity};
use crate::value::Collation;

/// Default cap on the compiled size of a `$regex` pattern (bytes).
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Configuration for query compilation, ordering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// String ordering used by key sorts.
    pub collation: Collation,
    /// Compiled size limit handed to the regex builder.
    pub regex_size_limit: usize,
    /// Minimum severity the logger emits once installed.
    pub log_threshold: Severity,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            collation: Collation::Locale,
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
            log_threshold: Severity::Warn,
        }
    }
}

impl EngineConfig {
    /// Config ordering strings by raw bytes.
    pub fn binary() -> Self {
        Self {
            collation: Collation::Binary,
            ..Self::default()
        }
    }

    /// Returns a copy with the given collation.
    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }

    /// Returns a copy with the given regex size limit.
    pub fn with_regex_size_limit(mut self, limit: usize) -> Self {
        self.regex_size_limit = limit;
        self
    }

    /// Returns a copy with the given log threshold.
    pub fn with_log_threshold(mut self, severity: Severity) -> Self {
        self.log_threshold = severity;
        self
    }

    /// Parses a config from JSON text; absent keys take their defaults.
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Applies `log_threshold` to the process-wide logger.
    pub fn install_logging(&self) {
        Logger::set_threshold(self.log_threshold);
    }
}
