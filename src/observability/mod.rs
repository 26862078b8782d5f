//! Observability for the record set engine
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on results
//! 3. Silent below the configured threshold (WARN by default)
//!
//! # Usage
//!
//! ```
//! use recordset::observability::{log_event_with_fields, Event, Logger, Severity};
//!
//! Logger::set_threshold(Severity::Trace);
//! log_event_with_fields(Event::QueryCompiled, &[("clauses", "2")]);
//! Logger::set_threshold(Severity::Warn);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_without_fields() {
        // This just verifies no panic
        log_event_with_fields(Event::CursorOpened, &[]);
        log_event_with_fields(Event::CursorExhausted, &[]);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::QueryRejected, &[("code", "QUERY_UNKNOWN_OPERATOR")]);
    }
}
