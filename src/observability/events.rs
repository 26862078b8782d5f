//! Observable events emitted by the engine
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Query compilation
    /// Query document compiled into a query tree
    QueryCompiled,
    /// Query document rejected at compile time
    QueryRejected,

    // Construction
    /// Non-sequence input handed to the record set factory
    ConstructionRejected,

    // Lazy cursor
    /// Cursor created over a record set
    CursorOpened,
    /// Cursor yielded its last record
    CursorExhausted,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::QueryCompiled => "QUERY_COMPILED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::ConstructionRejected => "CONSTRUCTION_REJECTED",
            Event::CursorOpened => "CURSOR_OPENED",
            Event::CursorExhausted => "CURSOR_EXHAUSTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryRejected | Event::ConstructionRejected => Severity::Warn,
            Event::QueryCompiled => Severity::Info,
            Event::CursorOpened | Event::CursorExhausted => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::QueryCompiled,
            Event::QueryRejected,
            Event::ConstructionRejected,
            Event::CursorOpened,
            Event::CursorExhausted,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_rejections_are_warnings() {
        assert_eq!(Event::QueryRejected.severity(), Severity::Warn);
        assert_eq!(Event::ConstructionRejected.severity(), Severity::Warn);
    }

    #[test]
    fn test_compilation_is_info_and_cursors_trace() {
        assert_eq!(Event::QueryCompiled.severity(), Severity::Info);
        assert_eq!(Event::CursorOpened.severity(), Severity::Trace);
        assert_eq!(Event::CursorExhausted.severity(), Severity::Trace);
    }
}
