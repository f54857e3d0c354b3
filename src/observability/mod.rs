//! Observability for akili
//!
//! - Structured logging (JSON lines on stderr)
//! - Atomic counters
//! - Typed events
//!
//! # Principles
//!
//! 1. Observability is read-only: it never changes a verdict
//! 2. No async or background threads
//! 3. Deterministic field order
//!
//! The verification engine does not log; callers (request handler, CLI)
//! log around it.
//!
//! # Usage
//!
//! ```ignore
//! use akili::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::QueryReceived, &[("doc_id", "ds01")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_questions();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;

/// Log a typed event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a typed event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        log_event(Event::ConfigLoaded);
        log_event(Event::StoreOpened);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::DocumentStored, &[("doc_id", "ds01"), ("facts", "12")]);
    }
}
