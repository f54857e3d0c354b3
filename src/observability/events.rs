//! Observability events for akili
//!
//! Events are explicit and typed. Each maps to one stable SCREAMING_CASE
//! name and a default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in akili
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Fact store opened
    StoreOpened,

    // Queries
    /// Question received for a document
    QueryReceived,
    /// Engine derived an answer
    QueryAnswered,
    /// Engine refused
    QueryRefused,
    /// Question violated the engine contract
    QueryInvalid,

    // Explain
    /// Explain begins
    ExplainBegin,
    /// Explain complete
    ExplainComplete,

    // Ingestion
    /// Extraction entry rejected by the canonicalizer
    FactRejected,
    /// Document record written
    DocumentStored,
    /// Document record removed
    DocumentDeleted,

    // Integrity
    /// Stored record failed checksum verification
    StoreCorruption,

    // Metrics
    /// Counter snapshot at the end of a command
    MetricsReported,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",

            Event::QueryReceived => "QUERY_BEGIN",
            Event::QueryAnswered => "QUERY_ANSWERED",
            Event::QueryRefused => "QUERY_REFUSED",
            Event::QueryInvalid => "QUERY_INVALID",

            Event::ExplainBegin => "EXPLAIN_BEGIN",
            Event::ExplainComplete => "EXPLAIN_COMPLETE",

            Event::FactRejected => "FACT_REJECTED",
            Event::DocumentStored => "DOCUMENT_STORED",
            Event::DocumentDeleted => "DOCUMENT_DELETED",

            Event::StoreCorruption => "STORE_CORRUPTION",

            Event::MetricsReported => "METRICS",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::FactRejected | Event::QueryInvalid => Severity::Warn,
            Event::StoreCorruption => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
