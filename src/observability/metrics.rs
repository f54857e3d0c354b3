//! Metrics registry for akili
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::verify::RefusalKind;

use super::events::Event;
use super::log_event_with_fields;

/// Operational counters
///
/// All counters use Relaxed atomics; values are exact, cross-counter
/// consistency is not guaranteed mid-update.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    questions: AtomicU64,
    answers: AtomicU64,
    refusals_no_matching_fact: AtomicU64,
    refusals_ambiguous_facts: AtomicU64,
    refusals_unsupported_question_pattern: AtomicU64,
    invalid_inputs: AtomicU64,
    documents_stored: AtomicU64,
    documents_deleted: AtomicU64,
    facts_stored: AtomicU64,
    facts_rejected: AtomicU64,
    store_errors: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Query metrics

    pub fn increment_questions(&self) {
        self.questions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_answers(&self) {
        self.answers.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts one refusal under its kind
    pub fn increment_refusals(&self, kind: RefusalKind) {
        let counter = match kind {
            RefusalKind::NoMatchingFact => &self.refusals_no_matching_fact,
            RefusalKind::AmbiguousFacts => &self.refusals_ambiguous_facts,
            RefusalKind::UnsupportedQuestionPattern => &self.refusals_unsupported_question_pattern,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_invalid_inputs(&self) {
        self.invalid_inputs.fetch_add(1, Ordering::Relaxed);
    }

    // Ingestion metrics

    pub fn increment_documents_stored(&self) {
        self.documents_stored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_documents_deleted(&self) {
        self.documents_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_facts_stored(&self, count: u64) {
        self.facts_stored.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_facts_rejected(&self, count: u64) {
        self.facts_rejected.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_store_errors(&self) {
        self.store_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            questions: self.questions.load(Ordering::Relaxed),
            answers: self.answers.load(Ordering::Relaxed),
            refusals_no_matching_fact: self.refusals_no_matching_fact.load(Ordering::Relaxed),
            refusals_ambiguous_facts: self.refusals_ambiguous_facts.load(Ordering::Relaxed),
            refusals_unsupported_question_pattern: self
                .refusals_unsupported_question_pattern
                .load(Ordering::Relaxed),
            invalid_inputs: self.invalid_inputs.load(Ordering::Relaxed),
            documents_stored: self.documents_stored.load(Ordering::Relaxed),
            documents_deleted: self.documents_deleted.load(Ordering::Relaxed),
            facts_stored: self.facts_stored.load(Ordering::Relaxed),
            facts_rejected: self.facts_rejected.load(Ordering::Relaxed),
            store_errors: self.store_errors.load(Ordering::Relaxed),
        }
    }

    /// Current counters as a JSON object, fixed key order
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).expect("MetricsSnapshot serialization cannot fail")
    }

    /// Logs one `METRICS` line carrying the current counters
    pub fn report(&self, command: &str) {
        let counters = self.to_json();
        log_event_with_fields(Event::MetricsReported, &[("command", command), ("counters", &counters)]);
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub questions: u64,
    pub answers: u64,
    pub refusals_no_matching_fact: u64,
    pub refusals_ambiguous_facts: u64,
    pub refusals_unsupported_question_pattern: u64,
    pub invalid_inputs: u64,
    pub documents_stored: u64,
    pub documents_deleted: u64,
    pub facts_stored: u64,
    pub facts_rejected: u64,
    pub store_errors: u64,
}

impl MetricsSnapshot {
    pub fn refusals(&self) -> u64 {
        self.refusals_no_matching_fact
            + self.refusals_ambiguous_facts
            + self.refusals_unsupported_question_pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_start_at_zero() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.questions, 0);
        assert_eq!(snapshot.refusals(), 0);
    }

    #[test]
    fn test_refusals_counted_per_kind() {
        let metrics = MetricsRegistry::new();
        metrics.increment_refusals(RefusalKind::AmbiguousFacts);
        metrics.increment_refusals(RefusalKind::AmbiguousFacts);
        metrics.increment_refusals(RefusalKind::NoMatchingFact);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.refusals_ambiguous_facts, 2);
        assert_eq!(snapshot.refusals_no_matching_fact, 1);
        assert_eq!(snapshot.refusals(), 3);
    }

    #[test]
    fn test_to_json() {
        let metrics = MetricsRegistry::new();
        metrics.increment_questions();
        metrics.add_facts_stored(7);

        let parsed: serde_json::Value = serde_json::from_str(&metrics.to_json()).unwrap();
        assert_eq!(parsed["questions"], 1);
        assert_eq!(parsed["facts_stored"], 7);
        assert!(metrics.to_json().starts_with("{\"questions\":1"));
    }

    #[test]
    fn test_concurrent_increments() {
        use std::sync::Arc;
        use std::thread;

        let metrics = Arc::new(MetricsRegistry::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let m = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..100 {
                        m.increment_answers();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(metrics.snapshot().answers, 400);
    }
}
