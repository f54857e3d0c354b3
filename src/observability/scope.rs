//! ObservationScope for begin/complete logging around multi-step work
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` on `complete()`
//! - Logs `{name}_FAILED` on `fail()`
//! - Logs `{name}_INCOMPLETE` if dropped without either

use std::cell::Cell;

use super::logger::{Logger, Severity};

/// A scope that logs start and end events
///
/// ```ignore
/// let scope = ObservationScope::with_fields("INGEST", &[("file", "ds.json")]);
/// // ... canonicalize and store ...
/// scope.complete_with_fields(&[("doc_id", "ds01")]);
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    completed: Cell<bool>,
    fields: Vec<(&'a str, String)>,
}

impl<'a> ObservationScope<'a> {
    pub fn new(name: &'a str) -> Self {
        Self::with_fields(name, &[])
    }

    pub fn with_fields(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        Logger::log(Severity::Info, &format!("{}_BEGIN", name), fields);

        Self {
            name,
            completed: Cell::new(false),
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
        }
    }

    fn scope_fields(&self) -> Vec<(&str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }

    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    pub fn complete_with_fields(self, extra_fields: &[(&str, &str)]) {
        self.completed.set(true);
        let mut all_fields = self.scope_fields();
        all_fields.extend(extra_fields.iter().copied());
        Logger::log(Severity::Info, &format!("{}_COMPLETE", self.name), &all_fields);
    }

    pub fn fail(self, reason: &str) {
        self.completed.set(true);
        let mut all_fields = self.scope_fields();
        all_fields.push(("reason", reason));
        Logger::log(Severity::Error, &format!("{}_FAILED", self.name), &all_fields);
    }

    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed.get() {
            Logger::log(
                Severity::Warn,
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}
