//! JSON-lines logger
//!
//! Each call writes exactly one line to stderr: `event`, then `severity`,
//! then the caller's fields in key order. Nothing is buffered between calls.

use std::io::{self, Write};

/// How loud an event is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    /// A fact or request was rejected but the command goes on
    Warn,
    /// Stored data or a scoped operation failed
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

pub struct Logger;

impl Logger {
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = render_line(severity, event, fields);
        let mut stderr = io::stderr().lock();
        // A failed log write never fails the command
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

/// One newline-terminated JSON object. Values are always JSON strings.
fn render_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut ordered = fields.to_vec();
    ordered.sort_by(|a, b| a.0.cmp(b.0));

    let mut line = String::with_capacity(64 + fields.len() * 32);
    line.push('{');
    push_pair(&mut line, "event", event);
    line.push(',');
    push_pair(&mut line, "severity", severity.as_str());
    for (key, value) in ordered {
        line.push(',');
        push_pair(&mut line, key, value);
    }
    line.push_str("}\n");
    line
}

fn push_pair(line: &mut String, key: &str, value: &str) {
    push_quoted(line, key);
    line.push(':');
    push_quoted(line, value);
}

fn push_quoted(line: &mut String, text: &str) {
    line.push('"');
    for c in text.chars() {
        match c {
            '"' | '\\' => {
                line.push('\\');
                line.push(c);
            }
            '\n' => line.push_str("\\n"),
            '\r' => line.push_str("\\r"),
            '\t' => line.push_str("\\t"),
            c if c.is_control() => line.push_str(&format!("\\u{:04x}", c as u32)),
            c => line.push(c),
        }
    }
    line.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert_eq!(Severity::Warn.as_str(), "WARN");
    }

    #[test]
    fn test_line_is_json() {
        let line = render_line(Severity::Info, "QUERY_BEGIN", &[("doc_id", "doc1")]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "QUERY_BEGIN");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["doc_id"], "doc1");
    }

    #[test]
    fn test_fields_sorted_regardless_of_input_order() {
        let a = render_line(
            Severity::Info,
            "QUERY_REFUSED",
            &[("reason_kind", "no_matching_fact"), ("doc_id", "d"), ("question", "q")],
        );
        let b = render_line(
            Severity::Info,
            "QUERY_REFUSED",
            &[("question", "q"), ("doc_id", "d"), ("reason_kind", "no_matching_fact")],
        );
        assert_eq!(a, b);

        let doc = a.find("doc_id").unwrap();
        let question = a.find("question").unwrap();
        let reason = a.find("reason_kind").unwrap();
        assert!(doc < question && question < reason);
    }

    #[test]
    fn test_quotes_and_control_chars_escaped() {
        let line = render_line(
            Severity::Warn,
            "FACT_REJECTED",
            &[("reason", "value \"VCC\"\nline2\u{1}")],
        );
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["reason"], "value \"VCC\"\nline2\u{1}");
    }

    #[test]
    fn test_single_line_event_first() {
        let line = render_line(Severity::Info, "DOCUMENT_STORED", &[("a", "1"), ("b", "2")]);
        assert_eq!(line.matches('\n').count(), 1);
        assert!(line.ends_with("}\n"));
        assert!(line.find("\"event\"").unwrap() < line.find("\"severity\"").unwrap());
    }
}
