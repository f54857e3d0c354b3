//! Refusal composer
//!
//! Reason texts come from a fixed vocabulary; only the listed details (rule
//! id, answer count, source ids, unit strings) are interpolated.

use super::rules::RuleId;
use super::verdict::{Refusal, RefusalKind};

/// Why the engine refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefusalCause {
    /// A rule recognized the question but found no supporting fact
    NoCandidates,
    /// The document has no facts at all
    EmptyFactSet,
    /// A rule produced conflicting answers
    Ambiguous {
        rule: RuleId,
        answers: usize,
        source_ids: Vec<String>,
    },
    /// No rule recognized the question
    UnrecognizedQuestion,
    /// Answering would compare values across different unit strings
    IncomparableUnits { units: Vec<String> },
}

impl RefusalCause {
    pub fn kind(&self) -> RefusalKind {
        match self {
            RefusalCause::NoCandidates | RefusalCause::EmptyFactSet => RefusalKind::NoMatchingFact,
            RefusalCause::Ambiguous { .. } => RefusalKind::AmbiguousFacts,
            RefusalCause::UnrecognizedQuestion | RefusalCause::IncomparableUnits { .. } => {
                RefusalKind::UnsupportedQuestionPattern
            }
        }
    }
}

fn display_unit(unit: &str) -> &str {
    if unit.is_empty() {
        "no unit"
    } else {
        unit
    }
}

/// Builds the refusal for a cause. Pure.
pub fn compose(cause: &RefusalCause) -> Refusal {
    let reason_text = match cause {
        RefusalCause::NoCandidates => "No canonical fact derives this answer.".to_string(),
        RefusalCause::EmptyFactSet => {
            "No canonical fact derives this answer: the document has no facts.".to_string()
        }
        RefusalCause::Ambiguous {
            rule,
            answers,
            source_ids,
        } => format!(
            "Ambiguous facts: rule {} found {} conflicting answers from {}.",
            rule,
            answers,
            source_ids.join(", ")
        ),
        RefusalCause::UnrecognizedQuestion => {
            "Unsupported question pattern: no rule recognizes this question.".to_string()
        }
        RefusalCause::IncomparableUnits { units } => format!(
            "Unsupported question pattern: cannot compare values across units ({}).",
            units
                .iter()
                .map(|u| display_unit(u))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };

    Refusal {
        reason_kind: cause.kind(),
        reason_text,
    }
}
