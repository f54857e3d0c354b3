//! Verification trace
//!
//! Records what each consulted rule made of the question, then the verdict.
//! Rules after the deciding one are not listed.

use std::fmt;

use serde::Serialize;

use super::rules::RuleId;
use super::verdict::Verdict;

/// Outcome of one rule during a verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    NotApplicable,
    NoCandidates,
    Candidates { count: usize, distinct_answers: usize },
    Unsupported,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::NotApplicable => write!(f, "not applicable"),
            StepOutcome::NoCandidates => write!(f, "no candidates"),
            StepOutcome::Candidates {
                count,
                distinct_answers,
            } => write!(f, "{} candidate(s), {} distinct answer(s)", count, distinct_answers),
            StepOutcome::Unsupported => write!(f, "unsupported"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleStep {
    pub rule: RuleId,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// Full trace of one verification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationTrace {
    pub question: String,
    pub normalized: String,
    pub steps: Vec<RuleStep>,
    pub verdict: Verdict,
}

impl fmt::Display for VerificationTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== VERIFICATION TRACE ===")?;
        writeln!(f, "Question: {}", self.question)?;
        writeln!(f, "Normalized: {}", self.normalized)?;

        if self.steps.is_empty() {
            writeln!(f, "Rules: none consulted")?;
        } else {
            writeln!(f, "Rules:")?;
            for (i, step) in self.steps.iter().enumerate() {
                writeln!(f, "  {}. {}: {}", i + 1, step.rule, step.outcome)?;
            }
        }

        match &self.verdict {
            Verdict::Answer(answer) => {
                writeln!(f, "Status: ANSWER")?;
                writeln!(f, "Answer: {}", answer.text)?;
                writeln!(f, "Rule: {}", answer.rule)?;
                writeln!(f, "Proof:")?;
                for p in &answer.proof {
                    writeln!(
                        f,
                        "  - {} {} page {} at ({}, {})",
                        p.source_type, p.source_id, p.page, p.x, p.y
                    )?;
                }
            }
            Verdict::Refuse(refusal) => {
                writeln!(f, "Status: REFUSED")?;
                writeln!(f, "Reason Kind: {}", refusal.reason_kind)?;
                writeln!(f, "Reason: {}", refusal.reason_text)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::verdict::{Refusal, RefusalKind};

    fn refused_trace() -> VerificationTrace {
        VerificationTrace {
            question: "what is pin 9".into(),
            normalized: "what is pin 9".into(),
            steps: vec![RuleStep {
                rule: RuleId::LabelLookup,
                outcome: StepOutcome::NoCandidates,
            }],
            verdict: Verdict::Refuse(Refusal {
                reason_kind: RefusalKind::NoMatchingFact,
                reason_text: "No canonical fact derives this answer.".into(),
            }),
        }
    }

    #[test]
    fn test_trace_display() {
        let output = refused_trace().to_string();
        assert!(output.starts_with("=== VERIFICATION TRACE ==="));
        assert!(output.contains("1. label_lookup: no candidates"));
        assert!(output.contains("Status: REFUSED"));
        assert!(output.contains("no_matching_fact"));
    }

    #[test]
    fn test_step_serialization() {
        let step = RuleStep {
            rule: RuleId::Quantity,
            outcome: StepOutcome::Candidates {
                count: 2,
                distinct_answers: 1,
            },
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["rule"], "quantity");
        assert_eq!(json["outcome"], "candidates");
        assert_eq!(json["count"], 2);
    }
}
