//! Direct Unit lookup by label, or by text value
//!
//! "what is VCC" answers with the value of the Unit labelled VCC. When no
//! label occurs in the question, a text-valued Unit whose value does
//! ("which signal is RESET") answers with its label.

use std::cmp::Ordering;

use crate::canonical::Unit;

use super::question::{is_stopword, tokenize, Question};
use super::rules::{Candidate, Facts, Rule, RuleId, RuleOutcome};
use super::verdict::ProofPoint;

pub struct UnitLabelRule;

/// Tokens of `text` if it contains at least one non-stopword
fn meaningful_phrase(text: &str) -> Option<Vec<String>> {
    let phrase = tokenize(text);
    if phrase.iter().any(|t| !is_stopword(t)) {
        Some(phrase)
    } else {
        None
    }
}

/// Keeps the units whose phrase is longest among those found in the question
fn longest_matches<'a, F>(question: &Question, units: &'a [Unit], phrase_of: F) -> Vec<&'a Unit>
where
    F: Fn(&Unit) -> Option<Vec<String>>,
{
    let mut best = 0;
    let mut matched = Vec::new();
    for unit in units {
        let Some(phrase) = phrase_of(unit) else {
            continue;
        };
        if !question.contains_phrase(&phrase) {
            continue;
        }
        match phrase.len().cmp(&best) {
            Ordering::Greater => {
                best = phrase.len();
                matched = vec![unit];
            }
            Ordering::Equal => matched.push(unit),
            Ordering::Less => {}
        }
    }
    matched
}

impl Rule for UnitLabelRule {
    fn id(&self) -> RuleId {
        RuleId::UnitLabel
    }

    fn try_match(&self, question: &Question, facts: &Facts<'_>) -> RuleOutcome {
        if question.content_tokens().is_empty() {
            return RuleOutcome::NotApplicable;
        }

        let by_label = longest_matches(question, facts.units, |u| {
            u.label.as_deref().and_then(meaningful_phrase)
        });
        if !by_label.is_empty() {
            return RuleOutcome::Candidates(
                by_label
                    .into_iter()
                    .map(|u| Candidate::new(u.display_value(), ProofPoint::from_unit(u)))
                    .collect(),
            );
        }

        let by_value = longest_matches(question, facts.units, |u| {
            u.label.as_ref()?;
            let text = u.value.as_text()?;
            if u.value.as_number().is_some() {
                return None;
            }
            meaningful_phrase(text)
        });

        RuleOutcome::Candidates(
            by_value
                .into_iter()
                .filter_map(|u| {
                    let label = u.label.as_deref()?;
                    Some(Candidate::new(label, ProofPoint::from_unit(u)))
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::Point;

    fn unit(id: &str, label: &str, value: &str) -> Unit {
        Unit::new(id, value, Point::new(0.3, 0.4), "doc1", 1).with_label(label)
    }

    fn run(question: &str, units: &[Unit]) -> RuleOutcome {
        UnitLabelRule.try_match(&Question::parse(question), &Facts::new(units, &[], &[]))
    }

    fn answers(outcome: RuleOutcome) -> Vec<String> {
        match outcome {
            RuleOutcome::Candidates(c) => c.into_iter().map(|c| c.answer).collect(),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_not_applicable_for_stopword_question() {
        assert_eq!(run("what is it?", &[unit("u1", "VCC", "3.3")]), RuleOutcome::NotApplicable);
    }

    #[test]
    fn test_label_lookup_answers_with_value() {
        let units = [Unit::new("u1", 3.3, Point::new(0.0, 0.0), "doc1", 0)
            .with_label("VCC")
            .with_unit_of_measure("V")];
        assert_eq!(answers(run("What is VCC?", &units)), vec!["3.3 V"]);
    }

    #[test]
    fn test_longest_label_wins() {
        let units = [
            unit("u1", "voltage", "1"),
            unit("u2", "charge voltage", "4.2"),
        ];
        assert_eq!(answers(run("what is the charge voltage", &units)), vec!["4.2"]);
    }

    #[test]
    fn test_same_label_keeps_both_candidates() {
        let units = [unit("u1", "VCC", "3.3"), unit("u2", "VCC", "5")];
        assert_eq!(answers(run("what is vcc", &units)), vec!["3.3", "5"]);
    }

    #[test]
    fn test_value_lookup_answers_with_label() {
        let units = [unit("u1", "pin 7 function", "RESET")];
        assert_eq!(answers(run("which signal is RESET", &units)), vec!["pin 7 function"]);
    }

    #[test]
    fn test_numeric_text_values_are_not_value_lookups() {
        let units = [unit("u1", "supply", "3.3")];
        assert!(answers(run("what is 3.3", &units)).is_empty());
    }

    #[test]
    fn test_no_label_match_is_empty_candidates() {
        let units = [unit("u1", "VCC", "3.3")];
        assert!(answers(run("what is the weather", &units)).is_empty());
    }
}
