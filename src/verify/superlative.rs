//! Numeric superlative / quantity over Units
//!
//! "what is the maximum voltage", "lowest charge current", "what is the
//! cutoff voltage". The question names an aggregate, a quantity family, or
//! both. Values are only compared when every unit string in the pool is
//! identical; "V" vs "mV" is never converted.
//!
//! A Unit takes part when its value is numeric, or when its text value
//! (failing that, its label) embeds a quantity such as "4.2V" or
//! "2000 mAh". Units whose label occurs in the question are answered by
//! label before any aggregate is applied.

use std::cmp::Ordering;

use crate::canonical::Unit;

use super::quantity::{detect_aggregate, detect_family, parse_embedded, Aggregate, QuantityFamily};
use super::question::{is_number, normalize, tokenize, Question};
use super::rules::{Candidate, Facts, Rule, RuleId, RuleOutcome};
use super::verdict::ProofPoint;

pub struct QuantityRule;

/// A Unit read as a number with a unit string
#[derive(Debug, Clone)]
struct Measured<'a> {
    unit: &'a Unit,
    value: f64,
    uom: String,
    parsed: bool,
}

impl<'a> Measured<'a> {
    fn of(unit: &'a Unit) -> Option<Self> {
        if let Some(value) = unit.value.as_number() {
            let uom = unit
                .unit_of_measure
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .to_string();
            return Some(Self {
                unit,
                value,
                uom,
                parsed: false,
            });
        }

        let (value, uom) = unit
            .value
            .as_text()
            .and_then(parse_embedded)
            .or_else(|| unit.label.as_deref().and_then(parse_embedded))?;
        Some(Self {
            unit,
            value,
            uom,
            parsed: true,
        })
    }

    fn in_family(&self, family: QuantityFamily) -> bool {
        !self.uom.is_empty() && family.matches_unit(&self.uom)
    }

    fn answer(&self) -> String {
        if !self.parsed {
            return self.unit.display_value();
        }
        format!("{} {}", self.value, self.uom)
    }

    fn candidate(&self) -> Candidate {
        Candidate::new(self.answer(), ProofPoint::from_unit(self.unit))
    }

    fn label_key(&self) -> Option<String> {
        self.unit
            .label
            .as_deref()
            .map(normalize)
            .filter(|l| !l.is_empty())
    }
}

/// Subject terms: what remains after aggregate, family and number words
fn subject_terms<'q>(question: &'q Question) -> Vec<&'q str> {
    question
        .content_tokens()
        .into_iter()
        .filter(|t| Aggregate::from_token(t).is_none())
        .filter(|t| !QuantityFamily::is_family_token(t))
        .filter(|t| !is_number(t))
        .collect()
}

/// Number of subject terms found in the unit's label or context
fn subject_score(unit: &Unit, subject: &[&str]) -> usize {
    let mut words = Vec::new();
    if let Some(label) = &unit.label {
        words.extend(tokenize(label));
    }
    if let Some(context) = &unit.context {
        words.extend(tokenize(context));
    }
    subject.iter().filter(|s| words.iter().any(|w| w == *s)).count()
}

/// Distinct unit strings in first-seen order
fn distinct_units(pool: &[Measured<'_>]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for m in pool {
        if !seen.contains(&m.uom) {
            seen.push(m.uom.clone());
        }
    }
    seen
}

/// Units whose label occurs in the question; longest labels only
fn label_matches<'a>(question: &Question, pool: &[Measured<'a>]) -> Vec<Measured<'a>> {
    let mut best = 0;
    let mut matched = Vec::new();
    for m in pool {
        let phrase = match &m.unit.label {
            Some(label) => tokenize(label),
            None => continue,
        };
        if phrase.is_empty() || !question.contains_phrase(&phrase) {
            continue;
        }
        match phrase.len().cmp(&best) {
            Ordering::Greater => {
                best = phrase.len();
                matched = vec![m.clone()];
            }
            Ordering::Equal => matched.push(m.clone()),
            Ordering::Less => {}
        }
    }
    matched
}

/// Extreme members of a comparable pool.
///
/// A winner's label siblings that disagree with it are kept too, so the
/// caller sees the conflict instead of a silent pick.
fn extremes<'a>(pool: &[Measured<'a>], aggregate: Aggregate) -> Vec<Measured<'a>> {
    let values = pool.iter().map(|m| m.value);
    let extreme = match aggregate {
        Aggregate::Max => values.max_by(|a, b| a.total_cmp(b)),
        Aggregate::Min => values.min_by(|a, b| a.total_cmp(b)),
    };
    let Some(extreme) = extreme else {
        return Vec::new();
    };

    let winners: Vec<&Measured<'a>> = pool
        .iter()
        .filter(|m| m.value.total_cmp(&extreme) == Ordering::Equal)
        .collect();
    let winner_labels: Vec<String> = winners.iter().filter_map(|m| m.label_key()).collect();

    pool.iter()
        .filter(|m| {
            m.value.total_cmp(&extreme) == Ordering::Equal
                || m.label_key().is_some_and(|l| winner_labels.contains(&l))
        })
        .cloned()
        .collect()
}

impl Rule for QuantityRule {
    fn id(&self) -> RuleId {
        RuleId::Quantity
    }

    fn try_match(&self, question: &Question, facts: &Facts<'_>) -> RuleOutcome {
        let aggregate = detect_aggregate(question.tokens());
        let family = detect_family(question.tokens());
        if aggregate.is_none() && family.is_none() {
            return RuleOutcome::NotApplicable;
        }

        let measured: Vec<Measured<'_>> = facts
            .units
            .iter()
            .filter_map(Measured::of)
            .filter(|m| family.map_or(true, |f| m.in_family(f)))
            .collect();

        // An exact label wins over the aggregate
        let labelled = label_matches(question, &measured);
        if !labelled.is_empty() {
            return RuleOutcome::Candidates(labelled.iter().map(Measured::candidate).collect());
        }

        let subject = subject_terms(question);
        let scored: Vec<(Measured<'_>, usize)> = measured
            .into_iter()
            .map(|m| {
                let score = subject_score(m.unit, &subject);
                (m, score)
            })
            // Without a family the subject alone selects the group
            .filter(|(_, score)| family.is_some() || *score > 0)
            .collect();

        let top = scored.iter().map(|(_, s)| *s).max().unwrap_or(0);
        let pool: Vec<Measured<'_>> = scored
            .into_iter()
            .filter(|(_, s)| top == 0 || *s == top)
            .map(|(m, _)| m)
            .collect();

        if pool.is_empty() {
            return RuleOutcome::Candidates(Vec::new());
        }

        match aggregate {
            Some(aggregate) => {
                let units = distinct_units(&pool);
                if units.len() > 1 {
                    return RuleOutcome::Incomparable(units);
                }
                RuleOutcome::Candidates(extremes(&pool, aggregate).iter().map(Measured::candidate).collect())
            }
            None => RuleOutcome::Candidates(pool.iter().map(Measured::candidate).collect()),
        }
    }
}
