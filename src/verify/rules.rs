//! Proof derivation rules
//!
//! Rules are tried in the fixed order of `RULE_ORDER`. The order is part of
//! the determinism contract: when two rules could both answer, the earlier
//! one decides.
//!
//! 1. `label_lookup`: identifier key via Bijection or Grid
//! 2. `quantity`: numeric superlative / quantity over Units
//! 3. `unit_label`: direct Unit label (or text value) lookup

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::canonical::{Bijection, FactSet, Grid, Unit};

use super::label_lookup::LabelLookupRule;
use super::question::Question;
use super::superlative::QuantityRule;
use super::unit_lookup::UnitLabelRule;
use super::verdict::ProofPoint;

/// Stable rule identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    LabelLookup,
    Quantity,
    UnitLabel,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::LabelLookup => "label_lookup",
            RuleId::Quantity => "quantity",
            RuleId::UnitLabel => "unit_label",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Borrowed view of one document's facts
#[derive(Debug, Clone, Copy)]
pub struct Facts<'a> {
    pub units: &'a [Unit],
    pub bijections: &'a [Bijection],
    pub grids: &'a [Grid],
}

impl<'a> Facts<'a> {
    pub fn new(units: &'a [Unit], bijections: &'a [Bijection], grids: &'a [Grid]) -> Self {
        Self {
            units,
            bijections,
            grids,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty() && self.bijections.is_empty() && self.grids.is_empty()
    }
}

impl<'a> From<&'a FactSet> for Facts<'a> {
    fn from(set: &'a FactSet) -> Self {
        Facts::new(&set.units, &set.bijections, &set.grids)
    }
}

/// One candidate answer backed by exactly one fact
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub answer: String,
    pub proof: ProofPoint,
}

impl Candidate {
    pub fn new(answer: impl Into<String>, proof: ProofPoint) -> Self {
        Self {
            answer: answer.into(),
            proof,
        }
    }
}

/// What a rule made of the question
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// The question does not have this rule's shape
    NotApplicable,
    /// Shape recognized; zero or more candidates, in fact input order
    Candidates(Vec<Candidate>),
    /// Shape recognized, but answering needs a comparison across these unit strings
    Incomparable(Vec<String>),
}

/// A proof derivation rule
pub trait Rule: Send + Sync {
    fn id(&self) -> RuleId;

    /// Inspects the question and facts; never mutates either
    fn try_match(&self, question: &Question, facts: &Facts<'_>) -> RuleOutcome;
}

/// Rule priority order
pub static RULE_ORDER: &[&dyn Rule] = &[&LabelLookupRule, &QuantityRule, &UnitLabelRule];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order_is_fixed() {
        let ids: Vec<RuleId> = RULE_ORDER.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![RuleId::LabelLookup, RuleId::Quantity, RuleId::UnitLabel]);
    }

    #[test]
    fn test_rule_id_strings() {
        assert_eq!(RuleId::LabelLookup.to_string(), "label_lookup");
        assert_eq!(
            serde_json::to_string(&RuleId::UnitLabel).unwrap(),
            "\"unit_label\""
        );
    }

    #[test]
    fn test_facts_view_from_set() {
        let set = FactSet::default();
        let facts = Facts::from(&set);
        assert!(facts.is_empty());
    }
}
