//! Identifier lookup via Bijection or Grid
//!
//! "pin <key>": a Bijection answers when the key matches exactly one mapping
//! key (forward) or, failing that, exactly one mapping value (reverse). A
//! Grid answers with the neighbouring cell of the same row as the cell that
//! holds the key (right neighbour first, then left).

use crate::canonical::{Bijection, Grid};

use super::question::{normalize, Question};
use super::rules::{Candidate, Facts, Rule, RuleId, RuleOutcome};
use super::verdict::ProofPoint;

pub struct LabelLookupRule;

/// Answer from one bijection, if the key is usable there
fn lookup_bijection(bijection: &Bijection, key: &str) -> Option<String> {
    let forward: Vec<&String> = bijection
        .mapping
        .keys()
        .filter(|k| normalize(k) == key)
        .collect();
    match forward.as_slice() {
        [left] => return bijection.get_right(left).map(String::from),
        [] => {}
        // Key present more than once: unusable as proof
        _ => return None,
    }

    let reverse: Vec<&String> = bijection
        .mapping
        .values()
        .filter(|v| normalize(v) == key)
        .collect();
    match reverse.as_slice() {
        [right] => bijection.get_left(right).map(String::from),
        _ => None,
    }
}

/// Answers from one grid, row-major
fn lookup_grid(grid: &Grid, key: &str) -> Vec<String> {
    grid.cells_row_major()
        .into_iter()
        .filter(|cell| normalize(&cell.value.to_string()) == key)
        .filter_map(|cell| {
            let right = cell.col.checked_add(1).and_then(|c| grid.cell(cell.row, c));
            let left = cell.col.checked_sub(1).and_then(|c| grid.cell(cell.row, c));
            right.or(left).map(|neighbour| neighbour.value.to_string())
        })
        .collect()
}

impl Rule for LabelLookupRule {
    fn id(&self) -> RuleId {
        RuleId::LabelLookup
    }

    fn try_match(&self, question: &Question, facts: &Facts<'_>) -> RuleOutcome {
        let key = match question.identifier_key() {
            Some(key) => key,
            None => return RuleOutcome::NotApplicable,
        };

        let mut candidates = Vec::new();

        for bijection in facts.bijections {
            if let Some(answer) = lookup_bijection(bijection, key) {
                candidates.push(Candidate::new(answer, ProofPoint::from_bijection(bijection)));
            }
        }

        for grid in facts.grids {
            for answer in lookup_grid(grid, key) {
                candidates.push(Candidate::new(answer, ProofPoint::from_grid(grid)));
            }
        }

        RuleOutcome::Candidates(candidates)
    }
}
