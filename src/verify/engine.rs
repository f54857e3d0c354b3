//! Verification engine
//!
//! Dispatches the question through `RULE_ORDER`. The first rule that yields
//! candidates decides: one distinct answer is returned with its proof, more
//! than one is refused as ambiguous. The engine never picks among
//! conflicting candidates and never falls through to a lower rule once one
//! has produced them.
//!
//! Pure: no I/O, no clock, no randomness, no shared state.

use super::errors::{VerifyError, VerifyResult};
use super::explain::{RuleStep, StepOutcome, VerificationTrace};
use super::question::Question;
use super::refusal::{compose, RefusalCause};
use super::rules::{Candidate, Facts, RuleId, RuleOutcome, RULE_ORDER};
use super::verdict::{Answer, ProofPoint, Verdict};
use crate::canonical::{Bijection, FactSet, Grid, Unit};

/// One distinct answer and the facts supporting it
struct AnswerGroup {
    text: String,
    proof: Vec<ProofPoint>,
}

/// Groups candidates by answer text, first-seen order; proof deduplicated by source id
fn group_candidates(candidates: Vec<Candidate>) -> Vec<AnswerGroup> {
    let mut groups: Vec<AnswerGroup> = Vec::new();
    for c in candidates {
        let idx = match groups.iter().position(|g| g.text == c.answer) {
            Some(idx) => idx,
            None => {
                groups.push(AnswerGroup {
                    text: c.answer,
                    proof: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[idx];
        if !group.proof.iter().any(|p| p.source_id == c.proof.source_id) {
            group.proof.push(c.proof);
        }
    }
    groups
}

fn decide(rule: RuleId, candidates: Vec<Candidate>) -> (StepOutcome, Verdict) {
    let count = candidates.len();
    let mut groups = group_candidates(candidates);
    let outcome = StepOutcome::Candidates {
        count,
        distinct_answers: groups.len(),
    };

    if groups.len() == 1 {
        if let Some(group) = groups.pop() {
            let verdict = Verdict::Answer(Answer {
                text: group.text,
                proof: group.proof,
                rule,
            });
            return (outcome, verdict);
        }
    }

    let mut source_ids: Vec<String> = Vec::new();
    for group in &groups {
        for p in &group.proof {
            if !source_ids.contains(&p.source_id) {
                source_ids.push(p.source_id.clone());
            }
        }
    }
    let cause = RefusalCause::Ambiguous {
        rule,
        answers: groups.len(),
        source_ids,
    };
    (outcome, Verdict::Refuse(compose(&cause)))
}

/// Runs the rule list, recording each consulted rule
fn run(question: &str, facts: Facts<'_>) -> VerifyResult<VerificationTrace> {
    // Blank means nothing survives normalization ("", "   ", "?")
    let parsed = Question::parse(question);
    if parsed.tokens().is_empty() {
        return Err(VerifyError::invalid_input("question has no words"));
    }
    let mut steps = Vec::new();

    let finish = |steps: Vec<RuleStep>, verdict: Verdict| VerificationTrace {
        question: question.to_string(),
        normalized: parsed.normalized().to_string(),
        steps,
        verdict,
    };

    if facts.is_empty() {
        return Ok(finish(steps, Verdict::Refuse(compose(&RefusalCause::EmptyFactSet))));
    }

    let mut recognized = false;

    for rule in RULE_ORDER {
        let id = rule.id();
        match rule.try_match(&parsed, &facts) {
            RuleOutcome::NotApplicable => {
                steps.push(RuleStep {
                    rule: id,
                    outcome: StepOutcome::NotApplicable,
                });
            }
            RuleOutcome::Incomparable(units) => {
                steps.push(RuleStep {
                    rule: id,
                    outcome: StepOutcome::Unsupported,
                });
                let refusal = compose(&RefusalCause::IncomparableUnits { units });
                return Ok(finish(steps, Verdict::Refuse(refusal)));
            }
            RuleOutcome::Candidates(candidates) if candidates.is_empty() => {
                recognized = true;
                steps.push(RuleStep {
                    rule: id,
                    outcome: StepOutcome::NoCandidates,
                });
            }
            RuleOutcome::Candidates(candidates) => {
                let (outcome, verdict) = decide(id, candidates);
                steps.push(RuleStep { rule: id, outcome });
                return Ok(finish(steps, verdict));
            }
        }
    }

    let cause = if recognized {
        RefusalCause::NoCandidates
    } else {
        RefusalCause::UnrecognizedQuestion
    };
    Ok(finish(steps, Verdict::Refuse(compose(&cause))))
}

/// Answers `question` from the given facts, or refuses.
///
/// Fails only for a blank question.
pub fn verify(
    question: &str,
    units: &[Unit],
    bijections: &[Bijection],
    grids: &[Grid],
) -> VerifyResult<Verdict> {
    run(question, Facts::new(units, bijections, grids)).map(|trace| trace.verdict)
}

/// `verify` over a document snapshot
pub fn verify_facts(question: &str, facts: &FactSet) -> VerifyResult<Verdict> {
    run(question, Facts::from(facts)).map(|trace| trace.verdict)
}

/// Same decision as `verify_facts`, with the per-rule trace
pub fn explain(question: &str, facts: &FactSet) -> VerifyResult<VerificationTrace> {
    run(question, Facts::from(facts))
}
