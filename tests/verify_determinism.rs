//! Verification Determinism Tests
//!
//! - Identical inputs give byte-identical serialized verdicts
//! - Results do not depend on the calling thread
//! - Every proof point names a fact that was passed in

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use akili::canonical::{Bijection, FactSet, Grid, GridCell, Point, Unit};
use akili::verify::{explain, verify, verify_facts, Verdict};

// =============================================================================
// Test Utilities
// =============================================================================

fn datasheet() -> FactSet {
    FactSet::new(
        vec![
            Unit::new("vmax", 5.0, Point::new(0.2, 0.3), "ds01", 1)
                .with_label("Vmax")
                .with_unit_of_measure("V"),
            Unit::new("vmin", 1.8, Point::new(0.2, 0.35), "ds01", 1)
                .with_label("Vmin")
                .with_unit_of_measure("V"),
            Unit::new("imax", 150.0, Point::new(0.2, 0.4), "ds01", 1)
                .with_label("Imax")
                .with_unit_of_measure("mA"),
            Unit::new("pkg", "QFN-32", Point::new(0.6, 0.1), "ds01", 0).with_label("Package"),
        ],
        vec![Bijection::from_pairs(
            "pinout",
            [("1", "GND"), ("5", "VCC"), ("7", "RESET")],
            Point::new(0.5, 0.5),
            "ds01",
            2,
        )],
        vec![Grid::new(
            "timing",
            2,
            2,
            vec![
                GridCell::new(0, 0, "tSU"),
                GridCell::new(0, 1, "20 ns"),
                GridCell::new(1, 0, "tH"),
                GridCell::new(1, 1, "5 ns"),
            ],
            Point::new(0.1, 0.7),
            "ds01",
            3,
        )],
    )
}

const QUESTIONS: &[&str] = &[
    "what is pin 5",
    "What is pin 7?",
    "what is the maximum voltage",
    "what is the minimum voltage",
    "max current",
    "what is the package",
    "what is tSU",
    "what is pin 42",
    "what is it?",
];

fn serialized(question: &str, facts: &FactSet) -> String {
    verify_facts(question, facts).unwrap().to_json()
}

fn input_ids(facts: &FactSet) -> BTreeSet<String> {
    facts
        .units
        .iter()
        .map(|u| u.id.clone())
        .chain(facts.bijections.iter().map(|b| b.id.clone()))
        .chain(facts.grids.iter().map(|g| g.id.clone()))
        .collect()
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_repeated_calls_are_byte_identical() {
    let facts = datasheet();
    for question in QUESTIONS {
        let first = serialized(question, &facts);
        for _ in 0..5 {
            assert_eq!(serialized(question, &facts), first, "question: {}", question);
        }
    }
}

#[test]
fn test_slice_and_snapshot_entry_points_agree() {
    let facts = datasheet();
    for question in QUESTIONS {
        let from_slices = verify(question, &facts.units, &facts.bijections, &facts.grids).unwrap();
        assert_eq!(from_slices, verify_facts(question, &facts).unwrap());
    }
}

#[test]
fn test_threads_produce_identical_output() {
    let facts = Arc::new(datasheet());
    let expected: Vec<String> = QUESTIONS.iter().map(|q| serialized(q, &facts)).collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let facts = Arc::clone(&facts);
            thread::spawn(move || {
                QUESTIONS
                    .iter()
                    .map(|q| serialized(q, &facts))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_explain_verdict_matches_verify() {
    let facts = datasheet();
    for question in QUESTIONS {
        let trace = explain(question, &facts).unwrap();
        assert_eq!(trace.verdict, verify_facts(question, &facts).unwrap());
        assert_eq!(trace.to_string(), explain(question, &facts).unwrap().to_string());
    }
}

#[test]
fn test_input_order_of_equal_answers_does_not_change_proof_order() {
    let a = Unit::new("u1", 3.3, Point::new(0.1, 0.1), "ds01", 0).with_label("VCC");
    let b = Unit::new("u2", 3.3, Point::new(0.1, 0.2), "ds01", 2).with_label("VCC");

    let forward = verify("what is VCC", &[a.clone(), b.clone()], &[], &[]).unwrap();
    let reverse = verify("what is VCC", &[b, a], &[], &[]).unwrap();
    let ids = |v: &Verdict| -> Vec<String> {
        v.answer().unwrap().proof.iter().map(|p| p.source_id.clone()).collect()
    };
    assert_eq!(ids(&forward), vec!["u1", "u2"]);
    assert_eq!(ids(&forward).len(), ids(&reverse).len());
}

// =============================================================================
// No Hallucinated Proof
// =============================================================================

#[test]
fn test_every_proof_point_names_an_input_fact() {
    let facts = datasheet();
    let ids = input_ids(&facts);

    let mut answered = 0;
    for question in QUESTIONS {
        if let Some(answer) = verify_facts(question, &facts).unwrap().answer() {
            answered += 1;
            assert!(!answer.proof.is_empty(), "answer without proof: {}", question);
            for point in &answer.proof {
                assert!(ids.contains(&point.source_id), "unknown source {}", point.source_id);
            }
        }
    }
    assert!(answered >= 4);
}

#[test]
fn test_proof_carries_fact_provenance() {
    let facts = datasheet();
    let verdict = verify_facts("what is the maximum voltage", &facts).unwrap();
    let answer = verdict.answer().unwrap();
    assert_eq!(answer.text, "5 V");
    assert_eq!(answer.proof.len(), 1);
    let point = &answer.proof[0];
    assert_eq!(point.source_id, "vmax");
    assert_eq!((point.x, point.y, point.page), (0.2, 0.3, 1));
}
