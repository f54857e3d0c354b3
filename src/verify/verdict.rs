//! Verification results: Answer with proof, or Refusal
//!
//! Serialized with a `status` tag ("answer" | "refuse"). Field order is
//! fixed by the struct definitions, so serialization is byte-stable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::canonical::{Bijection, BoundingBox, Grid, Point, SourceType, Unit};

use super::rules::RuleId;

/// Coordinate evidence for an answer, traceable to one canonical fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofPoint {
    pub x: f64,
    pub y: f64,
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    pub source_id: String,
    pub source_type: SourceType,
}

impl ProofPoint {
    fn new(
        origin: Point,
        page: u32,
        bbox: Option<BoundingBox>,
        source_id: &str,
        source_type: SourceType,
    ) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            page,
            bbox,
            source_id: source_id.to_string(),
            source_type,
        }
    }

    pub fn from_unit(unit: &Unit) -> Self {
        Self::new(unit.origin, unit.page, unit.bbox, &unit.id, SourceType::Unit)
    }

    pub fn from_bijection(bijection: &Bijection) -> Self {
        Self::new(
            bijection.origin,
            bijection.page,
            bijection.bbox,
            &bijection.id,
            SourceType::Bijection,
        )
    }

    /// Grid proofs point at the grid's own origin/bbox
    pub fn from_grid(grid: &Grid) -> Self {
        Self::new(grid.origin, grid.page, grid.bbox, &grid.id, SourceType::Grid)
    }
}

/// Answer derivable from canonical facts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub proof: Vec<ProofPoint>,
    /// Rule that derived the answer
    pub rule: RuleId,
}

/// Refusal categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefusalKind {
    /// No rule produced any candidate
    NoMatchingFact,
    /// A rule produced two or more conflicting candidates
    AmbiguousFacts,
    /// The question matches no rule's shape, or asks for something no rule can do soundly
    UnsupportedQuestionPattern,
}

impl RefusalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefusalKind::NoMatchingFact => "no_matching_fact",
            RefusalKind::AmbiguousFacts => "ambiguous_facts",
            RefusalKind::UnsupportedQuestionPattern => "unsupported_question_pattern",
        }
    }
}

impl fmt::Display for RefusalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deterministic refusal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refusal {
    pub reason_kind: RefusalKind,
    pub reason_text: String,
}

/// Outcome of one verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Verdict {
    Answer(Answer),
    Refuse(Refusal),
}

impl Verdict {
    pub fn is_answer(&self) -> bool {
        matches!(self, Verdict::Answer(_))
    }

    pub fn answer(&self) -> Option<&Answer> {
        match self {
            Verdict::Answer(a) => Some(a),
            Verdict::Refuse(_) => None,
        }
    }

    pub fn refusal(&self) -> Option<&Refusal> {
        match self {
            Verdict::Refuse(r) => Some(r),
            Verdict::Answer(_) => None,
        }
    }

    /// Serialized JSON form
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("Verdict serialization cannot fail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_serialization_shape() {
        let verdict = Verdict::Answer(Answer {
            text: "VCC".into(),
            proof: vec![ProofPoint {
                x: 0.5,
                y: 0.3,
                page: 0,
                bbox: None,
                source_id: "pinout".into(),
                source_type: SourceType::Bijection,
            }],
            rule: RuleId::LabelLookup,
        });
        let json: serde_json::Value = serde_json::from_str(&verdict.to_json()).unwrap();
        assert_eq!(json["status"], "answer");
        assert_eq!(json["text"], "VCC");
        assert_eq!(json["rule"], "label_lookup");
        assert_eq!(json["proof"][0]["source_type"], "bijection");
        assert!(json["proof"][0].get("bbox").is_none());
    }

    #[test]
    fn test_refusal_serialization_shape() {
        let verdict = Verdict::Refuse(Refusal {
            reason_kind: RefusalKind::AmbiguousFacts,
            reason_text: "Ambiguous facts".into(),
        });
        let json: serde_json::Value = serde_json::from_str(&verdict.to_json()).unwrap();
        assert_eq!(json["status"], "refuse");
        assert_eq!(json["reason_kind"], "ambiguous_facts");
    }

    #[test]
    fn test_verdict_json_roundtrip() {
        let verdict = Verdict::Refuse(Refusal {
            reason_kind: RefusalKind::NoMatchingFact,
            reason_text: "No canonical fact derives this answer.".into(),
        });
        let back: Verdict = serde_json::from_str(&verdict.to_json()).unwrap();
        assert_eq!(back, verdict);
    }

    #[test]
    fn test_grid_proof_uses_grid_origin() {
        let grid = Grid::new("g1", 1, 1, vec![], Point::new(0.2, 0.4), "doc1", 3);
        let proof = ProofPoint::from_grid(&grid);
        assert_eq!((proof.x, proof.y, proof.page), (0.2, 0.4, 3));
        assert_eq!(proof.source_type, SourceType::Grid);
    }
}
