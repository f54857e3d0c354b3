//! Verification and refusal engine for akili
//!
//! Given a question and the canonical facts of one document, either derive
//! a single answer with coordinate proof or refuse with a classified reason.
//!
//! # Design Principles
//!
//! - Deterministic: same inputs, same verdict, same serialized bytes
//! - Grounded: every proof point names an input fact
//! - Refuse over guess: conflicting candidates are never resolved
//! - No conversion: values in different unit strings are not compared
//!
//! # Rule Priority (strict order)
//!
//! 1. `label_lookup`: identifier key via Bijection or Grid
//! 2. `quantity`: numeric superlative / quantity over Units
//! 3. `unit_label`: direct Unit label lookup
//!
//! The first rule producing candidates decides.

mod engine;
mod errors;
mod explain;
mod label_lookup;
mod quantity;
mod question;
mod refusal;
mod rules;
mod superlative;
mod unit_lookup;
mod verdict;

pub use engine::{explain, verify, verify_facts};
pub use errors::{Severity, VerifyError, VerifyErrorCode, VerifyResult};
pub use explain::{RuleStep, StepOutcome, VerificationTrace};
pub use label_lookup::LabelLookupRule;
pub use quantity::{Aggregate, QuantityFamily};
pub use question::{normalize, Question};
pub use refusal::{compose, RefusalCause};
pub use rules::{Candidate, Facts, Rule, RuleId, RuleOutcome, RULE_ORDER};
pub use superlative::QuantityRule;
pub use unit_lookup::UnitLabelRule;
pub use verdict::{Answer, ProofPoint, Refusal, RefusalKind, Verdict};
