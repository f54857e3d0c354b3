//! akili - deterministic verification of answers against canonical document facts
//!
//! Every answer is backed by at least one coordinate-grounded fact.
//! When no rule derives an answer, the engine refuses with a typed reason.

pub mod api;
pub mod canonical;
pub mod cli;
pub mod observability;
pub mod store;
pub mod verify;
