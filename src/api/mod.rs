//! Request handling layer for akili
//!
//! One JSON request in, one JSON response out.
//!
//! # Design Principles
//!
//! - Error codes passed through unchanged
//! - A refusal is a successful response, never an error
//! - The engine is called with a fresh fact snapshot per request
//!
//! # Supported Operations
//!
//! - query
//! - explain
//! - documents
//! - facts
//! - delete

mod errors;
mod handler;
mod request;
mod response;

pub use errors::{ApiError, ApiErrorCode, ApiResult, Severity};
pub use handler::{RequestHandler, DEFAULT_MAX_QUESTION_BYTES};
pub use request::{DocumentRequest, QuestionRequest, Request};
pub use response::Response;
