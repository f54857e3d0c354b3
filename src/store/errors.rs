//! Fact store errors
//!
//! Error codes:
//! - AKILI_STORE_NOT_FOUND
//! - AKILI_STORE_INVALID_DOC_ID
//! - AKILI_STORE_CORRUPTED
//! - AKILI_STORE_IO_ERROR
//! - AKILI_STORE_SERIALIZATION

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Fact store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Invalid document id: {0}")]
    InvalidDocId(String),

    #[error("Document record corrupted: {0}")]
    Corrupted(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "AKILI_STORE_NOT_FOUND",
            StoreError::InvalidDocId(_) => "AKILI_STORE_INVALID_DOC_ID",
            StoreError::Corrupted(_) => "AKILI_STORE_CORRUPTED",
            StoreError::Io(_) => "AKILI_STORE_IO_ERROR",
            StoreError::Serialization(_) => "AKILI_STORE_SERIALIZATION",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
