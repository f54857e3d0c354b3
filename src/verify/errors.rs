//! Verification error types
//!
//! Refusals are NOT errors. The only error the engine raises is a caller
//! contract violation, and it must never be folded into a refusal.
//!
//! Error codes:
//! - AKILI_VERIFY_INVALID_INPUT (REJECT)

use std::fmt;

/// Severity levels for verification errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller request rejected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Verification error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyErrorCode {
    /// Caller passed input outside the engine's contract
    AkiliVerifyInvalidInput,
}

impl VerifyErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            VerifyErrorCode::AkiliVerifyInvalidInput => "AKILI_VERIFY_INVALID_INPUT",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for VerifyErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Verification error with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyError {
    code: VerifyErrorCode,
    message: String,
}

impl VerifyError {
    /// Create an invalid input error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self {
            code: VerifyErrorCode::AkiliVerifyInvalidInput,
            message: reason.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> VerifyErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code, self.message)
    }
}

impl std::error::Error for VerifyError {}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerifyError>;
