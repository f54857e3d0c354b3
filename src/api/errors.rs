//! API error types
//!
//! API errors are pass-through: they preserve the codes of the subsystem
//! that failed (verification, store). Refusals are not errors and never
//! reach this type.

use std::fmt;

use crate::store::StoreError;
use crate::verify::VerifyError;

/// API error severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller request rejected
    Reject,
    /// Operation failed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// API-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// Malformed request
    AkiliInvalidRequest,
    /// Unknown `op`
    AkiliUnknownOperation,
    /// Question longer than the configured limit
    AkiliQuestionTooLarge,
    /// Response could not be built
    AkiliInternalError,
}

impl ApiErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorCode::AkiliInvalidRequest => "AKILI_INVALID_REQUEST",
            ApiErrorCode::AkiliUnknownOperation => "AKILI_UNKNOWN_OPERATION",
            ApiErrorCode::AkiliQuestionTooLarge => "AKILI_QUESTION_TOO_LARGE",
            ApiErrorCode::AkiliInternalError => "AKILI_INTERNAL_ERROR",
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        match self {
            ApiErrorCode::AkiliInternalError => Severity::Error,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// API error with the originating subsystem's code preserved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    code: String,
    message: String,
    severity: Severity,
}

impl ApiError {
    fn with_code(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code().to_string(),
            message: message.into(),
            severity: code.severity(),
        }
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::with_code(ApiErrorCode::AkiliInvalidRequest, reason)
    }

    pub fn unknown_operation(op: impl Into<String>) -> Self {
        Self::with_code(
            ApiErrorCode::AkiliUnknownOperation,
            format!("Unknown operation: {}", op.into()),
        )
    }

    pub fn question_too_large(len: usize, max: usize) -> Self {
        Self::with_code(
            ApiErrorCode::AkiliQuestionTooLarge,
            format!("Question is {} bytes (max: {})", len, max),
        )
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::with_code(ApiErrorCode::AkiliInternalError, reason)
    }

    /// Pass-through from the verification engine
    pub fn from_verify_error(err: VerifyError) -> Self {
        Self {
            code: err.code().code().to_string(),
            message: err.message().to_string(),
            severity: Severity::Reject,
        }
    }

    /// Pass-through from the fact store
    pub fn from_store_error(err: StoreError) -> Self {
        let severity = match err {
            StoreError::NotFound(_) | StoreError::InvalidDocId(_) => Severity::Reject,
            _ => Severity::Error,
        };
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            severity,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_error() {
        let err = ApiError::invalid_request("missing doc_id");
        assert_eq!(err.code(), "AKILI_INVALID_REQUEST");
        assert_eq!(err.severity(), Severity::Reject);
    }

    #[test]
    fn test_verify_error_passes_through() {
        let err = ApiError::from_verify_error(VerifyError::invalid_input("question is empty"));
        assert_eq!(err.code(), "AKILI_VERIFY_INVALID_INPUT");
        assert_eq!(err.message(), "question is empty");
    }

    #[test]
    fn test_store_error_passes_through() {
        let err = ApiError::from_store_error(StoreError::Corrupted("doc1".into()));
        assert_eq!(err.code(), "AKILI_STORE_CORRUPTED");
        assert_eq!(err.severity(), Severity::Error);

        let err = ApiError::from_store_error(StoreError::NotFound("doc1".into()));
        assert_eq!(err.severity(), Severity::Reject);
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::unknown_operation("insert");
        assert_eq!(
            err.to_string(),
            "[REJECT] AKILI_UNKNOWN_OPERATION: Unknown operation: insert"
        );
    }
}
