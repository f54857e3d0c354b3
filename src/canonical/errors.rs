//! # Canonicalization Errors
//!
//! A `CanonicalError` explains why one extracted record was kept out of the
//! truth store. Rejections are reported, never silently repaired.

use thiserror::Error;

/// Result type for single-record canonicalization
pub type CanonicalResult<T> = Result<T, CanonicalError>;

/// Reasons a record fails the canonical contract
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanonicalError {
    #[error("Missing id")]
    MissingId,

    #[error("Missing or blank value")]
    MissingValue,

    #[error("Non-finite coordinate in {0}")]
    InvalidCoordinate(&'static str),

    #[error("Mapping is not one-to-one: value '{0}' appears more than once")]
    NotBijective(String),

    #[error("Mapping entry '{0}' is not declared in {1}")]
    UndeclaredMember(String, &'static str),

    #[error("Cell ({row}, {col}) outside {rows}x{cols} grid")]
    CellOutOfRange { row: u32, col: u32, rows: u32, cols: u32 },

    #[error("Duplicate cell ({row}, {col})")]
    DuplicateCell { row: u32, col: u32 },

    #[error("Invalid value in cell ({row}, {col})")]
    InvalidCell { row: u32, col: u32 },

    #[error("Page index {0} does not fit a page number")]
    TooManyPages(usize),
}

impl CanonicalError {
    /// Stable code for logs and reports
    pub fn code(&self) -> &'static str {
        match self {
            CanonicalError::MissingId => "AKILI_FACT_MISSING_ID",
            CanonicalError::MissingValue => "AKILI_FACT_MISSING_VALUE",
            CanonicalError::InvalidCoordinate(_) => "AKILI_FACT_INVALID_COORDINATE",
            CanonicalError::NotBijective(_) => "AKILI_FACT_NOT_BIJECTIVE",
            CanonicalError::UndeclaredMember(_, _) => "AKILI_FACT_UNDECLARED_MEMBER",
            CanonicalError::CellOutOfRange { .. } => "AKILI_FACT_CELL_OUT_OF_RANGE",
            CanonicalError::DuplicateCell { .. } => "AKILI_FACT_DUPLICATE_CELL",
            CanonicalError::InvalidCell { .. } => "AKILI_FACT_INVALID_CELL",
            CanonicalError::TooManyPages(_) => "AKILI_FACT_TOO_MANY_PAGES",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_prefixed() {
        let errors = [
            CanonicalError::MissingId,
            CanonicalError::MissingValue,
            CanonicalError::InvalidCoordinate("origin"),
            CanonicalError::NotBijective("5".into()),
            CanonicalError::UndeclaredMember("x".into(), "left_set"),
            CanonicalError::CellOutOfRange { row: 3, col: 0, rows: 2, cols: 2 },
            CanonicalError::DuplicateCell { row: 0, col: 0 },
            CanonicalError::InvalidCell { row: 0, col: 0 },
            CanonicalError::TooManyPages(usize::MAX),
        ];
        for err in errors {
            assert!(err.code().starts_with("AKILI_FACT_"));
        }
    }

    #[test]
    fn test_display_includes_context() {
        let err = CanonicalError::CellOutOfRange { row: 3, col: 1, rows: 2, cols: 2 };
        assert_eq!(err.to_string(), "Cell (3, 1) outside 2x2 grid");
    }
}
