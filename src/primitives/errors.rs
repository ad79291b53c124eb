//! Field value error types
//!
//! Error codes:
//! - HABIT_UNSUPPORTED_PRIMITIVE_TYPE
//! - HABIT_INVALID_FIELD
//! - HABIT_INVALID_VALIDATION
//! - HABIT_REQUIRED_FIELD_MISSING
//! - HABIT_TYPE_MISMATCH
//! - HABIT_RANGE_VIOLATION
//! - HABIT_PATTERN_MISMATCH
//! - HABIT_COLUMN_TYPE_MISMATCH
//!
//! Every kind is a client error: the caller supplied a bad definition or value.

use thiserror::Error;

use super::types::{ColumnKey, PrimitiveType};

/// Result type for field value operations
pub type FieldResult<T> = Result<T, FieldError>;

/// Field definition and field value errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("Unsupported primitive type: {0}")]
    UnsupportedPrimitiveType(String),

    #[error("{0}")]
    InvalidField(String),

    #[error("{0}")]
    InvalidValidation(String),

    #[error("Field \"{field_key}\" is required.")]
    RequiredFieldMissing { field_key: String },

    /// `expected` completes the sentence, e.g. "expects a boolean value"
    #[error("Field \"{field_key}\" {expected}.")]
    TypeMismatch { field_key: String, expected: String },

    /// `constraint` names the failed bound, e.g. "must be >= 50"
    #[error("Field \"{field_key}\" {constraint}.")]
    RangeViolation { field_key: String, constraint: String },

    #[error("Field \"{field_key}\" does not match required pattern.")]
    PatternMismatch { field_key: String },

    #[error("Field \"{field_key}\" of type \"{primitive_type}\" cannot use column \"{column}\".")]
    ColumnTypeMismatch {
        field_key: String,
        primitive_type: PrimitiveType,
        column: ColumnKey,
    },
}

impl FieldError {
    pub(crate) fn type_mismatch(field_key: &str, expected: impl Into<String>) -> Self {
        FieldError::TypeMismatch {
            field_key: field_key.to_string(),
            expected: expected.into(),
        }
    }

    pub(crate) fn range(field_key: &str, constraint: impl Into<String>) -> Self {
        FieldError::RangeViolation {
            field_key: field_key.to_string(),
            constraint: constraint.into(),
        }
    }

    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::UnsupportedPrimitiveType(_) => "HABIT_UNSUPPORTED_PRIMITIVE_TYPE",
            FieldError::InvalidField(_) => "HABIT_INVALID_FIELD",
            FieldError::InvalidValidation(_) => "HABIT_INVALID_VALIDATION",
            FieldError::RequiredFieldMissing { .. } => "HABIT_REQUIRED_FIELD_MISSING",
            FieldError::TypeMismatch { .. } => "HABIT_TYPE_MISMATCH",
            FieldError::RangeViolation { .. } => "HABIT_RANGE_VIOLATION",
            FieldError::PatternMismatch { .. } => "HABIT_PATTERN_MISMATCH",
            FieldError::ColumnTypeMismatch { .. } => "HABIT_COLUMN_TYPE_MISMATCH",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        400
    }

    /// The field key the error is about, when it concerns a value
    pub fn field_key(&self) -> Option<&str> {
        match self {
            FieldError::RequiredFieldMissing { field_key }
            | FieldError::TypeMismatch { field_key, .. }
            | FieldError::RangeViolation { field_key, .. }
            | FieldError::PatternMismatch { field_key }
            | FieldError::ColumnTypeMismatch { field_key, .. } => Some(field_key),
            _ => None,
        }
    }
}
