//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError        - Malformed transaction records                  │
//! │  └── ValidationError  - Field-level validation failures                │
//! │                                                                         │
//! │  till-receipt errors (separate crate)                                  │
//! │  ├── EncodingError    - QR payload could not be encoded (recovered)    │
//! │  └── ReceiptError     - Config / I/O / invalid record (hard failure)   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ReceiptError → caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only a malformed record is a hard failure for receipt printing. A missing
//! or broken QR code never surfaces as an error; see `till-receipt`.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
///
/// These are raised before any receipt work starts, so a rejected record
/// never produces a half-built document.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The record has more lines than a receipt may carry.
    #[error("Receipt cannot have more than {max} items (got {actual})")]
    TooManyItems { max: usize, actual: usize },

    /// The record could not be parsed from its JSON form.
    ///
    /// ## When This Occurs
    /// - Dashboard sent a field with the wrong type
    /// - `settlement.kind` is neither "sale" nor "purchase"
    #[error("Invalid transaction record: {0}")]
    InvalidRecord(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a transaction record doesn't meet requirements.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::TooManyItems {
            max: 500,
            actual: 501,
        };
        assert_eq!(
            err.to_string(),
            "Receipt cannot have more than 500 items (got 501)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "identifier".to_string(),
        };
        assert_eq!(err.to_string(), "identifier is required");

        let err = ValidationError::MustBePositive {
            field: "items[0].quantity".to_string(),
        };
        assert_eq!(err.to_string(), "items[0].quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "identifier".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
