//! # Error Types
//!
//! Errors raised before any storage is touched: malformed input and rule
//! violations.
//!
//! ```text
//! "7.5.0"  ──parse──► CoreError::InvalidAmount
//! "tonic"  ──parse──► CoreError::UnknownItemType
//! ""       ──check──► ValidationError::Required ──► AuditError::Validation
//! ```
//!
//! `DbError` (fairbill-db) and `GatewayError`/`AuditError` (fairbill-audit)
//! build on these.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A monetary amount could not be parsed.
    ///
    /// ## When This Occurs
    /// - User typed "abc" or "1.234" as a charged price
    /// - More than two decimal places
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    /// An item type string is not `medicine` or `procedure`.
    #[error("Unknown item type '{0}', expected medicine or procedure")]
    UnknownItemType(String),

    /// A bill date could not be parsed.
    #[error("Invalid bill date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any gateway call runs.
#[derive(Debug, Error, PartialEq, Eq)]
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

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Catalog minimum exceeds maximum.
    #[error("govt_min_price {min} exceeds govt_max_price {max}")]
    InvalidRange { min: i64, max: i64 },

    /// Bill has more line items than allowed.
    #[error("a bill cannot have more than {max} items")]
    TooManyItems { max: usize },
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
        let err = CoreError::InvalidAmount {
            input: "abc".to_string(),
            reason: "not a number".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid amount 'abc': not a number");

        let err = CoreError::UnknownItemType("device".to_string());
        assert_eq!(
            err.to_string(),
            "Unknown item type 'device', expected medicine or procedure"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "patient_name".to_string(),
        };
        assert_eq!(err.to_string(), "patient_name is required");

        let err = ValidationError::InvalidRange { min: 500, max: 200 };
        assert_eq!(
            err.to_string(),
            "govt_min_price 500 exceeds govt_max_price 200"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
