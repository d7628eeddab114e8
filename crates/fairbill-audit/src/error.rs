//! # Audit Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  GatewayError (backend calls)          AuditError (checker/verifier)   │
//! │  ├── Db(DbError)                       ├── Validation                  │
//! │  ├── Unavailable                       ├── BillNotSaved(GatewayError)  │
//! │  └── PartialWrite { bill_id }  ──────► ├── ItemsNotSaved { bill_id }   │
//! │                                        └── Gateway(GatewayError)       │
//! │                                                                         │
//! │  Search failures never surface here: the checker logs them and         │
//! │  reports the item as not found.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use fairbill_core::{CoreError, ValidationError};
use fairbill_db::DbError;
use thiserror::Error;

/// Result type alias for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Result type alias for checker, verifier and complaint operations.
pub type AuditResult<T> = Result<T, AuditError>;

// =============================================================================
// Gateway Error
// =============================================================================

/// A backend read or write failed.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// SQLite reported an error.
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    /// The backend could not be reached or refused the call.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The bill row was written but its items were not.
    ///
    /// Only produced by gateways that cannot write bill and items
    /// atomically.
    #[error("Bill {bill_id} saved but its items were not: {reason}")]
    PartialWrite { bill_id: i64, reason: String },
}

// =============================================================================
// Audit Error
// =============================================================================

/// Errors returned to callers of the checker, verifier and complaint desk.
#[derive(Debug, Error)]
pub enum AuditError {
    /// User input was rejected before any backend call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The bill insert failed; nothing was stored.
    #[error("Failed to save bill: {0}")]
    BillNotSaved(#[source] GatewayError),

    /// The bill was stored without its items.
    #[error("Bill {bill_id} was saved but its items were not: {reason}")]
    ItemsNotSaved { bill_id: i64, reason: String },

    /// Any other backend failure (listing, complaint insert, stats).
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl From<CoreError> for AuditError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => AuditError::Validation(v),
            other => AuditError::Validation(ValidationError::InvalidFormat {
                field: "input".to_string(),
                reason: other.to_string(),
            }),
        }
    }
}

impl AuditError {
    /// Maps a failed bill save, splitting out partial writes.
    pub(crate) fn from_save(err: GatewayError) -> Self {
        match err {
            GatewayError::PartialWrite { bill_id, reason } => {
                AuditError::ItemsNotSaved { bill_id, reason }
            }
            other => AuditError::BillNotSaved(other),
        }
    }
}
