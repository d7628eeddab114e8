//! # Database Errors
//!
//! ```text
//! sqlx::Error ──► DbError ──► GatewayError::Db (fairbill-audit) ──► CLI alert
//! ```
//!
//! Constraint failures are classified with [`sqlx::error::ErrorKind`], so
//! callers can tell bad data (a bill item pointing at a missing bill, a
//! catalog range with `min > max`) from a broken database.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    /// A `fetch_one` found no row.
    #[error("{entity} not found")]
    NotFound { entity: String },

    #[error("Unique constraint violation: {message}")]
    UniqueViolation { message: String },

    /// e.g. a bill item whose `bill_id` has no bill.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// e.g. a catalog row with `govt_min_price > govt_max_price`.
    #[error("Check constraint violation: {message}")]
    CheckViolation { message: String },

    /// The file or directory could not be opened, or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected the statement for a reason other than a constraint.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// `BEGIN` or `COMMIT` failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// True when the data, not the database, was at fault.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::UniqueViolation { .. }
                | DbError::ForeignKeyViolation { .. }
                | DbError::CheckViolation { .. }
        )
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation { message },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
                    ErrorKind::CheckViolation => DbError::CheckViolation { message },
                    _ => DbError::QueryFailed(message),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn test_pool_errors() {
        let err: DbError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DbError::PoolExhausted));

        let err: DbError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }

    #[test]
    fn test_constraint_classification() {
        let err = DbError::CheckViolation {
            message: "CHECK constraint failed: govt_min_price <= govt_max_price".to_string(),
        };
        assert!(err.is_constraint_violation());
        assert!(!DbError::PoolExhausted.is_constraint_violation());
    }
}
