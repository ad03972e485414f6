//! # Persistence Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io / serde_json / sqlx errors     CoreError (validation, stock)  │
//! │       │                                      │                          │
//! │       ▼                                      ▼                          │
//! │  DbError (this module) ◄─────────── DbError::Domain                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in the app) ← {code, message} for callers                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use inventorypro_core::{CoreError, ErrorKind};
use thiserror::Error;

/// SQLSTATE raised by PostgreSQL for an unknown function.
pub(crate) const UNDEFINED_FUNCTION: &str = "42883";

/// SQLSTATE raised for CHECK constraint violations.
const CHECK_VIOLATION: &str = "23514";

/// Store operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found.
    ///
    /// ## When This Occurs
    /// - Updating or deleting an id that does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A business rule rejected the operation (validation, empty cart,
    /// insufficient stock). Stored state is untouched.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Reading or writing the JSON store failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A remote row could not be mapped onto the domain model.
    #[error("Invalid data in {table}: {message}")]
    InvalidData { table: String, message: String },

    /// The store was closed; no further writes are accepted.
    #[error("Store is closed")]
    Closed,

    /// Internal error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates an InvalidData error.
    pub fn invalid_data(table: impl Into<String>, message: impl Into<String>) -> Self {
        DbError::InvalidData {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Maps the error onto the shared failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::NotFound { .. } => ErrorKind::NotFound,
            DbError::Domain(err) => err.kind(),
            _ => ErrorKind::StorageFailure,
        }
    }

    /// Returns true for PostgreSQL "function does not exist".
    pub(crate) fn is_undefined_function(err: &sqlx::Error) -> bool {
        matches!(
            err,
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNDEFINED_FUNCTION)
        )
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → QueryFailed (CHECK violations name the constraint)
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::Closed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                if db_err.code().as_deref() == Some(CHECK_VIOLATION) {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    DbError::QueryFailed(format!("check constraint violated: {constraint}"))
                } else {
                    DbError::QueryFailed(db_err.message().to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::Closed,

            sqlx::Error::Io(io) => DbError::ConnectionFailed(io.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(DbError::not_found("InventoryItem", "x").kind(), ErrorKind::NotFound);
        assert_eq!(
            DbError::from(CoreError::EmptyCart).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(DbError::Closed.kind(), ErrorKind::StorageFailure);
        assert_eq!(
            DbError::from(std::io::Error::other("disk full")).kind(),
            ErrorKind::StorageFailure
        );
    }

    #[test]
    fn test_domain_message_is_transparent() {
        let err = DbError::from(CoreError::EmptyCart);
        assert_eq!(err.to_string(), "Cart is empty");
        assert_eq!(
            DbError::not_found("InventoryItem", "abc").to_string(),
            "InventoryItem not found: abc"
        );
    }

    #[test]
    fn test_sqlx_mapping() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::NotFound { .. }
        ));
    }
}
