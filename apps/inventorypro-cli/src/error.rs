//! # API Error Type
//!
//! Unified error type for the operation boundary.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in InventoryPro                           │
//! │                                                                         │
//! │  Command Function  Result<T, ApiError>                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Domain rejection? ── CoreError::InsufficientStock ──┐                  │
//! │         │                                            │                  │
//! │         ▼                                            ▼                  │
//! │  Storage failure?  ── DbError::Io(..) ── logged ── ApiError ──► caller  │
//! │         │                                 (generic message)             │
//! │         ▼                                                               │
//! │  Success ─────────────────────────────────────────────────────► caller  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Domain messages are safe to show to a cashier ("Not enough stock for
//! Oat Milk: ..."). Storage details are logged and replaced by a generic
//! message.

use inventorypro_core::{CoreError, ErrorKind};
use inventorypro_db::DbError;
use serde::Serialize;

/// Error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Not enough stock for Oat Milk: available 3, requested 5"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Item not found
    NotFound,

    /// Input validation failed (bad fields, empty cart, zero quantity)
    ValidationError,

    /// Cart quantity exceeds live stock
    InsufficientStock,

    /// Reading or writing the store failed
    StorageError,

    /// Internal error
    Internal,
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::InvalidInput => ErrorCode::ValidationError,
            ErrorKind::InsufficientStock => ErrorCode::InsufficientStock,
            ErrorKind::StorageFailure => ErrorCode::StorageError,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Returns true for storage and internal failures, as opposed to
    /// rejections of the request itself.
    pub fn is_failure(&self) -> bool {
        matches!(self.code, ErrorCode::StorageError | ErrorCode::Internal)
    }
}

/// Converts store errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::Domain(e) => e.into(),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Remote store connection failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Store connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Store migration failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::StorageError, "Store connection pool exhausted")
            }
            DbError::Closed => ApiError::new(ErrorCode::StorageError, "Store is closed"),
            DbError::Internal(e) => {
                tracing::error!("Internal store error: {}", e);
                ApiError::internal("Store operation failed")
            }
            other => {
                // Log the actual error but return a generic message
                tracing::error!(error = %other, "Store operation failed");
                ApiError::new(ErrorCode::StorageError, "Store operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = ErrorCode::from(err.kind());
        match err {
            CoreError::ItemNotFound(id) => ApiError::not_found("Item", &id),
            CoreError::InsufficientStock { name, .. } => {
                ApiError::new(code, format!("Not enough stock for {}", name))
            }
            other => ApiError::new(code, other.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use inventorypro_core::ValidationError;

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::InsufficientStock {
            item_id: "a".into(),
            name: "Oat Milk".into(),
            available: 3,
            requested: 5,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, "Not enough stock for Oat Milk");

        let err: ApiError = CoreError::ItemNotFound("zz".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Item not found: zz");

        let err: ApiError = CoreError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err: ApiError = CoreError::from(ValidationError::MustBePositive {
            field: "price".into(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!err.is_failure());
    }

    #[test]
    fn test_storage_errors_are_generic() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "/secret/path");
        let err: ApiError = DbError::from(io).into();

        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(!err.message.contains("/secret/path"));
        assert!(err.is_failure());
    }

    #[test]
    fn test_domain_errors_pass_through_db() {
        let err: ApiError = DbError::from(CoreError::EmptyCart).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Cart is empty");

        let err: ApiError = DbError::not_found("InventoryItem", "x").into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_serializes_screaming_code() {
        let json = serde_json::to_value(ApiError::validation("bad")).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "bad");
    }
}
