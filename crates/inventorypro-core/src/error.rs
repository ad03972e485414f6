//! # Error Types
//!
//! Domain-specific error types for inventorypro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  inventorypro-core errors (this file)                                  │
//! │  ├── CoreError        - Business rule violations (cart, stock)         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  inventorypro-db errors (separate crate)                               │
//! │  └── DbError          - Storage failures, wraps CoreError              │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── ApiError         - What callers see ({code, message})             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Caller       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error maps onto one of four [`ErrorKind`]s: `NotFound`,
//! `InvalidInput`, `InsufficientStock` and `StorageFailure`. Core errors never
//! produce `StorageFailure`; that kind belongs to the persistence layer.

use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse failure category shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An id has no matching record.
    NotFound,
    /// Non-positive quantity/price/stock, empty cart, bad field values.
    InvalidInput,
    /// Cart quantity exceeds live stock.
    InsufficientStock,
    /// I/O or remote-call failure.
    StorageFailure,
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These are returned as explicit failures from the transaction boundary.
/// Whenever one of them is returned, no state has been modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A cart line references an item that is not in the catalog.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// A cart line asks for zero or a negative quantity.
    #[error("Quantity must be positive for item {item_id}, got {quantity}")]
    InvalidQuantity { item_id: String, quantity: i64 },

    /// Not enough stock to complete the sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: [{ A, qty: 6 }]
    ///      │
    ///      ▼
    /// Check stock: A.stockLevel = 5
    ///      │
    ///      ▼
    /// InsufficientStock { name: "A", available: 5, requested: 6 }
    ///      │
    ///      ▼
    /// Caller shows: "Not enough stock for A"
    /// ```
    #[error("Not enough stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        item_id: String,
        name: String,
        available: i64,
        requested: i64,
    },

    /// The submitted cart has no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the failure category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ItemNotFound(_) => ErrorKind::NotFound,
            CoreError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            CoreError::InvalidQuantity { .. } | CoreError::EmptyCart | CoreError::Validation(_) => {
                ErrorKind::InvalidInput
            }
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value does not fit in the integer range used for storage.
    #[error("{field} is out of range")]
    OutOfRange { field: String },
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
        let err = CoreError::InsufficientStock {
            item_id: "a".to_string(),
            name: "Oat Milk".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Not enough stock for Oat Milk: available 3, requested 5"
        );
        assert_eq!(CoreError::EmptyCart.to_string(), "Cart is empty");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustNotBeNegative {
            field: "costPrice".to_string(),
        };
        assert_eq!(err.to_string(), "costPrice must not be negative");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(CoreError::ItemNotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(CoreError::EmptyCart.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            CoreError::InvalidQuantity {
                item_id: "x".into(),
                quantity: 0
            }
            .kind(),
            ErrorKind::InvalidInput
        );
        let validation: CoreError = ValidationError::MustBePositive {
            field: "price".into(),
        }
        .into();
        assert_eq!(validation.kind(), ErrorKind::InvalidInput);
    }
}
