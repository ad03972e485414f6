//! # Validation Module
//!
//! Input validation for catalog items and cart lines.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI forms (out of scope)                                      │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Catalog fields (add / update)                                     │
//! │  └── Cart line quantities and prices                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Remote schema CHECK constraints                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use inventorypro_core::validation::{validate_item_name, validate_quantity};
//!
//! validate_item_name("Oat Milk").unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{InventoryItemPatch, NewInventoryItem};
use crate::MAX_NAME_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_label(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_label("name", name)
}

/// Validates an item category. Same rules as the name.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    validate_label("category", category)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale price (must be > 0).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a cost price (must be >= 0).
pub fn validate_cost_price(cost_price: Money) -> ValidationResult<()> {
    if cost_price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "costPrice".to_string(),
        });
    }
    Ok(())
}

fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a stock level (must be >= 0).
pub fn validate_stock_level(stock_level: i64) -> ValidationResult<()> {
    validate_non_negative("stockLevel", stock_level)
}

/// Validates a low-stock threshold (must be >= 0).
pub fn validate_low_stock_threshold(threshold: i64) -> ValidationResult<()> {
    validate_non_negative("lowStockThreshold", threshold)
}

/// Validates a cart line quantity (must be > 0).
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates every field of a new catalog item.
pub fn validate_new_item(item: &NewInventoryItem) -> ValidationResult<()> {
    validate_item_name(&item.name)?;
    validate_category(&item.category)?;
    validate_price(item.price)?;
    validate_cost_price(item.cost_price)?;
    validate_stock_level(item.stock_level)?;
    validate_low_stock_threshold(item.low_stock_threshold)?;
    Ok(())
}

/// Validates the fields present in a patch.
pub fn validate_patch(patch: &InventoryItemPatch) -> ValidationResult<()> {
    if let Some(name) = &patch.name {
        validate_item_name(name)?;
    }
    if let Some(category) = &patch.category {
        validate_category(category)?;
    }
    if let Some(price) = patch.price {
        validate_price(price)?;
    }
    if let Some(cost_price) = patch.cost_price {
        validate_cost_price(cost_price)?;
    }
    if let Some(stock_level) = patch.stock_level {
        validate_stock_level(stock_level)?;
    }
    if let Some(threshold) = patch.low_stock_threshold {
        validate_low_stock_threshold(threshold)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
