//! # Sale Commands
//!
//! Checkout, sales history and the sales reset.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout                                        │
//! │                                                                         │
//! │  POS cart  [{ itemId, quantity, price }, ...]                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  process_sale(db, cart)                                                 │
//! │       │                                                                 │
//! │       ├── rejected → ApiError (NOT_FOUND / VALIDATION_ERROR /           │
//! │       │                         INSUFFICIENT_STOCK), nothing stored     │
//! │       │                                                                 │
//! │       └── accepted → SaleReceipt { sale, updatedInventory }             │
//! │                      stock decremented, receipt number consumed         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use tracing::info;

use crate::error::ApiError;
use inventorypro_core::{Sale, SaleItem, SaleReceipt};
use inventorypro_db::Database;

/// Processes a cart as one atomic sale.
pub async fn process_sale(db: &Database, cart: Vec<SaleItem>) -> Result<SaleReceipt, ApiError> {
    let start = Instant::now();
    let receipt = db.sales().process(&cart).await?;

    info!(
        receipt_number = receipt.sale.receipt_number,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Checkout complete"
    );
    Ok(receipt)
}

/// Sales history, most recent first.
pub async fn list_sales(db: &Database) -> Result<Vec<Sale>, ApiError> {
    Ok(db.sales().list().await?)
}

/// Removes all sales. Returns how many were removed.
pub async fn clear_sales(db: &Database) -> Result<usize, ApiError> {
    Ok(db.sales().clear().await?)
}
