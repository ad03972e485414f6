//! # Sale Repository
//!
//! The sale transaction boundary and the sales history.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. PROCESS                                                            │
//! │     └── process(cart) → SaleReceipt { sale, updatedInventory }         │
//! │         ├── file:   StoreState::record_sale under the state mutex,     │
//! │         │           persisted through the write serializer             │
//! │         └── remote: process_sale() procedure or row-locked transaction │
//! │                                                                         │
//! │  2. HISTORY                                                            │
//! │     └── list() → newest first                                          │
//! │                                                                         │
//! │  3. RESET                                                              │
//! │     └── clear() → removes all sales, receipt counter keeps counting    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use inventorypro_core::{Sale, SaleItem, SaleReceipt};
use tracing::{debug, info, warn};

use crate::error::DbResult;
use crate::store::Backend;

/// Repository for sales.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    backend: Arc<Backend>,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(backend: Arc<Backend>) -> Self {
        SaleRepository { backend }
    }

    /// All sales, most recent first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        match self.backend.as_ref() {
            Backend::File(store) => store.read(|state| state.sales.clone()).await,
            Backend::Remote(store) => store.list_sales().await,
        }
    }

    /// Validates the cart against live stock and records the sale atomically.
    ///
    /// On any error nothing is stored: no stock is decremented and no
    /// receipt number is consumed.
    pub async fn process(&self, cart: &[SaleItem]) -> DbResult<SaleReceipt> {
        debug!(lines = cart.len(), "Processing sale");

        let result = match self.backend.as_ref() {
            Backend::File(store) => {
                store
                    .mutate(|state| {
                        let sale = state.record_sale(cart, Utc::now())?;
                        Ok(SaleReceipt {
                            sale,
                            updated_inventory: state.inventory.clone(),
                        })
                    })
                    .await
            }
            Backend::Remote(store) => store.process_sale(cart).await,
        };

        match &result {
            Ok(receipt) => info!(
                receipt_number = receipt.sale.receipt_number,
                total = %receipt.sale.total,
                profit = %receipt.sale.profit,
                "Sale recorded"
            ),
            Err(e) => warn!(error = %e, "Sale rejected"),
        }
        result
    }

    /// Removes every sale. Inventory and the receipt counter are untouched.
    pub async fn clear(&self) -> DbResult<usize> {
        let removed = match self.backend.as_ref() {
            Backend::File(store) => store.mutate(|state| Ok(state.clear_sales())).await?,
            Backend::Remote(store) => store.clear_sales().await?,
        };

        info!(removed, "Sales history cleared");
        Ok(removed)
    }
}
