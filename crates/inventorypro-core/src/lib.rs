//! # inventorypro-core: Pure Business Logic for InventoryPro
//!
//! This crate is the **heart** of InventoryPro. It contains the catalog,
//! checkout and analytics rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      InventoryPro Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Operation boundary (apps/inventorypro-cli)         │   │
//! │  │   list_inventory, process_sale, clear_sales, sales_report ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               inventorypro-db (persistence)                     │   │
//! │  │        JSON file store + write serializer │ PostgreSQL          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ inventorypro-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  money  │ │  state  │ │  sale   │ │ report  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (InventoryItem, SaleItem, Sale, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation for catalog input and cart lines
//! - [`state`] - The store document and its mutations (add, update, cascade delete, clear)
//! - [`sale`] - Sale transaction planning (validate, apply, totals)
//! - [`report`] - Dashboard and sales report aggregates
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use inventorypro_core::{Money, NewInventoryItem, SaleItem, StoreState};
//!
//! let mut state = StoreState::default();
//! let item = state
//!     .add_item(
//!         NewInventoryItem {
//!             name: "Espresso Beans".into(),
//!             category: "Coffee".into(),
//!             price: Money::from_cents(1000),
//!             cost_price: Money::from_cents(200),
//!             stock_level: 5,
//!             low_stock_threshold: 1,
//!             last_sold_date: None,
//!         },
//!     )
//!     .unwrap();
//!
//! let cart = vec![SaleItem::new(&item.id, 3, Money::from_cents(1000))];
//! let sale = state.record_sale(&cart, Utc::now()).unwrap();
//!
//! assert_eq!(sale.total.cents(), 3000);
//! assert_eq!(sale.profit.cents(), 2400);
//! assert_eq!(state.inventory[0].stock_level, 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod report;
pub mod sale;
pub mod state;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use report::{DashboardSummary, SalesReport, TopProduct};
pub use sale::{plan_sale, SalePlan};
pub use state::{CascadeDelete, StoreState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Receipt number assigned to the first sale of a fresh store.
pub const FIRST_RECEIPT_NUMBER: i64 = 1;

/// Number of products listed in the "top products" section of a sales report.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Number of items listed in the low-stock section of a sales report.
pub const REPORT_LOW_STOCK_LIMIT: usize = 5;

/// Maximum length of an item name or category.
pub const MAX_NAME_LENGTH: usize = 200;

/// Generates a new entity identifier (UUID v4).
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
