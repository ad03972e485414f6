//! # Commands Module
//!
//! The operation boundary: every operation a front end can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── inventory.rs  ◄─── Catalog listing and CRUD
//! ├── sale.rs       ◄─── Checkout, sales history, reset
//! └── report.rs     ◄─── Dashboard and sales report
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Command Flow                                      │
//! │                                                                         │
//! │  caller (cli.rs, actions.rs)                                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn process_sale(                                                 │
//! │      db: &Database,            ◄── constructed once at startup          │
//! │      cart: Vec<SaleItem>,      ◄── request payload                      │
//! │  ) -> Result<SaleReceipt, ApiError>                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  JSON-serializable result or { code, message }                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod inventory;
pub mod report;
pub mod sale;

pub use inventory::*;
pub use report::*;
pub use sale::*;
