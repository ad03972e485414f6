//! # Repository Module
//!
//! Backend-independent operations on the store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command layer                                                         │
//! │       │                                                                 │
//! │       │  db.sales().process(&cart)                                      │
//! │       ▼                                                                 │
//! │  SaleRepository ──── match Backend ────┬── FileStore::mutate(..)        │
//! │                                        └── RemoteStore::process_sale(..)│
//! │                                                                         │
//! │  Both paths apply the same domain rules (inventorypro-core) and return │
//! │  the same types and errors.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InventoryRepository`](inventory::InventoryRepository) - Catalog CRUD with cascading delete
//! - [`SaleRepository`](sale::SaleRepository) - Sale processing, history and reset

pub mod inventory;
pub mod sale;
