//! # inventorypro-db: Persistence Layer for InventoryPro
//!
//! Loads and saves the store state through a local JSON document or a remote
//! PostgreSQL database, behind one set of repositories.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      InventoryPro Data Flow                             │
//! │                                                                         │
//! │  Command (process_sale)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  inventorypro-db (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │   Backends   │  │   │
//! │  │   │  (store.rs)   │───►│ Inventory     │───►│ FileStore    │  │   │
//! │  │   │               │    │ Sale          │    │ RemoteStore  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────┬───────┘  │   │
//! │  └───────────────────────────────────────────────────┼───────────┘   │
//! │                                                       │               │
//! │              ┌────────────────────────────────────────┴──────┐        │
//! │              ▼                                               ▼        │
//! │   data/inventorypro-db.json                      PostgreSQL tables    │
//! │   (WriteSerializer, atomic rename)               (migrations/postgres)│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Backend selection from the environment
//! - [`store`] - The `Database` handle and backend dispatch
//! - [`file`] - JSON document store with lazy load and self-healing
//! - [`writer`] - Single-writer actor for durable, ordered file writes
//! - [`remote`] - PostgreSQL store and transactional checkout
//! - [`migrations`] - Embedded PostgreSQL migrations
//! - [`repository`] - Inventory and sale repositories
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inventorypro_db::{Database, StoreConfig};
//!
//! let db = Database::open(StoreConfig::from_env()?).await?;
//! let receipt = db.sales().process(&cart).await?;
//! db.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod file;
pub mod migrations;
pub mod remote;
pub mod repository;
pub mod store;
pub mod writer;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, RemoteConfig, StoreConfig};
pub use error::{DbError, DbResult};
pub use store::{Backend, Database};

// Repository re-exports for convenience
pub use repository::inventory::InventoryRepository;
pub use repository::sale::SaleRepository;
