//! # Database Handle
//!
//! The store object the app constructs once at startup and injects
//! everywhere.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Database                                      │
//! │                                                                         │
//! │  StoreConfig::from_env()                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::open(config).await                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<Backend> ──┬── Backend::File(FileStore)     lazy JSON document    │
//! │                 └── Backend::Remote(RemoteStore) PostgreSQL pool       │
//! │       │                                                                 │
//! │       ├── db.inventory() → InventoryRepository                          │
//! │       ├── db.sales()     → SaleRepository                               │
//! │       └── db.close()     → flush writes / close pool                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backend selection is a closed set, so dispatch is a plain `match` on
//! [`Backend`] rather than a trait object.

use std::path::PathBuf;
use std::sync::Arc;

use inventorypro_core::StoreState;
use tracing::info;

use crate::config::StoreConfig;
use crate::error::DbResult;
use crate::file::FileStore;
use crate::remote::RemoteStore;
use crate::repository::inventory::InventoryRepository;
use crate::repository::sale::SaleRepository;

/// The storage backend selected at startup.
#[derive(Debug)]
pub enum Backend {
    File(FileStore),
    Remote(RemoteStore),
}

/// Main store handle providing repository access.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::open(StoreConfig::from_env()?).await?;
/// let items = db.inventory().list().await?;
/// let receipt = db.sales().process(&cart).await?;
/// db.close().await;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    backend: Arc<Backend>,
}

impl Database {
    /// Opens the configured backend.
    ///
    /// The file backend does no I/O here; the document is loaded on first
    /// use. The remote backend connects (and migrates) immediately.
    pub async fn open(config: StoreConfig) -> DbResult<Self> {
        info!(backend = config.backend_name(), "Opening store");

        let backend = match config {
            StoreConfig::File { path } => Backend::File(FileStore::new(path)),
            StoreConfig::Remote(remote) => Backend::Remote(RemoteStore::connect(&remote).await?),
        };

        Ok(Database {
            backend: Arc::new(backend),
        })
    }

    /// File-backed store at `path` (tests and tools).
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Database {
            backend: Arc::new(Backend::File(FileStore::new(path))),
        }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Returns the inventory repository.
    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.backend.clone())
    }

    /// Returns the sale repository.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.backend.clone())
    }

    /// Consistent copy of inventory, sales and the receipt counter.
    pub async fn snapshot(&self) -> DbResult<StoreState> {
        match self.backend.as_ref() {
            Backend::File(store) => store.snapshot().await,
            Backend::Remote(store) => store.snapshot().await,
        }
    }

    /// Checks if the store is usable.
    pub async fn health_check(&self) -> bool {
        match self.backend.as_ref() {
            Backend::File(store) => store.snapshot().await.is_ok(),
            Backend::Remote(store) => store.health_check().await,
        }
    }

    /// Flushes pending writes (file) or closes the pool (remote).
    ///
    /// ## When To Call
    /// - On application shutdown, before the runtime stops
    pub async fn close(&self) {
        match self.backend.as_ref() {
            Backend::File(store) => store.close().await,
            Backend::Remote(store) => store.close().await,
        }
        info!("Store closed");
    }
}
