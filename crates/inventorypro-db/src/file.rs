//! # JSON File Store
//!
//! The local backend: one JSON document holding the whole [`StoreState`].
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FileStore::new(path)          nothing touches the disk yet            │
//! │       │                                                                 │
//! │       ▼  first operation (OnceCell, runs exactly once)                  │
//! │  read <path>                                                            │
//! │   ├── ok + parses   → normalize nextSaleNumber                          │
//! │   ├── missing       → empty state, written immediately                  │
//! │   └── malformed     → warn!, empty state, written immediately           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Mutex<StoreState> + WriteSerializer                                    │
//! │       │                                                                 │
//! │       ▼  every mutation                                                 │
//! │  lock ─► clone ─► apply ─► (error? drop clone) ─► write ─► swap ─► unlock│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The mutex is held from the read of the snapshot until the write is
//! durable, so validation, apply and persist form one serialized unit. Two
//! overlapping sales can never both pass the stock check against the same
//! snapshot.

use std::io::ErrorKind as IoErrorKind;
use std::path::PathBuf;

use inventorypro_core::StoreState;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::writer::{WriteSerializer, WriteSerializerHandle};

struct Loaded {
    state: Mutex<StoreState>,
    writer: WriteSerializerHandle,
}

/// File-backed store with lazy loading and serialized writes.
pub struct FileStore {
    path: PathBuf,
    loaded: OnceCell<Loaded>,
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("loaded", &self.loaded.initialized())
            .finish()
    }
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore {
            path: path.into(),
            loaded: OnceCell::new(),
        }
    }

    /// Loads the document on first use. Concurrent first calls share one load.
    async fn loaded(&self) -> DbResult<&Loaded> {
        self.loaded.get_or_try_init(|| self.load()).await
    }

    async fn load(&self) -> DbResult<Loaded> {
        let writer = WriteSerializer::spawn(&self.path);

        let (state, persist) = match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice::<StoreState>(&bytes) {
                Ok(mut state) => {
                    let changed = state.normalize();
                    if changed {
                        debug!(
                            next_sale_number = state.next_sale_number,
                            "Normalized receipt counter"
                        );
                    }
                    (state, changed)
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        path = %self.path.display(),
                        "Store document is malformed, reinitializing"
                    );
                    (StoreState::default(), true)
                }
            },
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                info!(path = %self.path.display(), "No store document, creating one");
                (StoreState::default(), true)
            }
            Err(e) => return Err(DbError::Io(e)),
        };

        if persist {
            writer.enqueue(encode(&state)?).await?;
        }

        info!(
            items = state.inventory.len(),
            sales = state.sales.len(),
            next_sale_number = state.next_sale_number,
            "Store loaded"
        );

        Ok(Loaded {
            state: Mutex::new(state),
            writer,
        })
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> DbResult<StoreState> {
        let loaded = self.loaded().await?;
        let state = loaded.state.lock().await;
        Ok(state.clone())
    }

    /// Reads the current state without copying it.
    pub async fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> DbResult<T> {
        let loaded = self.loaded().await?;
        let state = loaded.state.lock().await;
        Ok(f(&state))
    }

    /// Runs `f` against a working copy and commits it only if `f` succeeds
    /// and the write is durable.
    ///
    /// When `f` leaves the state unchanged nothing is written.
    pub async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut StoreState) -> DbResult<T>,
    ) -> DbResult<T> {
        let loaded = self.loaded().await?;
        let mut state = loaded.state.lock().await;

        let mut working = state.clone();
        let value = f(&mut working)?;

        if working != *state {
            loaded.writer.enqueue(encode(&working)?).await?;
            *state = working;
        }

        Ok(value)
    }

    /// Flushes queued writes and stops the writer. Reads keep working;
    /// later mutations fail with [`DbError::Closed`].
    pub async fn close(&self) {
        if let Some(loaded) = self.loaded.get() {
            // Taking the lock waits for an in-flight mutation to finish.
            let _state = loaded.state.lock().await;
            loaded.writer.close().await;
        }
    }
}

fn encode(state: &StoreState) -> DbResult<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(state)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use inventorypro_core::{Money, NewInventoryItem, SaleItem};

    fn new_item(name: &str, stock: i64) -> NewInventoryItem {
        NewInventoryItem {
            name: name.into(),
            category: "Pantry".into(),
            price: Money::from_cents(1000),
            cost_price: Money::from_cents(200),
            stock_level: stock,
            low_stock_threshold: 1,
            last_sold_date: None,
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_created_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("store.json");
        let store = FileStore::new(&path);
        assert!(!path.exists());

        let state = store.snapshot().await.unwrap();
        assert_eq!(state, StoreState::default());

        let on_disk: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk["nextSaleNumber"], 1);
        assert_eq!(on_disk["inventory"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_malformed_file_self_heals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.snapshot().await.unwrap(), StoreState::default());

        let healed: StoreState = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(healed, StoreState::default());
    }

    #[tokio::test]
    async fn test_round_trip_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::new(&path);
        store
            .mutate(|state| {
                let a = state.add_item(new_item("A", 5))?;
                state.add_item(new_item("B", 3))?;
                state.record_sale(&[SaleItem::new(&a.id, 2, a.price)], Utc::now())?;
                Ok(())
            })
            .await
            .unwrap();
        let before = store.snapshot().await.unwrap();
        store.close().await;

        let reopened = FileStore::new(&path);
        let after = reopened.snapshot().await.unwrap();
        assert_eq!(after, before);
        assert_eq!(after.next_sale_number, 2);
    }

    #[tokio::test]
    async fn test_counter_normalized_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(
            &path,
            r#"{"inventory": [], "sales": [{"id": "s", "receiptNumber": 41,
                "items": [], "total": 0, "profit": 0, "date": "2024-01-01T00:00:00Z"}]}"#,
        )
        .unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.snapshot().await.unwrap().next_sale_number, 42);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_file_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = FileStore::new(&path);

        let item = store
            .mutate(|state| Ok(state.add_item(new_item("A", 5))?))
            .await
            .unwrap();
        let before_bytes = std::fs::read(&path).unwrap();
        let before_state = store.snapshot().await.unwrap();

        let err = store
            .mutate(|state| {
                Ok(state.record_sale(&[SaleItem::new(&item.id, 6, item.price)], Utc::now())?)
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Domain(_)));
        assert_eq!(std::fs::read(&path).unwrap(), before_bytes);
        assert_eq!(store.snapshot().await.unwrap(), before_state);
    }

    #[tokio::test]
    async fn test_mutation_after_close_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("store.json"));
        store.snapshot().await.unwrap();
        store.close().await;

        let err = store
            .mutate(|state| Ok(state.add_item(new_item("Late", 1))?))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Closed));
        assert!(store.snapshot().await.unwrap().inventory.is_empty());
    }
}
