//! # Inventory Repository
//!
//! Catalog operations for both backends.
//!
//! ## Delete Policy
//! Deleting an id that does not exist is `DbError::NotFound` on both
//! backends. A successful delete also removes every sale that references the
//! item, in the same write (file) or transaction (remote).

use std::sync::Arc;

use inventorypro_core::state::low_stock_items;
use inventorypro_core::{CascadeDelete, InventoryItem, InventoryItemPatch, NewInventoryItem};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::store::Backend;

/// Repository for inventory items.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    backend: Arc<Backend>,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(backend: Arc<Backend>) -> Self {
        InventoryRepository { backend }
    }

    /// All items, most recently created first.
    pub async fn list(&self) -> DbResult<Vec<InventoryItem>> {
        match self.backend.as_ref() {
            Backend::File(store) => store.read(|state| state.inventory.clone()).await,
            Backend::Remote(store) => store.list_inventory().await,
        }
    }

    /// Gets an item by ID.
    pub async fn get(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        match self.backend.as_ref() {
            Backend::File(store) => store.read(|state| state.find_item(id).cloned()).await,
            Backend::Remote(store) => store.get_item(id).await,
        }
    }

    /// Validates and inserts a new item with a generated id.
    pub async fn add(&self, input: NewInventoryItem) -> DbResult<InventoryItem> {
        let item = match self.backend.as_ref() {
            Backend::File(store) => store.mutate(|state| Ok(state.add_item(input)?)).await?,
            Backend::Remote(store) => store.insert_item(input).await?,
        };

        info!(id = %item.id, name = %item.name, "Inventory item added");
        Ok(item)
    }

    /// Merges `patch` into an item. `Ok(None)` when the id does not exist.
    pub async fn update(
        &self,
        id: &str,
        patch: &InventoryItemPatch,
    ) -> DbResult<Option<InventoryItem>> {
        let updated = match self.backend.as_ref() {
            Backend::File(store) => store.mutate(|state| Ok(state.update_item(id, patch)?)).await?,
            Backend::Remote(store) => store.update_item(id, patch).await?,
        };

        match &updated {
            Some(item) => debug!(id = %item.id, stock_level = item.stock_level, "Inventory item updated"),
            None => debug!(id, "Update for unknown inventory item"),
        }
        Ok(updated)
    }

    /// Sets the stock level of an item.
    pub async fn set_stock(&self, id: &str, stock_level: i64) -> DbResult<Option<InventoryItem>> {
        self.update(id, &InventoryItemPatch::stock_level(stock_level)).await
    }

    /// Removes an item and every sale that references it.
    pub async fn delete(&self, id: &str) -> DbResult<CascadeDelete> {
        let removed = match self.backend.as_ref() {
            Backend::File(store) => {
                store
                    .mutate(|state| {
                        state
                            .delete_item(id)
                            .ok_or_else(|| DbError::not_found("InventoryItem", id))
                    })
                    .await?
            }
            Backend::Remote(store) => store.delete_item(id).await?,
        };

        info!(
            id,
            removed_sales = removed.removed_sales,
            "Inventory item deleted"
        );
        Ok(removed)
    }

    /// Items at or below their low-stock threshold, lowest stock first.
    pub async fn low_stock(&self) -> DbResult<Vec<InventoryItem>> {
        match self.backend.as_ref() {
            Backend::File(store) => store.read(|state| state.low_stock()).await,
            Backend::Remote(store) => Ok(low_stock_items(&store.list_inventory().await?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbError};
    use inventorypro_core::{ErrorKind, InventoryItemPatch, Money, NewInventoryItem, SaleItem};

    fn new_item(name: &str, stock: i64) -> NewInventoryItem {
        NewInventoryItem {
            name: name.into(),
            category: "Hardware".into(),
            price: Money::from_cents(1000),
            cost_price: Money::from_cents(200),
            stock_level: stock,
            low_stock_threshold: 3,
            last_sold_date: None,
        }
    }

    #[tokio::test]
    async fn test_add_list_get() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::file(dir.path().join("store.json"));
        let repo = db.inventory();

        let first = repo.add(new_item("Hammer", 4)).await.unwrap();
        let second = repo.add(new_item("Nails", 100)).await.unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);
        assert_eq!(repo.get(&first.id).await.unwrap(), Some(first));
        assert_eq!(repo.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_add_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::file(dir.path().join("store.json"));

        let mut input = new_item("Saw", 1);
        input.name = "  ".into();
        let err = db.inventory().add(input).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(db.inventory().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_set_stock() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::file(dir.path().join("store.json"));
        let repo = db.inventory();
        let item = repo.add(new_item("Hammer", 4)).await.unwrap();

        let updated = repo.set_stock(&item.id, 12).await.unwrap().unwrap();
        assert_eq!(updated.stock_level, 12);

        let patch = InventoryItemPatch {
            price: Some(Money::from_cents(1250)),
            ..Default::default()
        };
        let updated = repo.update(&item.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.price.cents(), 1250);
        assert_eq!(updated.stock_level, 12);

        assert_eq!(repo.set_stock("missing", 1).await.unwrap(), None);
        assert_eq!(
            repo.set_stock(&item.id, -5).await.unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[tokio::test]
    async fn test_delete_cascades_to_sales() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::file(dir.path().join("store.json"));
        let repo = db.inventory();
        let hammer = repo.add(new_item("Hammer", 10)).await.unwrap();
        let nails = repo.add(new_item("Nails", 10)).await.unwrap();

        let sales = db.sales();
        sales
            .process(&[SaleItem::new(&hammer.id, 1, hammer.price)])
            .await
            .unwrap();
        let kept = sales
            .process(&[SaleItem::new(&nails.id, 2, nails.price)])
            .await
            .unwrap()
            .sale;
        sales
            .process(&[
                SaleItem::new(&nails.id, 1, nails.price),
                SaleItem::new(&hammer.id, 1, hammer.price),
            ])
            .await
            .unwrap();

        let removed = repo.delete(&hammer.id).await.unwrap();
        assert_eq!(removed.removed_sales, 2);
        assert_eq!(sales.list().await.unwrap(), vec![kept]);

        let err = repo.delete(&hammer.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_low_stock() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::file(dir.path().join("store.json"));
        let repo = db.inventory();
        repo.add(new_item("Three", 3)).await.unwrap();
        repo.add(new_item("Plenty", 30)).await.unwrap();
        repo.add(new_item("One", 1)).await.unwrap();

        let names: Vec<String> = repo.low_stock().await.unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["One", "Three"]);
    }
}
