//! # Inventory Commands
//!
//! Catalog listing and maintenance.
//!
//! ```text
//! list_inventory          → newest first
//! add_inventory_item      → validated, id generated, prepended
//! update_inventory_item   → partial patch
//! set_stock_level         → the inline stock editor's update
//! list_low_stock          → items at or below their threshold, lowest first
//! delete_inventory_item   → removes the item and every sale that sold it
//! ```

use tracing::{debug, info};

use crate::error::ApiError;
use inventorypro_core::{CascadeDelete, InventoryItem, InventoryItemPatch, NewInventoryItem};
use inventorypro_db::Database;

/// Lists the whole catalog, most recently added first.
pub async fn list_inventory(db: &Database) -> Result<Vec<InventoryItem>, ApiError> {
    let items = db.inventory().list().await?;
    debug!(count = items.len(), "Listed inventory");
    Ok(items)
}

/// Adds a catalog item.
///
/// ## Validation
/// Name and category are required. Price must be positive; cost price,
/// stock level and low-stock threshold must not be negative.
pub async fn add_inventory_item(
    db: &Database,
    input: NewInventoryItem,
) -> Result<InventoryItem, ApiError> {
    let item = db.inventory().add(input).await?;
    info!(id = %item.id, name = %item.name, "Added inventory item");
    Ok(item)
}

/// Applies a partial update to an item.
pub async fn update_inventory_item(
    db: &Database,
    id: &str,
    patch: InventoryItemPatch,
) -> Result<InventoryItem, ApiError> {
    if patch.is_empty() {
        return Err(ApiError::validation("No fields to update"));
    }

    db.inventory()
        .update(id, &patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Item", id))
}

/// Sets an item's stock level.
pub async fn set_stock_level(
    db: &Database,
    id: &str,
    stock_level: i64,
) -> Result<InventoryItem, ApiError> {
    db.inventory()
        .set_stock(id, stock_level)
        .await?
        .ok_or_else(|| ApiError::not_found("Item", id))
}

pub async fn list_low_stock(db: &Database) -> Result<Vec<InventoryItem>, ApiError> {
    Ok(db.inventory().low_stock().await?)
}

/// Deletes an item and cascades to the sales that reference it.
pub async fn delete_inventory_item(db: &Database, id: &str) -> Result<CascadeDelete, ApiError> {
    let deleted = db.inventory().delete(id).await?;
    info!(
        id = %id,
        removed_sales = deleted.removed_sales,
        "Deleted inventory item"
    );
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use inventorypro_core::Money;

    fn coffee(name: &str) -> NewInventoryItem {
        NewInventoryItem {
            name: name.into(),
            category: "Coffee".into(),
            price: Money::from_cents(450),
            cost_price: Money::from_cents(120),
            stock_level: 10,
            low_stock_threshold: 3,
            last_sold_date: None,
        }
    }

    #[tokio::test]
    async fn test_add_then_list_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::file(dir.path().join("store.json"));

        add_inventory_item(&db, coffee("Espresso")).await.unwrap();
        add_inventory_item(&db, coffee("Latte")).await.unwrap();

        let names: Vec<_> = list_inventory(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(names, vec!["Latte", "Espresso"]);
    }

    #[tokio::test]
    async fn test_add_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::file(dir.path().join("store.json"));

        let mut input = coffee("  ");
        input.price = Money::zero();
        let err = add_inventory_item(&db, input).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(list_inventory(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_and_empty_patch() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::file(dir.path().join("store.json"));
        let item = add_inventory_item(&db, coffee("Mocha")).await.unwrap();

        let err = update_inventory_item(&db, "ghost", InventoryItemPatch::stock_level(1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = update_inventory_item(&db, &item.id, InventoryItemPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let updated = set_stock_level(&db, &item.id, 0).await.unwrap();
        assert_eq!(updated.stock_level, 0);
        assert_eq!(list_low_stock(&db).await.unwrap()[0].id, item.id);

        let err = set_stock_level(&db, &item.id, -1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::file(dir.path().join("store.json"));

        let err = delete_inventory_item(&db, "ghost").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
