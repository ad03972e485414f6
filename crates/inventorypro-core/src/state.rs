//! # Store State
//!
//! The aggregate document every backend loads and saves:
//!
//! ```text
//! { "inventory": [...], "sales": [...], "nextSaleNumber": 12 }
//! ```
//!
//! All mutations here are pure and in-memory. Each one either succeeds
//! completely or returns an error with `self` untouched; persisting the result
//! is the storage layer's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::sale::plan_sale;
use crate::types::{InventoryItem, InventoryItemPatch, NewInventoryItem, Sale, SaleItem};
use crate::validation::{validate_new_item, validate_patch};
use crate::{generate_id, FIRST_RECEIPT_NUMBER};

/// Inventory, sales history and the receipt counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    /// Most-recently-created first.
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    /// Most-recent sale first.
    #[serde(default)]
    pub sales: Vec<Sale>,
    /// Receipt number for the next sale; always above every stored receipt.
    #[serde(default)]
    pub next_sale_number: i64,
}

impl Default for StoreState {
    fn default() -> Self {
        StoreState {
            inventory: Vec::new(),
            sales: Vec::new(),
            next_sale_number: FIRST_RECEIPT_NUMBER,
        }
    }
}

/// What a cascading delete removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeDelete {
    pub item: InventoryItem,
    pub removed_sales: usize,
}

impl StoreState {
    /// Restores the counter invariant after loading a document.
    ///
    /// Returns `true` when the counter had to be changed.
    pub fn normalize(&mut self) -> bool {
        let floor = self
            .sales
            .iter()
            .map(|sale| sale.receipt_number)
            .max()
            .map_or(FIRST_RECEIPT_NUMBER, |max| max + 1);

        if self.next_sale_number < floor {
            self.next_sale_number = floor;
            true
        } else {
            false
        }
    }

    pub fn find_item(&self, id: &str) -> Option<&InventoryItem> {
        self.inventory.iter().find(|item| item.id == id)
    }

    /// Validates and prepends a new catalog item.
    pub fn add_item(&mut self, input: NewInventoryItem) -> CoreResult<InventoryItem> {
        validate_new_item(&input)?;
        let item = input.into_item(generate_id());
        self.inventory.insert(0, item.clone());
        Ok(item)
    }

    /// Merges `patch` into the item with `id`.
    ///
    /// `Ok(None)` means the id does not exist.
    pub fn update_item(
        &mut self,
        id: &str,
        patch: &InventoryItemPatch,
    ) -> CoreResult<Option<InventoryItem>> {
        validate_patch(patch)?;
        match self.inventory.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                patch.apply_to(item);
                Ok(Some(item.clone()))
            }
            None => Ok(None),
        }
    }

    /// Removes an item and every sale that references it.
    pub fn delete_item(&mut self, id: &str) -> Option<CascadeDelete> {
        let position = self.inventory.iter().position(|item| item.id == id)?;
        let item = self.inventory.remove(position);

        let before = self.sales.len();
        self.sales.retain(|sale| !sale.references(id));

        Some(CascadeDelete {
            item,
            removed_sales: before - self.sales.len(),
        })
    }

    /// Drops the whole sales history. The receipt counter is kept.
    pub fn clear_sales(&mut self) -> usize {
        let removed = self.sales.len();
        self.sales.clear();
        removed
    }

    /// Runs a sale against this state and commits it on success.
    pub fn record_sale(&mut self, cart: &[SaleItem], now: DateTime<Utc>) -> CoreResult<Sale> {
        let plan = plan_sale(
            &self.inventory,
            cart,
            self.next_sale_number,
            generate_id(),
            now,
        )?;

        self.inventory = plan.inventory;
        self.sales.insert(0, plan.sale.clone());
        self.next_sale_number += 1;
        Ok(plan.sale)
    }

    /// Items at or below their threshold, lowest stock first.
    pub fn low_stock(&self) -> Vec<InventoryItem> {
        low_stock_items(&self.inventory)
    }
}

/// Items with `stockLevel <= lowStockThreshold`, sorted by ascending stock.
pub fn low_stock_items(inventory: &[InventoryItem]) -> Vec<InventoryItem> {
    let mut items: Vec<InventoryItem> = inventory
        .iter()
        .filter(|item| item.is_low_stock())
        .cloned()
        .collect();
    items.sort_by_key(|item| item.stock_level);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ErrorKind};
    use crate::money::Money;

    fn new_item(name: &str, stock: i64) -> NewInventoryItem {
        NewInventoryItem {
            name: name.into(),
            category: "Coffee".into(),
            price: Money::from_cents(1000),
            cost_price: Money::from_cents(200),
            stock_level: stock,
            low_stock_threshold: 2,
            last_sold_date: None,
        }
    }

    fn line(item: &InventoryItem, qty: i64) -> SaleItem {
        SaleItem::new(&item.id, qty, item.price)
    }

    #[test]
    fn test_default_state() {
        let state = StoreState::default();
        assert!(state.inventory.is_empty());
        assert!(state.sales.is_empty());
        assert_eq!(state.next_sale_number, 1);
    }

    #[test]
    fn test_add_item_prepends_with_fresh_id() {
        let mut state = StoreState::default();
        let first = state.add_item(new_item("First", 1)).unwrap();
        let second = state.add_item(new_item("Second", 1)).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(state.inventory[0].id, second.id);
        assert_eq!(state.inventory[1].id, first.id);
        assert!(second.last_sold_date.is_none());
    }

    #[test]
    fn test_add_item_rejects_invalid_fields() {
        let mut state = StoreState::default();
        let mut input = new_item("Broken", 1);
        input.price = Money::zero();

        let err = state.add_item(input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(state.inventory.is_empty());
    }

    #[test]
    fn test_update_item() {
        let mut state = StoreState::default();
        let item = state.add_item(new_item("Beans", 5)).unwrap();

        let updated = state
            .update_item(&item.id, &InventoryItemPatch::stock_level(40))
            .unwrap()
            .unwrap();
        assert_eq!(updated.stock_level, 40);
        assert_eq!(updated.name, "Beans");

        assert_eq!(
            state
                .update_item("missing", &InventoryItemPatch::stock_level(1))
                .unwrap(),
            None
        );
        assert!(state
            .update_item(&item.id, &InventoryItemPatch::stock_level(-1))
            .is_err());
        assert_eq!(state.inventory[0].stock_level, 40);
    }

    #[test]
    fn test_record_sale_worked_example() {
        let mut state = StoreState::default();
        let a = state.add_item(new_item("A", 5)).unwrap();
        let before = state.next_sale_number;

        let sale = state.record_sale(&[line(&a, 3)], Utc::now()).unwrap();

        assert_eq!(state.inventory[0].stock_level, 2);
        assert_eq!(sale.total.cents(), 3000);
        assert_eq!(sale.profit.cents(), 2400);
        assert_eq!(sale.receipt_number, before);
        assert_eq!(state.next_sale_number, before + 1);
        assert_eq!(state.sales[0], sale);
    }

    #[test]
    fn test_failed_sale_leaves_state_untouched() {
        let mut state = StoreState::default();
        let a = state.add_item(new_item("A", 5)).unwrap();
        let b = state.add_item(new_item("B", 5)).unwrap();
        let snapshot = state.clone();

        let err = state
            .record_sale(&[line(&b, 1), line(&a, 6)], Utc::now())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_receipts_have_no_gaps_after_failures() {
        let mut state = StoreState::default();
        let a = state.add_item(new_item("A", 10)).unwrap();

        let first = state.record_sale(&[line(&a, 1)], Utc::now()).unwrap();
        assert!(state.record_sale(&[line(&a, 50)], Utc::now()).is_err());
        assert!(state.record_sale(&[], Utc::now()).is_err());
        let second = state.record_sale(&[line(&a, 1)], Utc::now()).unwrap();

        assert_eq!(second.receipt_number, first.receipt_number + 1);
    }

    #[test]
    fn test_cascade_delete_removes_only_referencing_sales() {
        let mut state = StoreState::default();
        let a = state.add_item(new_item("A", 10)).unwrap();
        let b = state.add_item(new_item("B", 10)).unwrap();

        state.record_sale(&[line(&a, 1)], Utc::now()).unwrap();
        let only_b = state.record_sale(&[line(&b, 1)], Utc::now()).unwrap();
        state
            .record_sale(&[line(&a, 1), line(&b, 1)], Utc::now())
            .unwrap();

        let removed = state.delete_item(&a.id).unwrap();
        assert_eq!(removed.item.id, a.id);
        assert_eq!(removed.removed_sales, 2);
        assert_eq!(state.sales, vec![only_b]);
        assert!(state.find_item(&a.id).is_none());

        assert!(state.delete_item(&a.id).is_none());
    }

    #[test]
    fn test_clear_sales_keeps_counter() {
        let mut state = StoreState::default();
        let a = state.add_item(new_item("A", 10)).unwrap();
        state.record_sale(&[line(&a, 1)], Utc::now()).unwrap();
        state.record_sale(&[line(&a, 1)], Utc::now()).unwrap();

        assert_eq!(state.clear_sales(), 2);
        assert!(state.sales.is_empty());
        assert_eq!(state.next_sale_number, 3);
        assert_eq!(state.inventory[0].stock_level, 8);

        let next = state.record_sale(&[line(&a, 1)], Utc::now()).unwrap();
        assert_eq!(next.receipt_number, 3);
    }

    #[test]
    fn test_normalize_counter() {
        let json = r#"{
            "inventory": [],
            "sales": [{
                "id": "s1", "receiptNumber": 9,
                "items": [{"itemId": "x", "quantity": 1, "price": 100}],
                "total": 100, "profit": 50, "date": "2024-05-01T10:00:00Z"
            }],
            "nextSaleNumber": 3
        }"#;
        let mut state: StoreState = serde_json::from_str(json).unwrap();
        assert!(state.normalize());
        assert_eq!(state.next_sale_number, 10);
        assert!(!state.normalize());

        let mut empty: StoreState = serde_json::from_str("{}").unwrap();
        assert!(empty.normalize());
        assert_eq!(empty.next_sale_number, 1);
    }

    #[test]
    fn test_serialized_document_shape() {
        let state = StoreState::default();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["nextSaleNumber"], 1);
        assert!(json["inventory"].as_array().unwrap().is_empty());
        assert!(json["sales"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_low_stock_sorted_ascending() {
        let mut state = StoreState::default();
        state.add_item(new_item("Two", 2)).unwrap();
        state.add_item(new_item("Plenty", 50)).unwrap();
        state.add_item(new_item("Zero", 0)).unwrap();

        let names: Vec<String> = state.low_stock().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Zero", "Two"]);
    }

    #[test]
    fn test_unknown_item_in_cart() {
        let mut state = StoreState::default();
        let err = state
            .record_sale(&[SaleItem::new("ghost", 1, Money::from_cents(100))], Utc::now())
            .unwrap_err();
        assert_eq!(err, CoreError::ItemNotFound("ghost".into()));
        assert_eq!(state.next_sale_number, 1);
    }
}
