//! # Domain Types
//!
//! Core domain types used throughout InventoryPro.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │   InventoryItem     │   │      Sale       │   │    SaleItem     │   │
//! │  │  ─────────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  id (UUID)          │   │  id (UUID)      │   │  itemId (ref)   │   │
//! │  │  name, category     │   │  receiptNumber  │   │  quantity       │   │
//! │  │  price, costPrice   │   │  items ─────────┼──►│  price (frozen) │   │
//! │  │  stockLevel         │   │  total, profit  │   └─────────────────┘   │
//! │  │  lowStockThreshold  │   │  date           │                         │
//! │  │  lastSoldDate       │   └─────────────────┘                         │
//! │  └─────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! - `id`: UUID v4, immutable, used for references (`SaleItem.item_id`)
//! - `receiptNumber`: human-facing, strictly increasing, used for display

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Inventory Item
// =============================================================================

/// A catalog item available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryItem {
    /// Unique identifier (UUID v4), immutable after creation.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Free-form category label.
    pub category: String,

    /// Sale price in cents (> 0).
    pub price: Money,

    /// Cost price in cents (>= 0), used for profit.
    pub cost_price: Money,

    /// Units on hand (>= 0).
    pub stock_level: i64,

    /// Advisory threshold for the low-stock report (>= 0).
    pub low_stock_threshold: i64,

    /// Set by every sale that touches this item.
    #[ts(as = "Option<String>")]
    pub last_sold_date: Option<DateTime<Utc>>,
}

impl InventoryItem {
    /// Checks whether the item is at or below its low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock_level <= self.low_stock_threshold
    }

    /// Checks whether `quantity` units can be taken from stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock_level >= quantity
    }
}

// =============================================================================
// Catalog Input
// =============================================================================

/// Fields for a new catalog item (everything except the generated id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub name: String,
    pub category: String,
    pub price: Money,
    pub cost_price: Money,
    pub stock_level: i64,
    pub low_stock_threshold: i64,
    #[serde(default)]
    pub last_sold_date: Option<DateTime<Utc>>,
}

impl NewInventoryItem {
    /// Turns the input into a catalog record with the given id.
    pub fn into_item(self, id: String) -> InventoryItem {
        InventoryItem {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
            cost_price: self.cost_price,
            stock_level: self.stock_level,
            low_stock_threshold: self.low_stock_threshold,
            last_sold_date: self.last_sold_date,
        }
    }
}

/// Partial update of a catalog item. Absent fields are left unchanged.
///
/// `last_sold_date` is doubly optional: `None` leaves the date alone,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<i64>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_sold_date: Option<Option<DateTime<Utc>>>,
}

impl InventoryItemPatch {
    /// Patch that only sets the stock level (the inline stock editor's update).
    pub fn stock_level(stock_level: i64) -> Self {
        InventoryItemPatch {
            stock_level: Some(stock_level),
            ..Default::default()
        }
    }

    /// Returns true when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.cost_price.is_none()
            && self.stock_level.is_none()
            && self.low_stock_threshold.is_none()
            && self.last_sold_date.is_none()
    }

    /// Merges the provided fields into `item`.
    pub fn apply_to(&self, item: &mut InventoryItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(category) = &self.category {
            item.category = category.clone();
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(cost_price) = self.cost_price {
            item.cost_price = cost_price;
        }
        if let Some(stock_level) = self.stock_level {
            item.stock_level = stock_level;
        }
        if let Some(threshold) = self.low_stock_threshold {
            item.low_stock_threshold = threshold;
        }
        if let Some(last_sold_date) = self.last_sold_date {
            item.last_sold_date = last_sold_date;
        }
    }
}

/// Maps a present field (including an explicit `null`) to `Some(..)`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Sale Item
// =============================================================================

/// A cart line.
///
/// `price` is the unit price charged, captured when the line was added to the
/// cart. It is a snapshot, not a live reference to the catalog price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleItem {
    /// Referenced catalog item.
    pub item_id: String,
    /// Units sold (> 0).
    pub quantity: i64,
    /// Unit price charged (frozen).
    pub price: Money,
}

impl SaleItem {
    /// Creates a cart line.
    pub fn new(item_id: impl Into<String>, quantity: i64, price: Money) -> Self {
        SaleItem {
            item_id: item_id.into(),
            quantity,
            price,
        }
    }

    /// Line total (price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,
    /// Strictly increasing, display-facing number.
    pub receipt_number: i64,
    /// The cart exactly as submitted.
    pub items: Vec<SaleItem>,
    /// Σ price × quantity.
    pub total: Money,
    /// Σ (price − costPrice) × quantity, cost taken at the time of sale.
    pub profit: Money,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

impl Sale {
    /// Checks whether any line of this sale references `item_id`.
    pub fn references(&self, item_id: &str) -> bool {
        self.items.iter().any(|line| line.item_id == item_id)
    }

    /// Total number of units across all lines.
    pub fn unit_count(&self) -> i64 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

/// Result of a processed sale: the new sale and the inventory after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub sale: Sale,
    pub updated_inventory: Vec<InventoryItem>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> InventoryItem {
        InventoryItem {
            id: "a".into(),
            name: "Espresso".into(),
            category: "Coffee".into(),
            price: Money::from_cents(1000),
            cost_price: Money::from_cents(200),
            stock_level: 5,
            low_stock_threshold: 5,
            last_sold_date: None,
        }
    }

    #[test]
    fn test_inventory_item_uses_camel_case() {
        let json = serde_json::to_value(item()).unwrap();
        assert_eq!(json["costPrice"], 200);
        assert_eq!(json["stockLevel"], 5);
        assert_eq!(json["lowStockThreshold"], 5);
        assert!(json["lastSoldDate"].is_null());
    }

    #[test]
    fn test_low_stock_is_inclusive() {
        let mut item = item();
        assert!(item.is_low_stock());
        item.stock_level = 6;
        assert!(!item.is_low_stock());
    }

    #[test]
    fn test_patch_distinguishes_absent_and_null() {
        let absent: InventoryItemPatch = serde_json::from_str(r#"{"stockLevel": 3}"#).unwrap();
        assert_eq!(absent.stock_level, Some(3));
        assert_eq!(absent.last_sold_date, None);

        let cleared: InventoryItemPatch =
            serde_json::from_str(r#"{"lastSoldDate": null}"#).unwrap();
        assert_eq!(cleared.last_sold_date, Some(None));

        let mut item = item();
        item.last_sold_date = Some(Utc::now());
        cleared.apply_to(&mut item);
        assert_eq!(item.last_sold_date, None);
    }

    #[test]
    fn test_patch_merges_only_provided_fields() {
        let mut item = item();
        let patch = InventoryItemPatch {
            name: Some("Decaf".into()),
            stock_level: Some(12),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        patch.apply_to(&mut item);
        assert_eq!(item.name, "Decaf");
        assert_eq!(item.stock_level, 12);
        assert_eq!(item.category, "Coffee");
        assert_eq!(item.price.cents(), 1000);
        assert!(InventoryItemPatch::default().is_empty());
    }

    #[test]
    fn test_sale_item_line_total() {
        let line = SaleItem::new("a", 3, Money::from_cents(1000));
        assert_eq!(line.line_total().cents(), 3000);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["itemId"], "a");
    }
}
