//! # Sale Transaction Planning
//!
//! Turns a cart into a fully computed sale without touching storage.
//!
//! ## Transaction Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        plan_sale(inventory, cart)                       │
//! │                                                                         │
//! │  1. VALIDATE (cart order, stops at the first failure)                   │
//! │     ├── empty cart            → EmptyCart                               │
//! │     ├── unknown itemId        → ItemNotFound                            │
//! │     ├── quantity <= 0         → InvalidQuantity                         │
//! │     ├── price <= 0            → Validation(MustBePositive)              │
//! │     ├── Σ qty > stockLevel    → InsufficientStock (incl. Σ overflow)    │
//! │     └── total/profit overflow → Validation(OutOfRange)                  │
//! │                                                                         │
//! │  2. APPLY (full rewrite of the inventory collection)                    │
//! │     ├── referenced items: stockLevel -= Σ qty, lastSoldDate = now       │
//! │     └── all other items pass through unchanged                          │
//! │                                                                         │
//! │  3. TOTALS                                                              │
//! │     ├── total  = Σ price × qty                                          │
//! │     └── profit = Σ (price − costPrice) × qty                            │
//! │                                                                         │
//! │  4. SALE RECORD (receipt number supplied by the caller)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is returned until the whole cart has been validated, so a failed
//! plan never leaks a partial result. The caller owns the receipt counter and
//! only advances it after committing the plan.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{InventoryItem, Sale, SaleItem};
use crate::validation::validate_quantity;

/// Outcome of a successfully validated cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalePlan {
    /// The sale record to persist.
    pub sale: Sale,
    /// The full inventory collection after the sale.
    pub inventory: Vec<InventoryItem>,
    /// Units taken per item, in first-seen cart order.
    pub decrements: Vec<(String, i64)>,
}

/// Validates `cart` against `inventory` and computes the resulting sale.
///
/// `inventory` may be the whole catalog (file store) or only the rows
/// referenced by the cart (remote fallback); the apply pass rewrites whatever
/// it is given.
pub fn plan_sale(
    inventory: &[InventoryItem],
    cart: &[SaleItem],
    receipt_number: i64,
    sale_id: String,
    now: DateTime<Utc>,
) -> CoreResult<SalePlan> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let index: HashMap<&str, &InventoryItem> = inventory
        .iter()
        .map(|item| (item.id.as_str(), item))
        .collect();

    // Running totals per item so split lines for one product cannot oversell.
    let mut requested: HashMap<&str, i64> = HashMap::new();
    let mut decrements: Vec<(String, i64)> = Vec::new();
    let mut total = Money::zero();
    let mut profit = Money::zero();

    for line in cart {
        let item = index
            .get(line.item_id.as_str())
            .copied()
            .ok_or_else(|| CoreError::ItemNotFound(line.item_id.clone()))?;

        if validate_quantity(line.quantity).is_err() {
            return Err(CoreError::InvalidQuantity {
                item_id: line.item_id.clone(),
                quantity: line.quantity,
            });
        }

        if !line.price.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "price".to_string(),
            }
            .into());
        }

        // An overflowing running total exceeds any stock level.
        let wanted = requested.entry(item.id.as_str()).or_insert(0);
        match wanted.checked_add(line.quantity) {
            Some(running) if item.can_sell(running) => *wanted = running,
            running => {
                return Err(CoreError::InsufficientStock {
                    item_id: item.id.clone(),
                    name: item.name.clone(),
                    available: item.stock_level,
                    requested: running.unwrap_or(i64::MAX),
                })
            }
        }

        match decrements.iter_mut().find(|(id, _)| id == &item.id) {
            Some((_, qty)) => *qty = *wanted,
            None => decrements.push((item.id.clone(), *wanted)),
        }

        total = line
            .price
            .checked_mul(line.quantity)
            .and_then(|line_total| total.checked_add(line_total))
            .ok_or_else(|| out_of_range("total"))?;
        profit = line
            .price
            .checked_sub(item.cost_price)
            .and_then(|margin| margin.checked_mul(line.quantity))
            .and_then(|line_profit| profit.checked_add(line_profit))
            .ok_or_else(|| out_of_range("profit"))?;
    }

    let updated = inventory
        .iter()
        .map(|item| match requested.get(item.id.as_str()) {
            Some(qty) => InventoryItem {
                stock_level: item.stock_level - qty,
                last_sold_date: Some(now),
                ..item.clone()
            },
            None => item.clone(),
        })
        .collect();

    Ok(SalePlan {
        sale: Sale {
            id: sale_id,
            receipt_number,
            items: cart.to_vec(),
            total,
            profit,
            date: now,
        },
        inventory: updated,
        decrements,
    })
}

fn out_of_range(field: &str) -> CoreError {
    ValidationError::OutOfRange {
        field: field.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn item(id: &str, stock: i64, price: i64, cost: i64) -> InventoryItem {
        InventoryItem {
            id: id.into(),
            name: format!("Item {id}"),
            category: "General".into(),
            price: Money::from_cents(price),
            cost_price: Money::from_cents(cost),
            stock_level: stock,
            low_stock_threshold: 1,
            last_sold_date: None,
        }
    }

    fn plan(inventory: &[InventoryItem], cart: &[SaleItem]) -> CoreResult<SalePlan> {
        plan_sale(inventory, cart, 7, "sale-1".into(), Utc::now())
    }

    #[test]
    fn test_worked_example_success() {
        let inventory = vec![item("A", 5, 1000, 200), item("B", 9, 300, 100)];
        let cart = vec![SaleItem::new("A", 3, Money::from_cents(1000))];
        let plan = plan(&inventory, &cart).unwrap();

        assert_eq!(plan.sale.total.cents(), 3000);
        assert_eq!(plan.sale.profit.cents(), 2400);
        assert_eq!(plan.sale.receipt_number, 7);
        assert_eq!(plan.sale.items, cart);
        assert_eq!(plan.inventory[0].stock_level, 2);
        assert_eq!(plan.inventory[0].last_sold_date, Some(plan.sale.date));
        // Untouched items pass through unchanged.
        assert_eq!(plan.inventory[1], inventory[1]);
        assert_eq!(plan.decrements, vec![("A".to_string(), 3)]);
    }

    #[test]
    fn test_worked_example_insufficient_stock() {
        let inventory = vec![item("A", 5, 1000, 200)];
        let cart = vec![SaleItem::new("A", 6, Money::from_cents(1000))];
        let err = plan(&inventory, &cart).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 5,
                requested: 6,
                ..
            }
        ));
    }

    #[test]
    fn test_split_lines_are_aggregated() {
        let inventory = vec![item("A", 5, 1000, 200)];
        let cart = vec![
            SaleItem::new("A", 3, Money::from_cents(1000)),
            SaleItem::new("A", 3, Money::from_cents(900)),
        ];
        let err = plan(&inventory, &cart).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { requested: 6, .. }));

        let cart = vec![
            SaleItem::new("A", 2, Money::from_cents(1000)),
            SaleItem::new("A", 3, Money::from_cents(900)),
        ];
        let plan = plan(&inventory, &cart).unwrap();
        assert_eq!(plan.inventory[0].stock_level, 0);
        assert_eq!(plan.sale.total.cents(), 2000 + 2700);
        assert_eq!(plan.sale.profit.cents(), 1600 + 2100);
        assert_eq!(plan.decrements, vec![("A".to_string(), 5)]);
    }

    #[test]
    fn test_snapshot_price_is_charged() {
        let inventory = vec![item("A", 5, 1000, 200)];
        let cart = vec![SaleItem::new("A", 1, Money::from_cents(800))];
        let plan = plan(&inventory, &cart).unwrap();
        assert_eq!(plan.sale.total.cents(), 800);
        assert_eq!(plan.sale.profit.cents(), 600);
    }

    #[test]
    fn test_validation_order_and_errors() {
        let inventory = vec![item("A", 5, 1000, 200)];

        assert_eq!(plan(&inventory, &[]).unwrap_err(), CoreError::EmptyCart);

        let unknown = vec![SaleItem::new("missing", 0, Money::zero())];
        assert_eq!(
            plan(&inventory, &unknown).unwrap_err(),
            CoreError::ItemNotFound("missing".into())
        );

        let zero_qty = vec![SaleItem::new("A", 0, Money::zero())];
        assert!(matches!(
            plan(&inventory, &zero_qty).unwrap_err(),
            CoreError::InvalidQuantity { quantity: 0, .. }
        ));

        let zero_price = vec![SaleItem::new("A", 1, Money::zero())];
        assert_eq!(
            plan(&inventory, &zero_price).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_first_failing_line_wins() {
        let inventory = vec![item("A", 5, 1000, 200), item("B", 1, 500, 100)];
        let cart = vec![
            SaleItem::new("B", 2, Money::from_cents(500)),
            SaleItem::new("missing", 1, Money::from_cents(500)),
        ];
        assert!(matches!(
            plan(&inventory, &cart).unwrap_err(),
            CoreError::InsufficientStock { .. }
        ));
    }

    #[test]
    fn test_selling_entire_stock_is_allowed() {
        let inventory = vec![item("A", 5, 1000, 200)];
        let cart = vec![SaleItem::new("A", 5, Money::from_cents(1000))];
        let plan = plan(&inventory, &cart).unwrap();
        assert_eq!(plan.inventory[0].stock_level, 0);
    }

    #[test]
    fn test_overflowing_quantity_is_rejected() {
        let inventory = vec![item("A", 5, 1000, 200)];
        let cart = vec![
            SaleItem::new("A", 1, Money::from_cents(1)),
            SaleItem::new("A", i64::MAX, Money::from_cents(1)),
        ];
        let err = plan(&inventory, &cart).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 5,
                requested: i64::MAX,
                ..
            }
        ));

        // Even a catalog-sized stock cannot absorb an overflowing sum.
        let inventory = vec![item("A", i64::MAX, 1000, 200)];
        assert_eq!(
            plan(&inventory, &cart).unwrap_err().kind(),
            ErrorKind::InsufficientStock
        );
    }

    #[test]
    fn test_overflowing_total_is_rejected() {
        let qty = 10_000_000_000;
        let inventory = vec![item("A", qty, 10_000_000_000, 0)];
        let cart = vec![SaleItem::new("A", qty, Money::from_cents(10_000_000_000))];
        let err = plan(&inventory, &cart).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            err,
            CoreError::Validation(ValidationError::OutOfRange {
                field: "total".into()
            })
        );
    }
}
