//! Sample catalog for a fresh store.

use tracing::info;

use crate::error::ApiError;
use inventorypro_core::{InventoryItem, Money, NewInventoryItem};
use inventorypro_db::Database;

/// Category name and its products as (name, price cents, cost cents).
const CATALOG: &[(&str, &[(&str, i64, i64)])] = &[
    (
        "Coffee",
        &[
            ("Espresso Beans 1kg", 2499, 1350),
            ("House Blend 500g", 1299, 640),
            ("Decaf Colombia 250g", 899, 420),
            ("Cold Brew Concentrate", 1150, 480),
        ],
    ),
    (
        "Tea",
        &[
            ("Sencha Green Tea", 799, 310),
            ("Earl Grey 100 bags", 649, 260),
            ("Chamomile 50 bags", 549, 200),
        ],
    ),
    (
        "Dairy & Alternatives",
        &[
            ("Oat Milk 1L", 399, 180),
            ("Almond Milk 1L", 429, 195),
            ("Whole Milk 2L", 349, 170),
        ],
    ),
    (
        "Accessories",
        &[
            ("Paper Filters #4", 499, 150),
            ("Reusable Cup 12oz", 1499, 520),
            ("Pour-Over Dripper", 2299, 900),
        ],
    ),
];

/// Stock levels cycled across the catalog, so some items start low.
const STOCK_LEVELS: &[i64] = &[24, 8, 3, 40, 1, 15];

/// Default low-stock threshold for seeded items.
const LOW_STOCK_THRESHOLD: i64 = 5;

/// Seeds the sample catalog when the store has no items.
///
/// Returns the added items, or an empty list when the store already had a
/// catalog.
pub async fn seed_catalog(db: &Database) -> Result<Vec<InventoryItem>, ApiError> {
    let existing = db.inventory().list().await?;
    if !existing.is_empty() {
        info!(
            existing = existing.len(),
            "Store already has items, skipping seed"
        );
        return Ok(Vec::new());
    }

    let mut added = Vec::new();
    let mut stock = STOCK_LEVELS.iter().cycle();

    for (category, products) in CATALOG {
        for (name, price, cost) in products.iter() {
            let item = db
                .inventory()
                .add(NewInventoryItem {
                    name: name.to_string(),
                    category: category.to_string(),
                    price: Money::from_cents(*price),
                    cost_price: Money::from_cents(*cost),
                    stock_level: stock.next().copied().unwrap_or_default(),
                    low_stock_threshold: LOW_STOCK_THRESHOLD,
                    last_sold_date: None,
                })
                .await?;
            added.push(item);
        }
    }

    info!(count = added.len(), "Seeded sample catalog");
    Ok(added)
}
