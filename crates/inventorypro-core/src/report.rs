//! # Sales Analytics
//!
//! Read-only aggregates over inventory and sales, used by the dashboard and
//! the reports page.
//!
//! ```text
//! inventory ─┐
//!            ├──► DashboardSummary { totalProducts, lowStockCount, revenue, ... }
//! sales ─────┤
//!            └──► SalesReport { revenue, profit, margin, averageSale, topProducts, lowStock }
//! ```

use std::collections::HashMap;

use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::state::low_stock_items;
use crate::types::{InventoryItem, Sale};
use crate::{REPORT_LOW_STOCK_LIMIT, TOP_PRODUCTS_LIMIT};

// =============================================================================
// Dashboard
// =============================================================================

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardSummary {
    pub total_products: usize,
    pub low_stock_count: usize,
    pub total_revenue: Money,
    pub total_profit: Money,
    pub latest_sale: Option<Sale>,
    /// Units in the latest sale (0 when there is none).
    pub latest_sale_units: i64,
}

impl DashboardSummary {
    pub fn build(inventory: &[InventoryItem], sales: &[Sale]) -> Self {
        let latest_sale = latest(sales).cloned();
        DashboardSummary {
            total_products: inventory.len(),
            low_stock_count: inventory.iter().filter(|item| item.is_low_stock()).count(),
            total_revenue: sales.iter().map(|sale| sale.total).sum(),
            total_profit: sales.iter().map(|sale| sale.profit).sum(),
            latest_sale_units: latest_sale.as_ref().map_or(0, Sale::unit_count),
            latest_sale,
        }
    }
}

/// Highest receipt number wins, independent of collection order.
fn latest(sales: &[Sale]) -> Option<&Sale> {
    sales.iter().max_by_key(|sale| sale.receipt_number)
}

// =============================================================================
// Sales Report
// =============================================================================

/// Revenue ranking entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TopProduct {
    pub item_id: String,
    /// Catalog name, or the raw id once the item is gone.
    pub name: String,
    pub units_sold: i64,
    pub revenue: Money,
}

/// Full sales report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesReport {
    pub total_revenue: Money,
    pub total_profit: Money,
    /// Profit as a whole percentage of revenue, 0 without revenue.
    pub profit_margin_percent: i64,
    pub sale_count: usize,
    pub average_sale: Money,
    pub units_sold: i64,
    pub top_products: Vec<TopProduct>,
    /// The lowest-stocked items first, at most [`REPORT_LOW_STOCK_LIMIT`].
    pub low_stock: Vec<InventoryItem>,
}

impl SalesReport {
    /// Builds the report with the default top-products limit.
    pub fn build(inventory: &[InventoryItem], sales: &[Sale]) -> Self {
        Self::build_with_limit(inventory, sales, TOP_PRODUCTS_LIMIT)
    }

    pub fn build_with_limit(inventory: &[InventoryItem], sales: &[Sale], limit: usize) -> Self {
        let total_revenue: Money = sales.iter().map(|sale| sale.total).sum();
        let total_profit: Money = sales.iter().map(|sale| sale.profit).sum();
        let mut low_stock = low_stock_items(inventory);
        low_stock.truncate(REPORT_LOW_STOCK_LIMIT);

        SalesReport {
            total_revenue,
            total_profit,
            profit_margin_percent: margin_percent(total_profit, total_revenue),
            sale_count: sales.len(),
            average_sale: total_revenue.average_over(sales.len()),
            units_sold: sales.iter().map(Sale::unit_count).sum(),
            top_products: top_products(inventory, sales, limit),
            low_stock,
        }
    }
}

/// `profit / revenue × 100`, rounded half up.
fn margin_percent(profit: Money, revenue: Money) -> i64 {
    if !revenue.is_positive() {
        return 0;
    }
    let profit = i128::from(profit.cents());
    let revenue = i128::from(revenue.cents());
    let rounded = (profit * 200 + revenue).div_euclid(revenue * 2);
    i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX })
}

fn top_products(inventory: &[InventoryItem], sales: &[Sale], limit: usize) -> Vec<TopProduct> {
    let names: HashMap<&str, &str> = inventory
        .iter()
        .map(|item| (item.id.as_str(), item.name.as_str()))
        .collect();

    // Vec keeps first-seen order so revenue ties are stable.
    let mut ranking: Vec<TopProduct> = Vec::new();
    for line in sales.iter().flat_map(|sale| sale.items.iter()) {
        match ranking.iter_mut().find(|entry| entry.item_id == line.item_id) {
            Some(entry) => {
                entry.units_sold += line.quantity;
                entry.revenue += line.line_total();
            }
            None => ranking.push(TopProduct {
                item_id: line.item_id.clone(),
                name: names
                    .get(line.item_id.as_str())
                    .map_or_else(|| line.item_id.clone(), |name| name.to_string()),
                units_sold: line.quantity,
                revenue: line.line_total(),
            }),
        }
    }

    ranking.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    ranking.truncate(limit);
    ranking
}
