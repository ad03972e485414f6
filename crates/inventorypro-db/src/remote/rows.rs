//! Row mapping between the snake_case remote schema and the camelCase model.
//!
//! Rows are selected as `to_jsonb(row)`, so every column arrives as a JSON
//! value. Numbers are coerced leniently: integers, floats and numeric strings
//! are all accepted, since hand-edited or migrated tables do not always use
//! the declared column types.
//!
//! ```text
//! inventory_items.cost_price          ──► InventoryItem.cost_price
//! inventory_items.stock_level         ──► InventoryItem.stock_level
//! inventory_items.low_stock_threshold ──► InventoryItem.low_stock_threshold
//! inventory_items.last_sold_date      ──► InventoryItem.last_sold_date
//! sales.receipt_number                ──► Sale.receipt_number
//! sales.items (jsonb or text)         ──► Sale.items
//! ```

use chrono::{DateTime, Utc};
use inventorypro_core::{InventoryItem, Money, Sale, SaleItem};
use serde_json::Value;

use crate::error::{DbError, DbResult};

pub(crate) const INVENTORY_TABLE: &str = "inventory_items";
pub(crate) const SALES_TABLE: &str = "sales";

/// Maps an `inventory_items` row.
pub(crate) fn item_from_row(row: &Value) -> DbResult<InventoryItem> {
    let t = INVENTORY_TABLE;
    Ok(InventoryItem {
        id: text(row, t, "id")?,
        name: text(row, t, "name")?,
        category: optional_text(row, "category").unwrap_or_default(),
        price: Money::from_cents(int(row, t, "price")?),
        cost_price: Money::from_cents(optional_int(row, t, "cost_price")?.unwrap_or(0)),
        stock_level: optional_int(row, t, "stock_level")?.unwrap_or(0),
        low_stock_threshold: optional_int(row, t, "low_stock_threshold")?.unwrap_or(0),
        last_sold_date: optional_timestamp(row, t, "last_sold_date")?,
    })
}

/// Maps a `sales` row.
pub(crate) fn sale_from_row(row: &Value) -> DbResult<Sale> {
    let t = SALES_TABLE;
    Ok(Sale {
        id: text(row, t, "id")?,
        receipt_number: int(row, t, "receipt_number")?,
        items: sale_items(row.get("items").unwrap_or(&Value::Null))?,
        total: Money::from_cents(int(row, t, "total")?),
        profit: Money::from_cents(optional_int(row, t, "profit")?.unwrap_or(0)),
        date: optional_timestamp(row, t, "date")?
            .ok_or_else(|| DbError::invalid_data(t, "missing column date"))?,
    })
}

/// Parses the `sales.items` column: a JSON array, or a string holding one.
pub(crate) fn sale_items(value: &Value) -> DbResult<Vec<SaleItem>> {
    let t = SALES_TABLE;
    let parsed;
    let value = match value {
        Value::String(raw) => {
            parsed = serde_json::from_str::<Value>(raw)
                .map_err(|e| DbError::invalid_data(t, format!("items: {e}")))?;
            &parsed
        }
        Value::Null => return Ok(Vec::new()),
        other => other,
    };

    let lines = value
        .as_array()
        .ok_or_else(|| DbError::invalid_data(t, "items is not an array"))?;

    lines
        .iter()
        .map(|line| {
            // Lines written by older clients used snake_case keys.
            let item_id = optional_text(line, "itemId")
                .or_else(|| optional_text(line, "item_id"))
                .ok_or_else(|| DbError::invalid_data(t, "sale line without itemId"))?;
            Ok(SaleItem {
                item_id,
                quantity: int(line, t, "quantity")?,
                price: Money::from_cents(int(line, t, "price")?),
            })
        })
        .collect()
}

// =============================================================================
// Lenient field readers
// =============================================================================

fn text(row: &Value, table: &str, column: &str) -> DbResult<String> {
    optional_text(row, column)
        .ok_or_else(|| DbError::invalid_data(table, format!("missing column {column}")))
}

fn optional_text(row: &Value, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn int(row: &Value, table: &str, column: &str) -> DbResult<i64> {
    optional_int(row, table, column)?
        .ok_or_else(|| DbError::invalid_data(table, format!("missing column {column}")))
}

fn optional_int(row: &Value, table: &str, column: &str) -> DbResult<Option<i64>> {
    match row.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => coerce_int(value)
            .map(Some)
            .ok_or_else(|| DbError::invalid_data(table, format!("{column} is not numeric: {value}"))),
    }
}

/// Accepts `12`, `12.0`, `"12"` and `" 12.4 "`; floats round to nearest.
pub(crate) fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.round() as i64))
        }
        _ => None,
    }
}

fn optional_timestamp(row: &Value, table: &str, column: &str) -> DbResult<Option<DateTime<Utc>>> {
    match row.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => DateTime::parse_from_rfc3339(raw)
            .map(|date| Some(date.with_timezone(&Utc)))
            .map_err(|e| DbError::invalid_data(table, format!("{column}: {e}"))),
        Some(other) => Err(DbError::invalid_data(
            table,
            format!("{column} is not a timestamp: {other}"),
        )),
    }
}
