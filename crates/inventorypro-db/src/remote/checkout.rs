//! Sale processing against the remote store.
//!
//! ```text
//! process_sale(cart)
//!    │
//!    ├── use_procedure? ──► SELECT process_sale($1)       (one server round trip)
//!    │                        ├── ok                 → sale row
//!    │                        ├── IPSAL + detail     → CoreError (no changes)
//!    │                        └── 42883 (missing fn) → fall through
//!    ▼
//! manual transaction
//!    1. lock store_counters row          (serializes receipt numbers)
//!    2. lock the cart's inventory rows   (FOR UPDATE, id order)
//!    3. plan_sale()                      (same rules as the file store)
//!    4. UPDATE ... WHERE stock_level >= qty, per item
//!    5. INSERT sale, advance counter, COMMIT
//! ```

use chrono::Utc;
use inventorypro_core::{generate_id, plan_sale, CoreError, Sale, SaleItem, SaleReceipt};
use serde_json::Value;
use sqlx::postgres::PgDatabaseError;
use sqlx::types::Json;
use tracing::{debug, info, warn};

use super::rows::{item_from_row, sale_from_row};
use super::{commit, json_column, RemoteStore, SALES_COUNTER};
use crate::error::{DbError, DbResult};

/// SQLSTATE the `process_sale` procedure raises for rejected carts. The
/// DETAIL field carries a JSON description of the failure.
const SALE_REJECTED: &str = "IPSAL";

impl RemoteStore {
    /// Processes a cart and returns the sale with the refreshed inventory.
    pub async fn process_sale(&self, cart: &[SaleItem]) -> DbResult<SaleReceipt> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let procedure_result = if self.use_procedure {
            self.call_procedure(cart).await?
        } else {
            None
        };

        let sale = match procedure_result {
            Some(sale) => sale,
            None => self.process_sale_in_transaction(cart).await?,
        };

        info!(
            receipt_number = sale.receipt_number,
            total = %sale.total,
            lines = sale.items.len(),
            "Sale processed"
        );

        let updated_inventory = self.list_inventory().await?;
        Ok(SaleReceipt {
            sale,
            updated_inventory,
        })
    }

    /// `Ok(None)` when the procedure is not installed.
    async fn call_procedure(&self, cart: &[SaleItem]) -> DbResult<Option<Sale>> {
        let result = sqlx::query("SELECT to_jsonb(s) AS row FROM process_sale($1) s")
            .bind(Json(cart))
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(Some(sale_from_row(&json_column(&row)?)?)),
            Err(e) if DbError::is_undefined_function(&e) => {
                warn!("process_sale procedure not found, using client-side transaction");
                Ok(None)
            }
            Err(e) => Err(rejection(&e).map(DbError::from).unwrap_or_else(|| e.into())),
        }
    }

    async fn process_sale_in_transaction(&self, cart: &[SaleItem]) -> DbResult<Sale> {
        let mut tx = self.begin().await?;

        sqlx::query(
            "INSERT INTO store_counters (id, next_sale_number) VALUES ($1, 1) ON CONFLICT (id) DO NOTHING",
        )
        .bind(SALES_COUNTER)
        .execute(&mut *tx)
        .await?;

        let counter: i64 = sqlx::query_scalar(
            "SELECT next_sale_number FROM store_counters WHERE id = $1 FOR UPDATE",
        )
        .bind(SALES_COUNTER)
        .fetch_one(&mut *tx)
        .await?;

        // Counter must stay above every stored receipt, even after manual edits.
        let max_receipt: Option<i64> = sqlx::query_scalar("SELECT MAX(receipt_number) FROM sales")
            .fetch_one(&mut *tx)
            .await?;
        let receipt_number = counter.max(max_receipt.map_or(1, |max| max + 1));

        let mut ids: Vec<&str> = cart.iter().map(|line| line.item_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();

        let items = sqlx::query(
            r#"
            SELECT to_jsonb(i) AS row
            FROM inventory_items i
            WHERE i.id = ANY($1)
            ORDER BY i.id
            FOR UPDATE
            "#,
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?
        .iter()
        .map(|row| item_from_row(&json_column(row)?))
        .collect::<DbResult<Vec<_>>>()?;

        // A rejected plan returns before any write; dropping `tx` rolls back.
        let plan = plan_sale(&items, cart, receipt_number, generate_id(), Utc::now())?;

        for (item_id, quantity) in &plan.decrements {
            let updated = sqlx::query(
                r#"
                UPDATE inventory_items
                SET stock_level = stock_level - $2, last_sold_date = $3
                WHERE id = $1 AND stock_level >= $2
                "#,
            )
            .bind(item_id)
            .bind(quantity)
            .bind(plan.sale.date)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if updated == 0 {
                return Err(DbError::TransactionFailed(format!(
                    "stock for {item_id} changed during sale"
                )));
            }
        }

        let sale = plan.sale;
        sqlx::query(
            r#"
            INSERT INTO sales (id, receipt_number, items, total, profit, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.receipt_number)
        .bind(Json(&sale.items))
        .bind(sale.total.cents())
        .bind(sale.profit.cents())
        .bind(sale.date)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE store_counters SET next_sale_number = $2 WHERE id = $1")
            .bind(SALES_COUNTER)
            .bind(sale.receipt_number + 1)
            .execute(&mut *tx)
            .await?;

        commit(tx).await?;
        debug!(receipt_number = sale.receipt_number, "Committed sale transaction");
        Ok(sale)
    }
}

/// Extracts a typed rejection from a `process_sale` error, if it is one.
fn rejection(err: &sqlx::Error) -> Option<CoreError> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    if db_err.code().as_deref() != Some(SALE_REJECTED) {
        return None;
    }
    let detail = db_err.try_downcast_ref::<PgDatabaseError>()?.detail()?;
    rejection_from_detail(detail)
}

/// Parses the DETAIL payload raised by the procedure.
///
/// ```text
/// {"error": "insufficient_stock", "itemId": "..", "name": "..", "available": 5, "requested": 6}
/// ```
fn rejection_from_detail(detail: &str) -> Option<CoreError> {
    let detail: Value = serde_json::from_str(detail).ok()?;
    let text = |key: &str| detail.get(key).and_then(Value::as_str).map(str::to_string);
    let int = |key: &str| detail.get(key).and_then(super::rows::coerce_int);

    match detail.get("error")?.as_str()? {
        "empty_cart" => Some(CoreError::EmptyCart),
        "item_not_found" => Some(CoreError::ItemNotFound(text("itemId")?)),
        "invalid_quantity" => Some(CoreError::InvalidQuantity {
            item_id: text("itemId")?,
            quantity: int("quantity")?,
        }),
        "invalid_price" => Some(
            inventorypro_core::ValidationError::MustBePositive {
                field: "price".to_string(),
            }
            .into(),
        ),
        "insufficient_stock" => Some(CoreError::InsufficientStock {
            item_id: text("itemId")?,
            name: text("name")?,
            available: int("available")?,
            requested: int("requested")?,
        }),
        _ => None,
    }
}
