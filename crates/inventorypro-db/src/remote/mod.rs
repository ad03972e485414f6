//! # Remote Store (PostgreSQL)
//!
//! The remote backend keeps inventory and sales in two tables instead of one
//! document.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         RemoteStore                                     │
//! │                                                                         │
//! │  PgPool (max_connections, acquire timeout)                              │
//! │    │                                                                    │
//! │    ├── inventory_items   list / get / insert / update / delete          │
//! │    ├── sales             list / clear / cascade on item delete          │
//! │    ├── store_counters    next receipt number (row-locked)               │
//! │    └── process_sale()    optional stored procedure (checkout.rs)        │
//! │                                                                         │
//! │  Rows come back as to_jsonb(..) and are mapped in rows.rs.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod checkout;
pub(crate) mod rows;

use std::str::FromStr;

use inventorypro_core::validation::{validate_new_item, validate_patch};
use inventorypro_core::{
    generate_id, CascadeDelete, CoreError, InventoryItem, InventoryItemPatch, NewInventoryItem,
    Sale, StoreState,
};
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{Postgres, Row, Transaction};
use tracing::{debug, info};

use crate::config::RemoteConfig;
use crate::error::{DbError, DbResult};
use crate::migrations;
use rows::{item_from_row, sale_from_row};

/// Key of the receipt counter row in `store_counters`.
pub(crate) const SALES_COUNTER: &str = "sales";

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    pool: PgPool,
    use_procedure: bool,
}

impl RemoteStore {
    /// Connects, and runs migrations if the config asks for it.
    pub async fn connect(config: &RemoteConfig) -> DbResult<Self> {
        info!(
            max_connections = config.max_connections,
            "Connecting to remote store"
        );

        let options = PgConnectOptions::from_str(&config.url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .password(&config.key);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let store = RemoteStore {
            pool,
            use_procedure: config.use_procedure,
        };

        if config.run_migrations {
            migrations::run_migrations(&store.pool).await?;
        }

        Ok(store)
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    pub async fn list_inventory(&self) -> DbResult<Vec<InventoryItem>> {
        let rows = sqlx::query(
            r#"
            SELECT to_jsonb(i) AS row
            FROM inventory_items i
            ORDER BY i.created_at DESC, i.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| item_from_row(&json_column(row)?)).collect()
    }

    pub async fn get_item(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        let row = sqlx::query("SELECT to_jsonb(i) AS row FROM inventory_items i WHERE i.id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| item_from_row(&json_column(&row)?)).transpose()
    }

    pub async fn insert_item(&self, input: NewInventoryItem) -> DbResult<InventoryItem> {
        validate_new_item(&input).map_err(CoreError::from)?;
        let item = input.into_item(generate_id());

        sqlx::query(
            r#"
            INSERT INTO inventory_items (
                id, name, category, price, cost_price,
                stock_level, low_stock_threshold, last_sold_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price.cents())
        .bind(item.cost_price.cents())
        .bind(item.stock_level)
        .bind(item.low_stock_threshold)
        .bind(item.last_sold_date)
        .execute(&self.pool)
        .await?;

        debug!(id = %item.id, "Inserted inventory item");
        Ok(item)
    }

    /// Read-modify-write under a row lock. `Ok(None)` when the id is absent.
    pub async fn update_item(
        &self,
        id: &str,
        patch: &InventoryItemPatch,
    ) -> DbResult<Option<InventoryItem>> {
        validate_patch(patch).map_err(CoreError::from)?;

        let mut tx = self.begin().await?;
        let row = sqlx::query(
            "SELECT to_jsonb(i) AS row FROM inventory_items i WHERE i.id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut item = item_from_row(&json_column(&row)?)?;
        patch.apply_to(&mut item);

        sqlx::query(
            r#"
            UPDATE inventory_items SET
                name = $2, category = $3, price = $4, cost_price = $5,
                stock_level = $6, low_stock_threshold = $7, last_sold_date = $8
            WHERE id = $1
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price.cents())
        .bind(item.cost_price.cents())
        .bind(item.stock_level)
        .bind(item.low_stock_threshold)
        .bind(item.last_sold_date)
        .execute(&mut *tx)
        .await?;

        commit(tx).await?;
        Ok(Some(item))
    }

    /// Deletes the item and every sale whose items reference it, atomically.
    pub async fn delete_item(&self, id: &str) -> DbResult<CascadeDelete> {
        let mut tx = self.begin().await?;

        let row = sqlx::query(
            "DELETE FROM inventory_items WHERE id = $1 RETURNING to_jsonb(inventory_items) AS row",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            // Dropping the transaction rolls it back.
            return Err(DbError::not_found("InventoryItem", id));
        };
        let item = item_from_row(&json_column(&row)?)?;

        let removed = sqlx::query(
            r#"
            DELETE FROM sales
            WHERE items @> jsonb_build_array(jsonb_build_object('itemId', $1::text))
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        commit(tx).await?;

        Ok(CascadeDelete {
            item,
            removed_sales: removed as usize,
        })
    }

    // =========================================================================
    // Sales
    // =========================================================================

    pub async fn list_sales(&self) -> DbResult<Vec<Sale>> {
        let rows = sqlx::query(
            "SELECT to_jsonb(s) AS row FROM sales s ORDER BY s.receipt_number DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| sale_from_row(&json_column(row)?)).collect()
    }

    /// Deletes every sale. The receipt counter row is left alone.
    pub async fn clear_sales(&self) -> DbResult<usize> {
        let removed = sqlx::query("DELETE FROM sales")
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(removed as usize)
    }

    /// Inventory, sales and counter read in one repeatable-read transaction.
    pub async fn snapshot(&self) -> DbResult<StoreState> {
        let mut tx = self.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let inventory = sqlx::query(
            "SELECT to_jsonb(i) AS row FROM inventory_items i ORDER BY i.created_at DESC, i.id",
        )
        .fetch_all(&mut *tx)
        .await?
        .iter()
        .map(|row| item_from_row(&json_column(row)?))
        .collect::<DbResult<Vec<_>>>()?;

        let sales = sqlx::query("SELECT to_jsonb(s) AS row FROM sales s ORDER BY s.receipt_number DESC")
            .fetch_all(&mut *tx)
            .await?
            .iter()
            .map(|row| sale_from_row(&json_column(row)?))
            .collect::<DbResult<Vec<_>>>()?;

        let next: Option<i64> =
            sqlx::query_scalar("SELECT next_sale_number FROM store_counters WHERE id = $1")
                .bind(SALES_COUNTER)
                .fetch_optional(&mut *tx)
                .await?;

        commit(tx).await?;

        let mut state = StoreState {
            inventory,
            sales,
            next_sale_number: next.unwrap_or_default(),
        };
        state.normalize();
        Ok(state)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Checks if the database is reachable.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        info!("Closing remote store connection pool");
        self.pool.close().await;
    }

    async fn begin(&self) -> DbResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}

async fn commit(tx: Transaction<'static, Postgres>) -> DbResult<()> {
    tx.commit()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))
}

/// Pulls the `row` jsonb column out of a result row.
fn json_column(row: &sqlx::postgres::PgRow) -> DbResult<Value> {
    Ok(row.try_get::<Value, _>("row")?)
}
