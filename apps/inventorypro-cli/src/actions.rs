//! # Action Wrappers
//!
//! Form-submit style wrappers around the commands. Each one collapses the
//! command result into `{ success, message }` for a UI that only shows a
//! toast. The binary reaches them through `inventorypro --summary`
//! (see [`crate::cli::execute_summary`]); an embedding UI calls them directly.
//!
//! ```text
//! add_inventory_item_action    "Product added"   | "Failed to add product"
//! update_inventory_item_action "Updated"         | "Product not found" | "Failed to update"
//! delete_inventory_item_action "Deleted"         | "Product not found" | "Failed to delete"
//! process_sale_action          "Sale processed"  | <rejection message> | "Failed to process sale"
//! clear_sales_action           "Sales cleared"   | "Failed to clear sales"
//! ```

use serde::Serialize;
use tracing::warn;

use crate::commands;
use crate::error::{ApiError, ErrorCode};
use inventorypro_core::{InventoryItemPatch, NewInventoryItem, SaleItem};
use inventorypro_db::Database;

/// Outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        ActionResult {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ActionResult {
            success: false,
            message: message.into(),
        }
    }
}

fn not_found_or(err: ApiError, action: &str, fallback: &str) -> ActionResult {
    if err.code == ErrorCode::NotFound {
        return ActionResult::failed("Product not found");
    }
    warn!(action, error = %err, "Action failed");
    ActionResult::failed(fallback)
}

pub async fn add_inventory_item_action(db: &Database, input: NewInventoryItem) -> ActionResult {
    match commands::add_inventory_item(db, input).await {
        Ok(_) => ActionResult::ok("Product added"),
        Err(err) => {
            warn!(action = "add_inventory_item", error = %err, "Action failed");
            ActionResult::failed("Failed to add product")
        }
    }
}

pub async fn update_inventory_item_action(
    db: &Database,
    id: &str,
    patch: InventoryItemPatch,
) -> ActionResult {
    match commands::update_inventory_item(db, id, patch).await {
        Ok(_) => ActionResult::ok("Updated"),
        Err(err) => not_found_or(err, "update_inventory_item", "Failed to update"),
    }
}

pub async fn delete_inventory_item_action(db: &Database, id: &str) -> ActionResult {
    match commands::delete_inventory_item(db, id).await {
        Ok(_) => ActionResult::ok("Deleted"),
        Err(err) => not_found_or(err, "delete_inventory_item", "Failed to delete"),
    }
}

/// Cart rejections (unknown item, bad quantity, not enough stock) report
/// their own message; storage failures get the generic one.
pub async fn process_sale_action(db: &Database, cart: Vec<SaleItem>) -> ActionResult {
    match commands::process_sale(db, cart).await {
        Ok(_) => ActionResult::ok("Sale processed"),
        Err(err) if !err.is_failure() => ActionResult::failed(err.message),
        Err(err) => {
            warn!(action = "process_sale", error = %err, "Action failed");
            ActionResult::failed("Failed to process sale")
        }
    }
}

pub async fn clear_sales_action(db: &Database) -> ActionResult {
    match commands::clear_sales(db).await {
        Ok(_) => ActionResult::ok("Sales cleared"),
        Err(err) => {
            warn!(action = "clear_sales", error = %err, "Action failed");
            ActionResult::failed("Failed to clear sales")
        }
    }
}
