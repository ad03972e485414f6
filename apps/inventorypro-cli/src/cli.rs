//! # Command-Line Parsing and Dispatch
//!
//! ```text
//! inventorypro [--summary] <COMMAND>
//!
//!   list | low-stock | sales | dashboard | report | seed
//!   add --name <NAME> --category <CAT> --price <CENTS> --cost <CENTS>
//!       [--stock <N>] [--threshold <N>]
//!   set-stock <ID> <N>
//!   delete <ID>
//!   sell <ID:QTY[:CENTS]>...
//!   clear-sales
//! ```
//!
//! Prices are integer cents. A `sell` line without a price is charged the
//! current catalog price. With `--summary`, the mutating commands answer
//! with the `{ success, message }` action result instead of the full record.

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use crate::actions;
use crate::commands;
use crate::error::ApiError;
use crate::seed;
use inventorypro_core::{InventoryItemPatch, Money, NewInventoryItem, SaleItem};
use inventorypro_db::Database;

const ENV_HELP: &str = "\
Environment:
  INVENTORYPRO_DATA_FILE    JSON store path (default: data/inventorypro-db.json)
  REMOTE_STORE_URL          PostgreSQL URL; with REMOTE_STORE_KEY selects the remote store
  REMOTE_STORE_KEY          Remote store credential
  RUST_LOG                  Log filter (logs go to stderr)";

#[derive(Debug, Parser)]
#[command(name = "inventorypro")]
#[command(about = "InventoryPro - shop inventory and point of sale")]
#[command(after_help = ENV_HELP)]
pub struct Cli {
    /// Print `{ success, message }` for mutating commands
    #[arg(long, global = true, default_value_t = false)]
    pub summary: bool,
    #[command(subcommand)]
    pub command: Command,
}

/// A cart line as typed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellLine {
    pub item_id: String,
    pub quantity: i64,
    pub price: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List the catalog, newest first
    List,
    /// Items at or below their low-stock threshold
    LowStock,
    /// Add an item (prices in cents)
    Add(AddArgs),
    /// Set an item's stock level
    SetStock {
        id: String,
        #[arg(allow_negative_numbers = true)]
        stock_level: i64,
    },
    /// Delete an item and its sales
    Delete { id: String },
    /// Process a sale
    Sell {
        #[arg(
            required = true,
            value_name = "ID:QTY[:CENTS]",
            value_parser = parse_sell_line
        )]
        lines: Vec<SellLine>,
    },
    /// List sales, newest first
    Sales,
    /// Remove all sales
    ClearSales,
    /// Dashboard summary
    Dashboard,
    /// Sales report
    Report,
    /// Add a sample catalog to an empty store
    Seed,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub category: String,
    #[arg(long, value_name = "CENTS", allow_negative_numbers = true)]
    pub price: i64,
    #[arg(long, value_name = "CENTS", allow_negative_numbers = true)]
    pub cost: i64,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub stock: i64,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub threshold: i64,
}

impl From<AddArgs> for NewInventoryItem {
    fn from(args: AddArgs) -> Self {
        NewInventoryItem {
            name: args.name,
            category: args.category,
            price: Money::from_cents(args.price),
            cost_price: Money::from_cents(args.cost),
            stock_level: args.stock,
            low_stock_threshold: args.threshold,
            last_sold_date: None,
        }
    }
}

fn parse_sell_line(arg: &str) -> Result<SellLine, String> {
    let invalid = || format!("expected ID:QTY[:CENTS], got `{arg}`");

    let mut parts = arg.split(':');
    let item_id = parts.next().filter(|id| !id.is_empty()).ok_or_else(invalid)?;
    let quantity = parts
        .next()
        .and_then(|qty| qty.parse().ok())
        .ok_or_else(invalid)?;
    let price = match parts.next() {
        Some(cents) => Some(Money::from_cents(cents.parse().map_err(|_| invalid())?)),
        None => None,
    };
    if parts.next().is_some() {
        return Err(invalid());
    }

    Ok(SellLine {
        item_id: item_id.to_string(),
        quantity,
        price,
    })
}

fn to_json<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

/// Runs a parsed command and returns its JSON result.
pub async fn execute(db: &Database, command: Command) -> Result<Value, ApiError> {
    match command {
        Command::List => to_json(commands::list_inventory(db).await?),
        Command::Add(args) => to_json(commands::add_inventory_item(db, args.into()).await?),
        Command::LowStock => to_json(commands::list_low_stock(db).await?),
        Command::SetStock { id, stock_level } => {
            to_json(commands::set_stock_level(db, &id, stock_level).await?)
        }
        Command::Delete { id } => to_json(commands::delete_inventory_item(db, &id).await?),
        Command::Sell { lines } => {
            let cart = resolve_cart(db, lines).await?;
            to_json(commands::process_sale(db, cart).await?)
        }
        Command::Sales => to_json(commands::list_sales(db).await?),
        Command::ClearSales => {
            let removed = commands::clear_sales(db).await?;
            Ok(serde_json::json!({ "removed": removed }))
        }
        Command::Dashboard => to_json(commands::dashboard(db).await?),
        Command::Report => to_json(commands::sales_report(db).await?),
        Command::Seed => to_json(seed::seed_catalog(db).await?),
    }
}

/// Runs a mutating command through its action wrapper.
///
/// Read-only commands have no action form and run as in [`execute`].
pub async fn execute_summary(db: &Database, command: Command) -> Result<Value, ApiError> {
    let outcome = match command {
        Command::Add(args) => actions::add_inventory_item_action(db, args.into()).await,
        Command::SetStock { id, stock_level } => {
            let patch = InventoryItemPatch::stock_level(stock_level);
            actions::update_inventory_item_action(db, &id, patch).await
        }
        Command::Delete { id } => actions::delete_inventory_item_action(db, &id).await,
        Command::Sell { lines } => match resolve_cart(db, lines).await {
            Ok(cart) => actions::process_sale_action(db, cart).await,
            Err(err) => actions::ActionResult::failed(err.message),
        },
        Command::ClearSales => actions::clear_sales_action(db).await,
        read_only => return execute(db, read_only).await,
    };
    to_json(outcome)
}

/// Fills missing line prices from the catalog, like a POS cart does when an
/// item is scanned.
async fn resolve_cart(db: &Database, lines: Vec<SellLine>) -> Result<Vec<SaleItem>, ApiError> {
    let mut cart = Vec::with_capacity(lines.len());
    for line in lines {
        let price = match line.price {
            Some(price) => price,
            None => {
                db.inventory()
                    .get(&line.item_id)
                    .await?
                    .ok_or_else(|| ApiError::not_found("Item", &line.item_id))?
                    .price
            }
        };
        cart.push(SaleItem::new(line.item_id, line.quantity, price));
    }
    Ok(cart)
}
