//! InventoryPro command-line entry point.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use inventorypro_cli::cli::{self, Cli};
use inventorypro_db::{Database, StoreConfig};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    inventorypro_cli::init_tracing();

    let args = Cli::parse();

    let config = StoreConfig::from_env().context("invalid store configuration")?;
    let db = Database::open(config)
        .await
        .context("failed to open the store")?;
    if db.health_check().await {
        info!("InventoryPro store ready");
    } else {
        warn!("Store health check failed");
    }

    let outcome = if args.summary {
        cli::execute_summary(&db, args.command).await
    } else {
        cli::execute(&db, args.command).await
    };
    db.close().await;

    match outcome {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(code = ?e.code, message = %e.message, "Command failed");
            println!("{}", serde_json::to_string_pretty(&e)?);
            Ok(ExitCode::FAILURE)
        }
    }
}
