//! # InventoryPro CLI
//!
//! The operation boundary and command-line front end for InventoryPro.
//!
//! ## Module Organization
//! ```text
//! src/
//! ├── lib.rs       ◄─── You are here (tracing setup, module tree)
//! ├── main.rs      ◄─── Binary entry point
//! ├── error.rs     ◄─── ApiError { code, message }
//! ├── commands/    ◄─── Operations returning Result<T, ApiError>
//! │   ├── inventory.rs
//! │   ├── sale.rs
//! │   └── report.rs
//! ├── actions.rs   ◄─── { success, message } wrappers over commands
//! ├── cli.rs       ◄─── Argument parsing and dispatch
//! └── seed.rs      ◄─── Sample catalog
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Application Startup                                  │
//! │                                                                         │
//! │  1. dotenvy::dotenv()        .env values become environment variables   │
//! │  2. init_tracing()           RUST_LOG or the default filter, to stderr  │
//! │  3. StoreConfig::from_env()  file store unless REMOTE_STORE_URL + KEY   │
//! │  4. Database::open(config)   lazy file load / remote connect + migrate  │
//! │  5. cli::execute(db, cmd)    JSON result on stdout                      │
//! │  6. db.close()               flush queued writes / close the pool       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod actions;
pub mod cli;
pub mod commands;
pub mod error;
pub mod seed;

use tracing_subscriber::EnvFilter;

pub use error::{ApiError, ErrorCode};

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,inventorypro=debug,sqlx=warn";

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// Set via `RUST_LOG` environment variable:
/// - `RUST_LOG=debug` - Verbose logging
/// - `RUST_LOG=info` - Normal logging (default)
/// - `RUST_LOG=inventorypro_db=trace` - Trace store operations
///
/// Logs go to stderr so stdout carries only command output.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
