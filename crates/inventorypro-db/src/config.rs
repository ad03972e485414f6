//! Store configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. The backend is chosen here, once, at startup:
//!
//! ```text
//! REMOTE_STORE_URL set  AND  REMOTE_STORE_KEY set  ──►  Remote (PostgreSQL)
//! anything else                                    ──►  File (JSON document)
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the JSON store document.
pub const DEFAULT_DATA_FILE: &str = "data/inventorypro-db.json";

/// Remote connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// PostgreSQL connection string.
    pub url: String,

    /// Credential for the remote store. Used as the connection password when
    /// the URL does not carry one.
    pub key: String,

    /// Maximum number of pooled connections. Default: 5
    pub max_connections: u32,

    /// Pool acquire timeout. Default: 30 seconds
    pub connect_timeout: Duration,

    /// Call the server-side `process_sale` procedure before falling back to
    /// the client-side transaction. Default: true
    pub use_procedure: bool,

    /// Apply embedded migrations on connect. Default: true
    pub run_migrations: bool,
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        RemoteConfig {
            url: url.into(),
            key: key.into(),
            max_connections: 5,
            connect_timeout: Duration::from_secs(30),
            use_procedure: true,
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets whether the stored procedure is tried first.
    pub fn use_procedure(mut self, enabled: bool) -> Self {
        self.use_procedure = enabled;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }
}

/// Which backend to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Single JSON document on local disk.
    File { path: PathBuf },
    /// PostgreSQL tables `inventory_items` and `sales`.
    Remote(RemoteConfig),
}

impl StoreConfig {
    /// File-backed configuration at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        StoreConfig::File { path: path.into() }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable                       | Default                      |
    /// |--------------------------------|------------------------------|
    /// | `INVENTORYPRO_DATA_FILE`       | `data/inventorypro-db.json`  |
    /// | `REMOTE_STORE_URL`             | unset                        |
    /// | `REMOTE_STORE_KEY`             | unset                        |
    /// | `REMOTE_STORE_MAX_CONNECTIONS` | `5`                          |
    /// | `REMOTE_STORE_USE_PROCEDURE`   | `true`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let (url, key) = match (non_empty("REMOTE_STORE_URL"), non_empty("REMOTE_STORE_KEY")) {
            (Some(url), Some(key)) => (url, key),
            _ => {
                let path = non_empty("INVENTORYPRO_DATA_FILE")
                    .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());
                return Ok(StoreConfig::file(path));
            }
        };

        let max_connections = non_empty("REMOTE_STORE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("REMOTE_STORE_MAX_CONNECTIONS".to_string()))?;

        let use_procedure = non_empty("REMOTE_STORE_USE_PROCEDURE")
            .unwrap_or_else(|| "true".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("REMOTE_STORE_USE_PROCEDURE".to_string()))?;

        Ok(StoreConfig::Remote(
            RemoteConfig::new(url, key)
                .max_connections(max_connections)
                .use_procedure(use_procedure),
        ))
    }

    /// Short backend name for logs.
    pub fn backend_name(&self) -> &'static str {
        match self {
            StoreConfig::File { .. } => "file",
            StoreConfig::Remote(_) => "remote",
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
