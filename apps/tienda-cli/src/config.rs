//! CLI configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use tienda_core::{DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_TOP_PRODUCTS};

const DB_FILE_NAME: &str = "tienda.db";

/// Runtime configuration for the `tienda` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// `low-stock` threshold when `--threshold` is not given
    pub low_stock_threshold: i64,

    /// Size of the top products ranking when `--top` is not given
    pub top_products: i64,

    /// Connection pool size
    pub max_connections: u32,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_path = match lookup("TIENDA_DB_PATH") {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_db_path()?,
        };

        let config = AppConfig {
            db_path,
            low_stock_threshold: parse_or(
                &lookup,
                "TIENDA_LOW_STOCK_THRESHOLD",
                DEFAULT_LOW_STOCK_THRESHOLD,
            )?,
            top_products: parse_or(&lookup, "TIENDA_TOP_PRODUCTS", DEFAULT_TOP_PRODUCTS)?,
            max_connections: parse_or(&lookup, "TIENDA_MAX_CONNECTIONS", 5)?,
        };

        if config.low_stock_threshold < 0 {
            return Err(ConfigError::InvalidValue(
                "TIENDA_LOW_STOCK_THRESHOLD".to_string(),
            ));
        }
        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue("TIENDA_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Platform data directory, created if missing.
///
/// - **Linux**: `~/.local/share/tienda/tienda.db`
/// - **macOS**: `~/Library/Application Support/com.tienda.tienda/tienda.db`
/// - **Windows**: `%APPDATA%\tienda\tienda\data\tienda.db`
fn default_db_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "tienda", "tienda").ok_or(ConfigError::NoDataDir)?;
    let data_dir = dirs.data_dir();

    std::fs::create_dir_all(data_dir)
        .map_err(|e| ConfigError::DataDir(data_dir.to_path_buf(), e))?;

    Ok(data_dir.join(DB_FILE_NAME))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Could not determine the platform data directory; set TIENDA_DB_PATH")]
    NoDataDir,

    #[error("Could not create data directory {0}: {1}")]
    DataDir(PathBuf, #[source] std::io::Error),
}
