//! Environment-backed configuration for the database layer.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_DB_PATH: &str = "pinboard.db";
const DEFAULT_POOL_SIZE: u32 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for PINBOARD_DB_POOL_SIZE: {0}")]
    InvalidPoolSize(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the SQLite database file; created on first open.
    pub database_path: PathBuf,
    /// Upper bound on concurrently checked-out connections. Default: 10
    pub max_connections: u32,
}

impl Config {
    /// Reads configuration from the environment, loading `.env` first if
    /// one is present. A single `PINBOARD_DB_PATH` names the database.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_path = env::var("PINBOARD_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH));

        let max_connections = match env::var("PINBOARD_DB_POOL_SIZE") {
            Ok(val) => val
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidPoolSize(val))?,
            Err(_) => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            database_path,
            max_connections,
        })
    }
}
