//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults; there is deliberately no config file.

use std::env;
use thiserror::Error;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port.
    pub http_port: u16,

    /// Path to the SQLite database file.
    pub database_path: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable        | Default      |
    /// |-----------------|--------------|
    /// | `HTTP_PORT`     | `3000`       |
    /// | `DATABASE_PATH` | `./fiado.db` |
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "./fiado.db".to_string()),
        };

        Ok(config)
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}")]
    InvalidValue(String),
}
