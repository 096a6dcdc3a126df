//! Database connection configuration module

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout() -> u64 {
    10
}

/// Database connection and pool configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl DatabaseConfig {
    /// Create a new database configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
        }
    }

    /// Set the maximum pool size
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Load from `DATABASE_URL` and pool-sizing environment variables
    pub fn from_env() -> ConfigResult<Self> {
        let url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVariable {
            name: "DATABASE_URL".to_string(),
        })?;

        let max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "DATABASE_MAX_CONNECTIONS".to_string(),
                reason: format!("'{value}' is not a valid integer"),
            })?,
            Err(_) => default_max_connections(),
        };

        Ok(Self {
            url,
            max_connections,
            connect_timeout: default_connect_timeout(),
        })
    }
}
