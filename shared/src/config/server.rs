//! HTTP server configuration module

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
            workers: 0,
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Load from `SERVER_HOST` / `SERVER_PORT` / `SERVER_WORKERS` environment
    /// variables
    pub fn from_env() -> ConfigResult<Self> {
        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("SERVER_PORT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "SERVER_PORT".to_string(),
                reason: format!("'{value}' is not a valid port number"),
            })?,
            Err(_) => 8080,
        };
        let workers = match std::env::var("SERVER_WORKERS") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "SERVER_WORKERS".to_string(),
                reason: format!("'{value}' is not a valid worker count"),
            })?,
            Err(_) => 0,
        };

        Ok(Self {
            host,
            port,
            workers,
        })
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = ServerConfig::new("127.0.0.1", 9090);
        assert_eq!(config.bind_address(), "127.0.0.1:9090");
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.workers, 0);
    }

    #[test]
    fn test_workers_from_env() {
        std::env::set_var("SERVER_WORKERS", "4");
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.workers, 4);

        std::env::set_var("SERVER_WORKERS", "many");
        assert!(ServerConfig::from_env().is_err());

        std::env::remove_var("SERVER_WORKERS");
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.workers, 0);
    }
}
