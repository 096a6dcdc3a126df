//! Configuration module with business-specific sub-modules
//!
//! Configuration is sourced from the process environment at startup. A
//! missing or invalid required value is a fatal [`ConfigError`], not a
//! runtime condition.

pub mod auth;
pub mod database;
pub mod server;

use crate::errors::ConfigResult;

// Re-export commonly used types
pub use auth::JwtConfig;
pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT signing configuration
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load the full configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
        })
    }
}
