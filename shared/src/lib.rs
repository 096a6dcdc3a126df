//! Shared utilities and common types for the Keygate server
//!
//! This crate provides the functionality used across all server modules:
//! - Configuration types (server, database, JWT)
//! - Configuration errors
//! - Wire-level response structures

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AppConfig, DatabaseConfig, JwtConfig, ServerConfig};
pub use errors::ConfigError;
pub use types::ErrorResponse;
