//! Configuration error types.
//!
//! Configuration problems are fatal at startup, never per-request, so these
//! errors are only ever produced by the `from_env` constructors.

use thiserror::Error;

/// Errors raised while loading configuration from the environment
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {name}")]
    MissingVariable { name: String },

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },

    #[error("JWT signing secret must be at least {minimum} bytes, got {actual}")]
    SecretTooShort { minimum: usize, actual: usize },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
