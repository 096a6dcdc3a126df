//! JWT signing and token lifetime configuration.

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};

/// Minimum accepted length for the signing secret, in bytes
pub const MIN_SECRET_BYTES: usize = 32;

fn default_access_expiry() -> i64 {
    1800 // 30 minutes
}

fn default_refresh_expiry() -> i64 {
    604_800 // 7 days
}

fn default_directory_timeout_ms() -> u64 {
    5_000
}

/// JWT authentication configuration
///
/// The signing secret is process-wide, loaded once at startup, and must never
/// be logged or exposed by any endpoint. Its absence is a fatal startup
/// error.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Symmetric secret key for HS256 signing
    pub secret: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_expiry")]
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_expiry")]
    pub refresh_token_expiry: i64,

    /// Upper bound on a single user-directory call, in milliseconds
    #[serde(default = "default_directory_timeout_ms")]
    pub directory_timeout_ms: u64,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret
    pub fn new(secret: impl Into<String>) -> ConfigResult<Self> {
        let config = Self {
            secret: secret.into(),
            access_token_expiry: default_access_expiry(),
            refresh_token_expiry: default_refresh_expiry(),
            directory_timeout_ms: default_directory_timeout_ms(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Set access token expiry in seconds
    pub fn with_access_expiry_secs(mut self, seconds: i64) -> Self {
        self.access_token_expiry = seconds;
        self
    }

    /// Set refresh token expiry in seconds
    pub fn with_refresh_expiry_secs(mut self, seconds: i64) -> Self {
        self.refresh_token_expiry = seconds;
        self
    }

    /// Load from environment variables
    ///
    /// `KEYGATE_JWT_SECRET` is required; lifetimes fall back to the defaults
    /// (30 minute access tokens, 7 day refresh tokens).
    pub fn from_env() -> ConfigResult<Self> {
        let secret = std::env::var("KEYGATE_JWT_SECRET").map_err(|_| {
            ConfigError::MissingVariable {
                name: "KEYGATE_JWT_SECRET".to_string(),
            }
        })?;

        let config = Self {
            secret,
            access_token_expiry: parse_env_i64(
                "KEYGATE_ACCESS_TOKEN_EXPIRY_SECS",
                default_access_expiry(),
            )?,
            refresh_token_expiry: parse_env_i64(
                "KEYGATE_REFRESH_TOKEN_EXPIRY_SECS",
                default_refresh_expiry(),
            )?,
            directory_timeout_ms: parse_env_u64(
                "KEYGATE_DIRECTORY_TIMEOUT_MS",
                default_directory_timeout_ms(),
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::SecretTooShort {
                minimum: MIN_SECRET_BYTES,
                actual: self.secret.len(),
            });
        }
        if self.access_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue {
                name: "KEYGATE_ACCESS_TOKEN_EXPIRY_SECS".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.refresh_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue {
                name: "KEYGATE_REFRESH_TOKEN_EXPIRY_SECS".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_env_i64(name: &str, default: i64) -> ConfigResult<i64> {
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("'{value}' is not a valid integer"),
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_u64(name: &str, default: u64) -> ConfigResult<u64> {
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("'{value}' is not a valid integer"),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_defaults() {
        let config = JwtConfig::new("0123456789abcdef0123456789abcdef").unwrap();
        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 604_800);
        assert_eq!(config.directory_timeout_ms, 5_000);
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("0123456789abcdef0123456789abcdef")
            .unwrap()
            .with_access_expiry_secs(900)
            .with_refresh_expiry_secs(86_400);

        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 86_400);
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = JwtConfig::new("too-short");
        assert!(matches!(result, Err(ConfigError::SecretTooShort { .. })));
    }
}
