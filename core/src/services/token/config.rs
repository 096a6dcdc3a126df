//! Configuration for the token authority

use std::time::Duration;

use kg_shared::config::JwtConfig;

/// Configuration for the token authority
#[derive(Debug, Clone)]
pub struct TokenAuthorityConfig {
    /// HS256 signing secret, read-only after startup
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub access_token_expiry_secs: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_expiry_secs: i64,
    /// Upper bound on a single directory call
    pub directory_timeout: Duration,
}

impl TokenAuthorityConfig {
    /// Builds the authority configuration from the loaded JWT configuration
    pub fn from_jwt_config(jwt: &JwtConfig) -> Self {
        Self {
            jwt_secret: jwt.secret.clone(),
            access_token_expiry_secs: jwt.access_token_expiry,
            refresh_token_expiry_secs: jwt.refresh_token_expiry,
            directory_timeout: Duration::from_millis(jwt.directory_timeout_ms),
        }
    }
}
