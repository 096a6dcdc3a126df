//! Token entities: access-token claims, refresh tokens, and the pair
//! returned to callers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token expiration time (30 minutes)
pub const ACCESS_TOKEN_EXPIRY_SECS: i64 = 1800;

/// Refresh token expiration time (7 days)
pub const REFRESH_TOKEN_EXPIRY_SECS: i64 = 604_800;

/// Number of random bytes in a refresh token value
pub const REFRESH_TOKEN_BYTES: usize = 64;

/// Claims signed into an access token
///
/// The claim set is small and fixed: subject id, display name, issued-at and
/// expiry. Access tokens are self-contained; verification is signature plus
/// expiry, with no server-side lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,

    /// Display name
    pub name: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a new access token
    pub fn new(account_id: Uuid, name: impl Into<String>, lifetime_secs: i64) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::seconds(lifetime_secs);

        Self {
            sub: account_id.to_string(),
            name: name.into(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        }
    }

    /// Checks if the claims have expired
    ///
    /// A token is expired exactly at its expiry instant: `now >= exp` fails.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets the account ID from the subject claim
    pub fn account_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Refresh token: an opaque high-entropy secret with an absolute expiry
///
/// At most one valid token exists per account at any instant; every
/// successful authenticate or rotate replaces it wholesale. The directory
/// stores the pair as-is; the authority compares presented values in
/// constant time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Base64-encoded random token value
    pub value: String,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Creates a refresh token from an already-generated value
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Checks if the refresh token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed JWT access token
    pub access_token: String,

    /// Opaque refresh token value
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_claims() {
        let account_id = Uuid::new_v4();
        let claims = Claims::new(account_id, "alice", ACCESS_TOKEN_EXPIRY_SECS);

        assert_eq!(claims.sub, account_id.to_string());
        assert_eq!(claims.name, "alice");
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_EXPIRY_SECS);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_account_id_parsing() {
        let account_id = Uuid::new_v4();
        let claims = Claims::new(account_id, "alice", ACCESS_TOKEN_EXPIRY_SECS);

        assert_eq!(claims.account_id().unwrap(), account_id);
    }

    #[test]
    fn test_claims_expired_at_boundary() {
        let account_id = Uuid::new_v4();
        let mut claims = Claims::new(account_id, "alice", ACCESS_TOKEN_EXPIRY_SECS);

        // Exactly at expiry counts as expired
        claims.exp = Utc::now().timestamp();
        assert!(claims.is_expired());

        claims.exp = Utc::now().timestamp() + 2;
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_refresh_token_expiration() {
        let live = RefreshToken::new(
            "value",
            Utc::now() + Duration::seconds(REFRESH_TOKEN_EXPIRY_SECS),
        );
        assert!(!live.is_expired());

        let stale = RefreshToken::new("value", Utc::now() - Duration::seconds(1));
        assert!(stale.is_expired());
    }

    #[test]
    fn test_token_pair_serialization() {
        let pair = TokenPair::new(
            "access".to_string(),
            "refresh".to_string(),
            ACCESS_TOKEN_EXPIRY_SECS,
        );

        let json = serde_json::to_string(&pair).unwrap();
        let deserialized: TokenPair = serde_json::from_str(&json).unwrap();

        assert_eq!(pair, deserialized);
    }
}
