//! Token authority implementation.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{Duration, Utc};
use constant_time_eq::constant_time_eq;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use std::future::Future;
use uuid::Uuid;

use crate::directory::{CredentialCheck, DirectoryError, UserDirectory};
use crate::domain::entities::account::AccountIdentity;
use crate::domain::entities::token::{Claims, RefreshToken, TokenPair, REFRESH_TOKEN_BYTES};
use crate::errors::{AuthError, AuthResult, TokenError};

use super::config::TokenAuthorityConfig;

/// Issues and rotates token pairs against a user directory
///
/// Access tokens are signed, self-contained, and verified statelessly.
/// Refresh tokens are opaque single-use secrets; the directory holds at most
/// one per account, and rotation commits through an atomic compare-and-swap
/// so that concurrent rotations of the same token yield exactly one winner.
pub struct TokenAuthority<D: UserDirectory> {
    directory: D,
    config: TokenAuthorityConfig,
    encoding_key: EncodingKey,
}

impl<D: UserDirectory> TokenAuthority<D> {
    /// Creates a new token authority
    pub fn new(directory: D, config: TokenAuthorityConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        Self {
            directory,
            config,
            encoding_key,
        }
    }

    /// Authenticates a username/password pair and issues a fresh token pair
    ///
    /// Unknown usernames and wrong passwords surface identically as
    /// [`AuthError::InvalidCredentials`]. On success the new refresh token
    /// overwrites whatever the directory held before; if persistence fails,
    /// no tokens are returned.
    pub async fn authenticate(&self, username: &str, password: &str) -> AuthResult<TokenPair> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let check = self
            .directory_call(self.directory.verify_credentials(username, password))
            .await?;

        let account = match check {
            CredentialCheck::Verified(account) => account,
            CredentialCheck::NotFound | CredentialCheck::BadPassword => {
                tracing::debug!(username, "credential verification failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let access_token = self.mint_access_token(&account)?;
        let refresh_token = self.mint_refresh_token();

        // Persisting the refresh token is the last step; any failure here
        // leaves the prior stored token untouched and returns nothing.
        self.directory_call(
            self.directory
                .store_refresh_token(account.id, refresh_token.clone()),
        )
        .await?;

        tracing::debug!(account_id = %account.id, "issued token pair");
        Ok(TokenPair::new(
            access_token,
            refresh_token.value,
            self.config.access_token_expiry_secs,
        ))
    }

    /// Exchanges a valid refresh token for a new token pair
    ///
    /// The presented token is consumed the instant the swap commits, even if
    /// the caller never receives the response; replaying it afterwards fails.
    /// Every failure mode -- unknown user, absent, mismatched, or expired
    /// token, lost rotation race -- surfaces as the same
    /// [`AuthError::InvalidCredentials`].
    pub async fn rotate(&self, username: &str, presented: &str) -> AuthResult<TokenPair> {
        if username.is_empty() || presented.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let account = self
            .directory_call(self.directory.find_account(username))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let stored = self
            .directory_call(self.directory.refresh_token(account.id))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !constant_time_eq(stored.value.as_bytes(), presented.as_bytes()) {
            tracing::debug!(account_id = %account.id, "presented refresh token does not match");
            return Err(AuthError::InvalidCredentials);
        }

        if stored.is_expired() {
            tracing::debug!(account_id = %account.id, "refresh token expired");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.mint_access_token(&account)?;
        let refresh_token = self.mint_refresh_token();

        // The swap is keyed on the presented value: if a concurrent rotation
        // already replaced it, this commit loses and the call fails without
        // issuing anything.
        let swapped = self
            .directory_call(self.directory.swap_refresh_token(
                account.id,
                presented,
                refresh_token.clone(),
            ))
            .await?;

        if !swapped {
            tracing::debug!(account_id = %account.id, "lost rotation race, token already consumed");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::debug!(account_id = %account.id, "rotated token pair");
        Ok(TokenPair::new(
            access_token,
            refresh_token.value,
            self.config.access_token_expiry_secs,
        ))
    }

    /// Clears the account's stored refresh token, forcing re-authentication
    ///
    /// Idempotent: revoking an account with no stored token still succeeds.
    pub async fn revoke(&self, account_id: Uuid) -> AuthResult<()> {
        let cleared = self
            .directory_call(self.directory.clear_refresh_token(account_id))
            .await?;
        tracing::debug!(account_id = %account_id, cleared, "revoked refresh token");
        Ok(())
    }

    /// Verifies an access token and returns its claims
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        verify_access_token(&self.config.jwt_secret, token)
    }

    /// Signs the fixed claim set for an account
    fn mint_access_token(&self, account: &AccountIdentity) -> AuthResult<String> {
        let claims = Claims::new(
            account.id,
            &account.username,
            self.config.access_token_expiry_secs,
        );
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "access token signing failed");
            AuthError::TokenGeneration
        })
    }

    /// Generates a fresh opaque refresh token
    fn mint_refresh_token(&self) -> RefreshToken {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);

        RefreshToken::new(
            BASE64.encode(bytes),
            Utc::now() + Duration::seconds(self.config.refresh_token_expiry_secs),
        )
    }

    /// Runs a directory call under the configured timeout
    async fn directory_call<T, F>(&self, fut: F) -> AuthResult<T>
    where
        F: Future<Output = Result<T, DirectoryError>>,
    {
        match tokio::time::timeout(self.config.directory_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "user directory call failed");
                Err(AuthError::DirectoryUnavailable)
            }
            Err(_) => {
                tracing::warn!("user directory call timed out");
                Err(AuthError::DirectoryUnavailable)
            }
        }
    }
}

/// Verifies an access token against the signing secret
///
/// Stateless: signature check plus expiry, no directory lookup. Validation
/// runs with zero leeway, and a token is rejected exactly at its expiry
/// instant (jsonwebtoken alone admits `exp == now`, so the boundary is
/// checked explicitly).
pub fn verify_access_token(secret: &str, token: &str) -> Result<Claims, TokenError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        if e.kind() == &jsonwebtoken::errors::ErrorKind::ExpiredSignature {
            TokenError::Expired
        } else {
            TokenError::Invalid
        }
    })?;

    if token_data.claims.is_expired() {
        return Err(TokenError::Expired);
    }

    Ok(token_data.claims)
}
