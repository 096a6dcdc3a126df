//! User directory interface consumed by the token authority.
//!
//! The directory is the account-of-record store: it verifies credentials and
//! owns the single stored refresh token per account. Any backing store
//! (relational table, key-value store, in-memory map) satisfies this trait,
//! provided token replacement is atomic per account.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::account::AccountIdentity;
use crate::domain::entities::token::RefreshToken;

/// Outcome of a credential check
///
/// `NotFound` and `BadPassword` are kept distinct here so implementations can
/// log precisely; the token authority collapses both into the same
/// caller-visible failure to prevent username enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialCheck {
    /// Credentials verified; the account identity is returned
    Verified(AccountIdentity),
    /// No account with the given username
    NotFound,
    /// Account exists but the password did not match
    BadPassword,
}

/// Errors raised by directory implementations
///
/// Every directory failure is surfaced to token-authority callers as a
/// retryable unavailability, never as a credential failure.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("User directory unavailable: {message}")]
    Unavailable { message: String },
}

impl DirectoryError {
    /// Creates an unavailability error from any backend failure
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Account-of-record store consumed by the token authority
///
/// # Concurrency
///
/// The stored refresh token is the only mutable shared resource. Writes must
/// be serialized per account, and [`swap_refresh_token`] must be an atomic
/// compare-and-swap: of any set of concurrent swaps keyed on the same prior
/// value, at most one may succeed.
///
/// [`swap_refresh_token`]: UserDirectory::swap_refresh_token
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Verify a username/password pair
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CredentialCheck, DirectoryError>;

    /// Look up an account by username
    async fn find_account(
        &self,
        username: &str,
    ) -> Result<Option<AccountIdentity>, DirectoryError>;

    /// Fetch the currently stored refresh token for an account, if any
    async fn refresh_token(
        &self,
        account_id: Uuid,
    ) -> Result<Option<RefreshToken>, DirectoryError>;

    /// Store a refresh token, unconditionally overwriting any prior value
    ///
    /// Used on the authenticate path, where the caller has just proven
    /// possession of the account's password.
    async fn store_refresh_token(
        &self,
        account_id: Uuid,
        token: RefreshToken,
    ) -> Result<(), DirectoryError>;

    /// Atomically replace the stored refresh token, keyed on the prior value
    ///
    /// Returns `Ok(false)` when the stored value no longer equals
    /// `prior_value` (a concurrent rotation won, or the token was revoked).
    /// The swap and the comparison must happen in one atomic step; this is
    /// the rotation commit primitive.
    async fn swap_refresh_token(
        &self,
        account_id: Uuid,
        prior_value: &str,
        token: RefreshToken,
    ) -> Result<bool, DirectoryError>;

    /// Clear the stored refresh token, forcing re-authentication
    ///
    /// Returns `Ok(false)` if nothing was stored.
    async fn clear_refresh_token(&self, account_id: Uuid) -> Result<bool, DirectoryError>;
}
