//! MySQL implementation of the UserDirectory trait.
//!
//! Backed by a single `accounts` table:
//!
//! ```sql
//! CREATE TABLE accounts (
//!     id                       CHAR(36)     PRIMARY KEY,
//!     username                 VARCHAR(64)  NOT NULL UNIQUE,
//!     password_hash            VARCHAR(100) NOT NULL,
//!     refresh_token            VARCHAR(128) CHARACTER SET ascii COLLATE ascii_bin NULL,
//!     refresh_token_expires_at DATETIME(6)  NULL
//! );
//! ```
//!
//! `refresh_token` carries base64 values, which are case-sensitive; the binary
//! collation keeps the conditional UPDATE's `WHERE refresh_token = ?` byte-exact
//! instead of collation-folded.
//!
//! Rotation safety comes from the conditional UPDATE in
//! [`swap_refresh_token`](MySqlUserDirectory::swap_refresh_token): the WHERE
//! clause keys on the prior token value, so of any set of concurrent swaps the
//! database commits exactly one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use tracing::{debug, error};
use uuid::Uuid;

use kg_core::directory::{CredentialCheck, DirectoryError, UserDirectory};
use kg_core::domain::entities::account::AccountIdentity;
use kg_core::domain::entities::token::RefreshToken;

/// MySQL-backed user directory
pub struct MySqlUserDirectory {
    pool: MySqlPool,
}

impl MySqlUserDirectory {
    /// Create a new MySQL user directory
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_identity(row: &sqlx::mysql::MySqlRow) -> Result<AccountIdentity, DirectoryError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DirectoryError::unavailable(format!("failed to read id: {e}")))?;
        let username: String = row
            .try_get("username")
            .map_err(|e| DirectoryError::unavailable(format!("failed to read username: {e}")))?;

        Ok(AccountIdentity::new(
            Uuid::parse_str(&id)
                .map_err(|e| DirectoryError::unavailable(format!("invalid account UUID: {e}")))?,
            username,
        ))
    }
}

#[async_trait]
impl UserDirectory for MySqlUserDirectory {
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CredentialCheck, DirectoryError> {
        let row = sqlx::query("SELECT id, username, password_hash FROM accounts WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Credential lookup query failed");
                DirectoryError::unavailable(format!("credential lookup failed: {e}"))
            })?;

        let row = match row {
            Some(row) => row,
            None => return Ok(CredentialCheck::NotFound),
        };

        let password_hash: String = row
            .try_get("password_hash")
            .map_err(|e| DirectoryError::unavailable(format!("failed to read hash: {e}")))?;

        let matches = bcrypt::verify(password, &password_hash).map_err(|e| {
            error!(error = %e, "Password hash verification failed");
            DirectoryError::unavailable(format!("bcrypt verify failed: {e}"))
        })?;

        if !matches {
            return Ok(CredentialCheck::BadPassword);
        }

        Ok(CredentialCheck::Verified(Self::row_to_identity(&row)?))
    }

    async fn find_account(
        &self,
        username: &str,
    ) -> Result<Option<AccountIdentity>, DirectoryError> {
        let row = sqlx::query("SELECT id, username FROM accounts WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Account lookup query failed");
                DirectoryError::unavailable(format!("account lookup failed: {e}"))
            })?;

        row.map(|row| Self::row_to_identity(&row)).transpose()
    }

    async fn refresh_token(
        &self,
        account_id: Uuid,
    ) -> Result<Option<RefreshToken>, DirectoryError> {
        let row = sqlx::query(
            "SELECT refresh_token, refresh_token_expires_at FROM accounts WHERE id = ?",
        )
        .bind(account_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(account_id = %account_id, error = %e, "Refresh token lookup failed");
            DirectoryError::unavailable(format!("token lookup failed: {e}"))
        })?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let value: Option<String> = row
            .try_get("refresh_token")
            .map_err(|e| DirectoryError::unavailable(format!("failed to read token: {e}")))?;
        let expires_at: Option<DateTime<Utc>> = row
            .try_get("refresh_token_expires_at")
            .map_err(|e| DirectoryError::unavailable(format!("failed to read expiry: {e}")))?;

        Ok(match (value, expires_at) {
            (Some(value), Some(expires_at)) => Some(RefreshToken::new(value, expires_at)),
            _ => None,
        })
    }

    async fn store_refresh_token(
        &self,
        account_id: Uuid,
        token: RefreshToken,
    ) -> Result<(), DirectoryError> {
        let result = sqlx::query(
            "UPDATE accounts SET refresh_token = ?, refresh_token_expires_at = ? WHERE id = ?",
        )
        .bind(&token.value)
        .bind(token.expires_at)
        .bind(account_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(account_id = %account_id, error = %e, "Refresh token store failed");
            DirectoryError::unavailable(format!("token store failed: {e}"))
        })?;

        if result.rows_affected() == 0 {
            error!(account_id = %account_id, "No account row matched on token store");
            return Err(DirectoryError::unavailable("account not found on store"));
        }

        debug!(account_id = %account_id, "Stored refresh token");
        Ok(())
    }

    async fn swap_refresh_token(
        &self,
        account_id: Uuid,
        prior_value: &str,
        token: RefreshToken,
    ) -> Result<bool, DirectoryError> {
        // Single conditional UPDATE: the row is only touched while it still
        // holds the prior value, so concurrent swaps get one winner.
        let result = sqlx::query(
            "UPDATE accounts SET refresh_token = ?, refresh_token_expires_at = ? \
             WHERE id = ? AND refresh_token = ?",
        )
        .bind(&token.value)
        .bind(token.expires_at)
        .bind(account_id.to_string())
        .bind(prior_value)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(account_id = %account_id, error = %e, "Refresh token swap failed");
            DirectoryError::unavailable(format!("token swap failed: {e}"))
        })?;

        let swapped = result.rows_affected() == 1;
        debug!(account_id = %account_id, swapped, "Conditional refresh token swap");
        Ok(swapped)
    }

    async fn clear_refresh_token(&self, account_id: Uuid) -> Result<bool, DirectoryError> {
        let result = sqlx::query(
            "UPDATE accounts SET refresh_token = NULL, refresh_token_expires_at = NULL \
             WHERE id = ? AND refresh_token IS NOT NULL",
        )
        .bind(account_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(account_id = %account_id, error = %e, "Refresh token clear failed");
            DirectoryError::unavailable(format!("token clear failed: {e}"))
        })?;

        let cleared = result.rows_affected() == 1;
        debug!(account_id = %account_id, cleared, "Cleared refresh token");
        Ok(cleared)
    }
}
