//! In-memory user directory for tests and local runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use kg_core::directory::{CredentialCheck, DirectoryError, UserDirectory};
use kg_core::domain::entities::account::AccountIdentity;
use kg_core::domain::entities::token::RefreshToken;

struct AccountRecord {
    identity: AccountIdentity,
    password_hash: String,
    refresh_token: Option<RefreshToken>,
}

/// In-memory directory backed by a `RwLock`-guarded map
///
/// Passwords are bcrypt-hashed on insertion so the verification path matches
/// the MySQL implementation. All token writes happen under one write lock,
/// which gives the per-account serialization the directory contract requires.
pub struct MemoryUserDirectory {
    accounts: Arc<RwLock<HashMap<String, AccountRecord>>>,
}

impl MemoryUserDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Seed an account, returning its identity
    pub async fn add_account(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AccountIdentity, DirectoryError> {
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| DirectoryError::unavailable(format!("bcrypt hash failed: {e}")))?;

        let identity = AccountIdentity::new(Uuid::new_v4(), username);
        let mut accounts = self.accounts.write().await;
        accounts.insert(
            username.to_string(),
            AccountRecord {
                identity: identity.clone(),
                password_hash,
                refresh_token: None,
            },
        );
        Ok(identity)
    }
}

impl Default for MemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CredentialCheck, DirectoryError> {
        let accounts = self.accounts.read().await;
        let record = match accounts.get(username) {
            Some(record) => record,
            None => return Ok(CredentialCheck::NotFound),
        };

        let matches = bcrypt::verify(password, &record.password_hash)
            .map_err(|e| DirectoryError::unavailable(format!("bcrypt verify failed: {e}")))?;

        Ok(if matches {
            CredentialCheck::Verified(record.identity.clone())
        } else {
            CredentialCheck::BadPassword
        })
    }

    async fn find_account(
        &self,
        username: &str,
    ) -> Result<Option<AccountIdentity>, DirectoryError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(username).map(|r| r.identity.clone()))
    }

    async fn refresh_token(
        &self,
        account_id: Uuid,
    ) -> Result<Option<RefreshToken>, DirectoryError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|r| r.identity.id == account_id)
            .and_then(|r| r.refresh_token.clone()))
    }

    async fn store_refresh_token(
        &self,
        account_id: Uuid,
        token: RefreshToken,
    ) -> Result<(), DirectoryError> {
        let mut accounts = self.accounts.write().await;
        let record = accounts
            .values_mut()
            .find(|r| r.identity.id == account_id)
            .ok_or_else(|| DirectoryError::unavailable("account disappeared"))?;
        record.refresh_token = Some(token);
        Ok(())
    }

    async fn swap_refresh_token(
        &self,
        account_id: Uuid,
        prior_value: &str,
        token: RefreshToken,
    ) -> Result<bool, DirectoryError> {
        // Compare and replace under the write lock: one winner per prior value.
        let mut accounts = self.accounts.write().await;
        let record = match accounts.values_mut().find(|r| r.identity.id == account_id) {
            Some(record) => record,
            None => return Ok(false),
        };

        match &record.refresh_token {
            Some(stored) if stored.value == prior_value => {
                record.refresh_token = Some(token);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn clear_refresh_token(&self, account_id: Uuid) -> Result<bool, DirectoryError> {
        let mut accounts = self.accounts.write().await;
        let record = match accounts.values_mut().find(|r| r.identity.id == account_id) {
            Some(record) => record,
            None => return Ok(false),
        };
        Ok(record.refresh_token.take().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn token(value: &str) -> RefreshToken {
        RefreshToken::new(value, Utc::now() + Duration::days(7))
    }

    #[tokio::test]
    async fn verify_credentials_outcomes() {
        let directory = MemoryUserDirectory::new();
        let alice = directory.add_account("alice", "secret").await.unwrap();

        match directory.verify_credentials("alice", "secret").await.unwrap() {
            CredentialCheck::Verified(identity) => assert_eq!(identity.id, alice.id),
            other => panic!("expected Verified, got {other:?}"),
        }
        assert_eq!(
            directory.verify_credentials("alice", "wrong").await.unwrap(),
            CredentialCheck::BadPassword
        );
        assert_eq!(
            directory.verify_credentials("bob", "secret").await.unwrap(),
            CredentialCheck::NotFound
        );
    }

    #[tokio::test]
    async fn swap_requires_matching_prior_value() {
        let directory = MemoryUserDirectory::new();
        let alice = directory.add_account("alice", "secret").await.unwrap();

        directory
            .store_refresh_token(alice.id, token("first"))
            .await
            .unwrap();

        // Wrong prior value: no replacement
        assert!(!directory
            .swap_refresh_token(alice.id, "not-first", token("second"))
            .await
            .unwrap());

        // Matching is byte-exact: a case-folded prior value must not win
        assert!(!directory
            .swap_refresh_token(alice.id, "FIRST", token("second"))
            .await
            .unwrap());

        // Matching prior value: replaced
        assert!(directory
            .swap_refresh_token(alice.id, "first", token("second"))
            .await
            .unwrap());

        // The old value was consumed by the swap above
        assert!(!directory
            .swap_refresh_token(alice.id, "first", token("third"))
            .await
            .unwrap());

        let stored = directory.refresh_token(alice.id).await.unwrap().unwrap();
        assert_eq!(stored.value, "second");
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let directory = MemoryUserDirectory::new();
        let alice = directory.add_account("alice", "secret").await.unwrap();

        directory
            .store_refresh_token(alice.id, token("value"))
            .await
            .unwrap();

        assert!(directory.clear_refresh_token(alice.id).await.unwrap());
        assert!(!directory.clear_refresh_token(alice.id).await.unwrap());
        assert!(directory.refresh_token(alice.id).await.unwrap().is_none());
    }
}
