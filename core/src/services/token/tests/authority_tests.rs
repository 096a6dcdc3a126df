//! Unit tests for the token authority

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::directory::{CredentialCheck, DirectoryError, UserDirectory};
use crate::domain::entities::account::AccountIdentity;
use crate::domain::entities::token::RefreshToken;
use crate::errors::{AuthError, TokenError};
use crate::services::token::{TokenAuthority, TokenAuthorityConfig};

const TEST_SECRET: &str = "unit-test-signing-secret-0123456789abcdef";

/// In-memory directory with injectable failures for testing
struct MockDirectory {
    accounts: Mutex<HashMap<String, (AccountIdentity, String)>>,
    tokens: Mutex<HashMap<Uuid, RefreshToken>>,
    fail_writes: AtomicBool,
    delay: Option<StdDuration>,
}

impl MockDirectory {
    fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            tokens: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
            delay: None,
        }
    }

    fn with_delay(delay: StdDuration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    fn add_account(&self, username: &str, password: &str) -> AccountIdentity {
        let account = AccountIdentity::new(Uuid::new_v4(), username);
        self.accounts.lock().unwrap().insert(
            username.to_string(),
            (account.clone(), password.to_string()),
        );
        account
    }

    fn set_stored_token(&self, account_id: Uuid, token: RefreshToken) {
        self.tokens.lock().unwrap().insert(account_id, token);
    }

    fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    async fn maybe_delay(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl UserDirectory for MockDirectory {
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CredentialCheck, DirectoryError> {
        self.maybe_delay().await;
        let accounts = self.accounts.lock().unwrap();
        Ok(match accounts.get(username) {
            Some((account, stored)) if stored == password => {
                CredentialCheck::Verified(account.clone())
            }
            Some(_) => CredentialCheck::BadPassword,
            None => CredentialCheck::NotFound,
        })
    }

    async fn find_account(
        &self,
        username: &str,
    ) -> Result<Option<AccountIdentity>, DirectoryError> {
        self.maybe_delay().await;
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.get(username).map(|(account, _)| account.clone()))
    }

    async fn refresh_token(
        &self,
        account_id: Uuid,
    ) -> Result<Option<RefreshToken>, DirectoryError> {
        Ok(self.tokens.lock().unwrap().get(&account_id).cloned())
    }

    async fn store_refresh_token(
        &self,
        account_id: Uuid,
        token: RefreshToken,
    ) -> Result<(), DirectoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DirectoryError::unavailable("injected write failure"));
        }
        self.tokens.lock().unwrap().insert(account_id, token);
        Ok(())
    }

    async fn swap_refresh_token(
        &self,
        account_id: Uuid,
        prior_value: &str,
        token: RefreshToken,
    ) -> Result<bool, DirectoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DirectoryError::unavailable("injected write failure"));
        }
        // Compare and replace under one lock so concurrent swaps have
        // exactly one winner.
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.get(&account_id) {
            Some(stored) if stored.value == prior_value => {
                tokens.insert(account_id, token);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn clear_refresh_token(&self, account_id: Uuid) -> Result<bool, DirectoryError> {
        Ok(self.tokens.lock().unwrap().remove(&account_id).is_some())
    }
}

fn test_config() -> TokenAuthorityConfig {
    TokenAuthorityConfig {
        jwt_secret: TEST_SECRET.to_string(),
        access_token_expiry_secs: 1800,
        refresh_token_expiry_secs: 604_800,
        directory_timeout: StdDuration::from_secs(5),
    }
}

fn authority_with_alice() -> (TokenAuthority<MockDirectory>, AccountIdentity) {
    let directory = MockDirectory::new();
    let alice = directory.add_account("alice", "correct");
    (TokenAuthority::new(directory, test_config()), alice)
}

#[tokio::test]
async fn authenticate_issues_verifiable_pair() {
    let (authority, alice) = authority_with_alice();

    let pair = authority.authenticate("alice", "correct").await.unwrap();

    let claims = authority.verify_access_token(&pair.access_token).unwrap();
    assert_eq!(claims.account_id().unwrap(), alice.id);
    assert_eq!(claims.name, "alice");
    assert_eq!(pair.expires_in, 1800);
    assert!(!pair.refresh_token.is_empty());
}

#[tokio::test]
async fn unknown_user_and_wrong_password_are_indistinguishable() {
    let (authority, _) = authority_with_alice();

    let unknown = authority.authenticate("nobody", "whatever").await;
    let wrong = authority.authenticate("alice", "incorrect").await;

    assert_eq!(unknown.unwrap_err(), AuthError::InvalidCredentials);
    assert_eq!(wrong.unwrap_err(), AuthError::InvalidCredentials);
}

#[tokio::test]
async fn empty_credentials_are_rejected() {
    let (authority, _) = authority_with_alice();

    assert_eq!(
        authority.authenticate("", "password").await.unwrap_err(),
        AuthError::InvalidCredentials
    );
    assert_eq!(
        authority.authenticate("alice", "").await.unwrap_err(),
        AuthError::InvalidCredentials
    );
}

#[tokio::test]
async fn rotation_replaces_the_refresh_token() {
    let (authority, alice) = authority_with_alice();

    let first = authority.authenticate("alice", "correct").await.unwrap();
    let second = authority
        .rotate("alice", &first.refresh_token)
        .await
        .unwrap();

    assert_ne!(second.refresh_token, first.refresh_token);
    let claims = authority.verify_access_token(&second.access_token).unwrap();
    assert_eq!(claims.account_id().unwrap(), alice.id);
}

#[tokio::test]
async fn consumed_refresh_token_cannot_be_replayed() {
    let (authority, _) = authority_with_alice();

    let first = authority.authenticate("alice", "correct").await.unwrap();
    let second = authority
        .rotate("alice", &first.refresh_token)
        .await
        .unwrap();

    // The old token was consumed by the rotation above
    let replay = authority.rotate("alice", &first.refresh_token).await;
    assert_eq!(replay.unwrap_err(), AuthError::InvalidCredentials);

    // The replacement still works
    assert!(authority.rotate("alice", &second.refresh_token).await.is_ok());
}

#[tokio::test]
async fn concurrent_rotations_have_one_winner() {
    let (authority, _) = authority_with_alice();
    let pair = authority.authenticate("alice", "correct").await.unwrap();

    let (a, b) = tokio::join!(
        authority.rotate("alice", &pair.refresh_token),
        authority.rotate("alice", &pair.refresh_token),
    );

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert!(successes <= 1, "both concurrent rotations succeeded");
    for result in [a, b] {
        if let Err(e) = result {
            assert_eq!(e, AuthError::InvalidCredentials);
        }
    }
}

#[tokio::test]
async fn expired_refresh_token_is_rejected() {
    let directory = MockDirectory::new();
    let alice = directory.add_account("alice", "correct");
    directory.set_stored_token(
        alice.id,
        RefreshToken::new("stale-token", Utc::now() - Duration::days(1)),
    );
    let authority = TokenAuthority::new(directory, test_config());

    let result = authority.rotate("alice", "stale-token").await;
    assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
}

#[tokio::test]
async fn mismatched_refresh_token_is_rejected() {
    let (authority, _) = authority_with_alice();
    authority.authenticate("alice", "correct").await.unwrap();

    let result = authority.rotate("alice", "not-the-stored-value").await;
    assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
}

#[tokio::test]
async fn rotate_for_unknown_user_is_rejected() {
    let (authority, _) = authority_with_alice();

    let result = authority.rotate("nobody", "any-token").await;
    assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
}

#[tokio::test]
async fn persistence_failure_returns_no_tokens() {
    let directory = MockDirectory::new();
    directory.add_account("alice", "correct");
    directory.fail_writes();
    let authority = TokenAuthority::new(directory, test_config());

    let result = authority.authenticate("alice", "correct").await;
    assert_eq!(result.unwrap_err(), AuthError::DirectoryUnavailable);
}

#[tokio::test]
async fn slow_directory_reports_unavailable() {
    let directory = MockDirectory::with_delay(StdDuration::from_millis(200));
    directory.add_account("alice", "correct");

    let mut config = test_config();
    config.directory_timeout = StdDuration::from_millis(20);
    let authority = TokenAuthority::new(directory, config);

    let result = authority.authenticate("alice", "correct").await;
    assert_eq!(result.unwrap_err(), AuthError::DirectoryUnavailable);
}

#[tokio::test]
async fn revoke_forces_reauthentication() {
    let (authority, alice) = authority_with_alice();
    let pair = authority.authenticate("alice", "correct").await.unwrap();

    authority.revoke(alice.id).await.unwrap();

    let result = authority.rotate("alice", &pair.refresh_token).await;
    assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);

    // Revoking again is still a success
    authority.revoke(alice.id).await.unwrap();
}

#[tokio::test]
async fn access_token_expiry_boundary() {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    use crate::domain::entities::token::Claims;
    use crate::services::token::verify_access_token;

    let account_id = Uuid::new_v4();
    let key = EncodingKey::from_secret(TEST_SECRET.as_bytes());

    // Before expiry: valid
    let mut claims = Claims::new(account_id, "alice", 30);
    let token = encode(&Header::new(Algorithm::HS256), &claims, &key).unwrap();
    assert!(verify_access_token(TEST_SECRET, &token).is_ok());

    // Exactly at expiry: rejected
    claims.exp = Utc::now().timestamp();
    let token = encode(&Header::new(Algorithm::HS256), &claims, &key).unwrap();
    assert_eq!(
        verify_access_token(TEST_SECRET, &token).unwrap_err(),
        TokenError::Expired
    );

    // One second past expiry: rejected
    claims.exp = Utc::now().timestamp() - 1;
    let token = encode(&Header::new(Algorithm::HS256), &claims, &key).unwrap();
    assert_eq!(
        verify_access_token(TEST_SECRET, &token).unwrap_err(),
        TokenError::Expired
    );
}

#[tokio::test]
async fn tampered_signature_is_rejected() {
    let (authority, _) = authority_with_alice();
    let pair = authority.authenticate("alice", "correct").await.unwrap();

    // Flip one character in the signature segment
    let mut tampered = pair.access_token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    assert_eq!(
        authority.verify_access_token(&tampered).unwrap_err(),
        TokenError::Invalid
    );
}

#[tokio::test]
async fn wrong_secret_is_rejected() {
    let (authority, _) = authority_with_alice();
    let pair = authority.authenticate("alice", "correct").await.unwrap();

    use crate::services::token::verify_access_token;
    let result = verify_access_token("another-signing-secret-0123456789abcdef", &pair.access_token);
    assert_eq!(result.unwrap_err(), TokenError::Invalid);
}
