//! Domain-specific error types.

use thiserror::Error;

/// Authentication and rotation errors
///
/// `InvalidCredentials` deliberately covers every credential-side failure --
/// unknown user, wrong password, mismatched, expired, or already-consumed
/// refresh token -- so callers cannot distinguish the sub-condition.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User directory unavailable")]
    DirectoryUnavailable,

    #[error("Token generation failed")]
    TokenGeneration,
}

/// Access-token verification errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,
}

pub type AuthResult<T> = Result<T, AuthError>;
