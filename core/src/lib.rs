//! # Keygate Core
//!
//! Core domain layer for the Keygate token authority. This crate contains the
//! domain entities, the user-directory interface, the token authority service,
//! and the error types shared across the workspace.

pub mod directory;
pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use directory::{CredentialCheck, DirectoryError, UserDirectory};
pub use domain::entities::account::AccountIdentity;
pub use domain::entities::token::{Claims, RefreshToken, TokenPair};
pub use errors::{AuthError, TokenError};
pub use services::token::{TokenAuthority, TokenAuthorityConfig};
