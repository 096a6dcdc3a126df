//! Token authority module
//!
//! This module handles all token-related operations:
//! - Password authentication and token-pair issuance
//! - Refresh-token rotation with single-use replay protection
//! - Explicit revocation
//! - Stateless access-token verification

mod authority;
mod config;

#[cfg(test)]
mod tests;

pub use authority::{verify_access_token, TokenAuthority};
pub use config::TokenAuthorityConfig;
