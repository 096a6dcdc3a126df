//! Authentication route handlers
//!
//! - Password login issuing an access/refresh token pair
//! - Refresh-token rotation
//! - Explicit revocation

pub mod login;
pub mod refresh;
pub mod revoke;

use std::sync::Arc;

use kg_core::directory::UserDirectory;
use kg_core::services::token::TokenAuthority;

/// Application state that holds the shared token authority
pub struct AppState<D: UserDirectory> {
    pub authority: Arc<TokenAuthority<D>>,
}
