//! Account identity as seen by the token authority.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable account identity owned by the user directory
///
/// The token authority only ever reads this; account records themselves
/// (credentials, profile data) live behind the [`UserDirectory`] interface.
///
/// [`UserDirectory`]: crate::directory::UserDirectory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentity {
    /// Opaque stable identifier
    pub id: Uuid,

    /// Display name, carried into the access token's `name` claim
    pub username: String,
}

impl AccountIdentity {
    /// Creates a new account identity
    pub fn new(id: Uuid, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}
