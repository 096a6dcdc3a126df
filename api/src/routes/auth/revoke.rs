use actix_web::{web, HttpResponse};

use crate::dto::auth::RevokeResponse;
use crate::handlers::error::handle_auth_error;
use crate::middleware::auth::AuthContext;

use kg_core::directory::UserDirectory;

use super::AppState;

/// Handler for POST /api/v1/auth/revoke
///
/// Clears the caller's stored refresh token, forcing re-authentication.
/// Requires a Bearer access token in the Authorization header. Idempotent:
/// revoking with nothing stored still succeeds.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Refresh token revoked"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: missing or invalid access token
/// - 503 Service Unavailable: user directory failure, retryable
pub async fn revoke<D>(state: web::Data<AppState<D>>, auth: AuthContext) -> HttpResponse
where
    D: UserDirectory + 'static,
{
    match state.authority.revoke(auth.account_id).await {
        Ok(()) => HttpResponse::Ok().json(RevokeResponse {
            message: "Refresh token revoked".to_string(),
        }),
        Err(error) => handle_auth_error(error),
    }
}
