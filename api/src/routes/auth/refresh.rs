use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::{RefreshTokenRequest, TokenResponse};
use crate::handlers::error::handle_auth_error;

use kg_core::directory::UserDirectory;
use kg_core::errors::AuthError;

use super::AppState;

/// Handler for POST /api/v1/auth/refresh-token
///
/// Exchanges a valid refresh token for a new access/refresh pair. The
/// presented refresh token is consumed by a successful rotation; replaying it
/// afterwards fails.
///
/// # Request Body
///
/// ```json
/// {
///     "username": "string",
///     "refresh_token": "string"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "new_opaque_value",
///     "expires_in": 1800
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: invalid, expired, or already-consumed refresh token
/// - 503 Service Unavailable: user directory failure, retryable
pub async fn refresh_token<D>(
    state: web::Data<AppState<D>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    D: UserDirectory + 'static,
{
    if request.validate().is_err() {
        return handle_auth_error(AuthError::InvalidCredentials);
    }

    match state
        .authority
        .rotate(&request.username, &request.refresh_token)
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(TokenResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
        }),
        Err(error) => handle_auth_error(error),
    }
}
