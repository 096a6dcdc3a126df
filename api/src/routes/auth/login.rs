use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::{LoginRequest, TokenResponse};
use crate::handlers::error::handle_auth_error;

use kg_core::directory::UserDirectory;
use kg_core::errors::AuthError;

use super::AppState;

/// Handler for POST /api/v1/auth/login
///
/// Authenticates a username/password pair and returns a fresh token pair.
///
/// # Request Body
///
/// ```json
/// {
///     "username": "string",
///     "password": "string"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "opaque_base64_value",
///     "expires_in": 1800
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: unknown user or wrong password (indistinguishable)
/// - 503 Service Unavailable: user directory failure, retryable
pub async fn login<D>(
    state: web::Data<AppState<D>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    D: UserDirectory + 'static,
{
    // Malformed credentials get the same response as wrong ones
    if request.validate().is_err() {
        return handle_auth_error(AuthError::InvalidCredentials);
    }

    match state
        .authority
        .authenticate(&request.username, &request.password)
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
