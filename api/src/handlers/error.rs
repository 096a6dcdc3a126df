//! Mapping from domain errors to HTTP responses.

use actix_web::HttpResponse;

use kg_core::errors::AuthError;
use kg_shared::types::response::ErrorResponse;

/// Converts an [`AuthError`] into the wire response
///
/// Every credential-side failure produces the same 401 body regardless of
/// which sub-condition triggered it; directory failures produce a distinct
/// 503 so clients can tell "try again" from "your credentials are wrong".
pub fn handle_auth_error(error: AuthError) -> HttpResponse {
    match error {
        AuthError::InvalidCredentials => HttpResponse::Unauthorized()
            .json(ErrorResponse::new("invalid_credentials", "Invalid credentials")),
        AuthError::DirectoryUnavailable => {
            log::error!("user directory unavailable");
            HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                "directory_unavailable",
                "Service temporarily unavailable, please retry",
            ))
        }
        AuthError::TokenGeneration => {
            log::error!("token generation failed");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "internal_error",
                "An internal error occurred",
            ))
        }
    }
}
