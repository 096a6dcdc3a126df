//! Application factory
//!
//! Builds the Actix-web application with all routes and middleware wired to
//! a shared token authority.

use actix_web::{middleware::Logger, web, App, HttpResponse};

use crate::middleware::{auth::BearerAuth, cors::create_cors};
use crate::routes::auth::{
    login::login, refresh::refresh_token, revoke::revoke, AppState,
};

use kg_core::directory::UserDirectory;

/// Create and configure the application
pub fn create_app<D>(
    app_state: web::Data<AppState<D>>,
    jwt_secret: &str,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    D: UserDirectory + 'static,
{
    let cors = create_cors();

    App::new()
        .app_data(app_state)
        .wrap(Logger::default())
        .wrap(cors)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/login", web::post().to(login::<D>))
                    .route("/refresh-token", web::post().to(refresh_token::<D>))
                    .route(
                        "/revoke",
                        web::post()
                            .to(revoke::<D>)
                            .wrap(BearerAuth::new(jwt_secret)),
                    ),
            ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "keygate-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
