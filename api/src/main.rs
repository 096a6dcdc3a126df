use std::sync::Arc;

use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::info;
use sqlx::mysql::MySqlPoolOptions;
use std::time::Duration;

use kg_api::app::create_app;
use kg_api::routes::auth::AppState;
use kg_core::services::token::{TokenAuthority, TokenAuthorityConfig};
use kg_infra::MySqlUserDirectory;
use kg_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Keygate token authority");

    // Configuration problems are fatal here, never per-request
    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        std::process::exit(1);
    });

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    // Connect the user directory
    let pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout))
        .connect(&config.database.url)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let directory = MySqlUserDirectory::new(pool);
    let authority = Arc::new(TokenAuthority::new(
        directory,
        TokenAuthorityConfig::from_jwt_config(&config.jwt),
    ));

    let jwt_secret = config.jwt.secret.clone();
    let app_state = web::Data::new(AppState { authority });

    let mut server =
        HttpServer::new(move || create_app(app_state.clone(), &jwt_secret)).bind(&bind_address)?;

    // workers == 0 keeps actix's default of one worker per core
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.run().await
}
