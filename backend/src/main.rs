//! Backend entry-point: loads settings, applies migrations and serves the
//! REST API with health probes and OpenAPI docs.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use aircraft_backend::inbound::http::health::HealthState;
use aircraft_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use aircraft_backend::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    settings.validate().map_err(std::io::Error::other)?;
    let secret = settings.signing_secret().map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(
        settings.bind_addr(),
        secret,
        settings.token_exp_hours,
        settings.cookie_secure(),
    );

    match settings.database_url() {
        Some(url) => {
            if settings.run_migrations() {
                run_migrations(url).await.map_err(std::io::Error::other)?;
            }
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(std::io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("AIRCRAFT_DATABASE_URL not set; store-backed routes will answer 503"),
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %settings.bind_addr(), "starting server");
    create_server(health_state, config)?.await
}
