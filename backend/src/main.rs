//! Dashboard entry point: loads settings, picks adapters and serves HTTP.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use dashboard::inbound::http::health::HealthState;
use dashboard::inbound::http::session_config::{BuildMode, session_settings_from_env};
use dashboard::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{AppSettings, ServerConfig, create_server};

fn io_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| io_error("invalid settings", err))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|err| io_error("invalid session configuration", err))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| io_error("invalid bind address", err))?;

    let mut config =
        ServerConfig::new(session, bind_addr).with_overview_deadline(settings.overview_deadline());
    match settings.database_url.as_deref() {
        Some(url) => {
            run_pending_migrations(url)
                .await
                .map_err(|err| io_error("database migration failed", err))?;
            let pool = DbPool::new(
                PoolConfig::new(url).with_max_size(settings.db_max_connections()),
            )
            .await
            .map_err(|err| io_error("database pool setup failed", err))?;
            config = config.with_db_pool(pool);
        }
        None => warn!("DASHBOARD_DATABASE_URL not set; serving in-memory demo data"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "dashboard listening");
    server.await
}
