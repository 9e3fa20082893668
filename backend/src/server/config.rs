//! Application settings and the HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

use dashboard::domain::DEFAULT_OVERVIEW_DEADLINE;
use dashboard::inbound::http::session_config::SessionSettings;
use dashboard::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings read from `DASHBOARD_*` variables, config files and flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DASHBOARD")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the server runs on in-memory demo data.
    pub database_url: Option<String>,
    /// How long an overview snapshot waits for each region.
    #[ortho_config(default = 2000)]
    pub overview_deadline_ms: u64,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .trim()
            .parse()
    }

    pub fn overview_deadline(&self) -> Duration {
        Duration::from_millis(self.overview_deadline_ms)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.max(1)
    }
}

/// Everything `create_server` needs.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) overview_deadline: Duration,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            overview_deadline: DEFAULT_OVERVIEW_DEADLINE,
        }
    }

    /// Serve from PostgreSQL instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_overview_deadline(mut self, deadline: Duration) -> Self {
        self.overview_deadline = deadline;
        self
    }
}
