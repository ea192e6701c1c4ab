use std::path::Path;

use anyhow::Context;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tracing::{info, warn};

use configs::AppConfig;
use service::events::schedule::offset_from_minutes;

use crate::routes;
use crate::state::{ServerAuthConfig, ServerState};

/// Read `config.toml` (or `CONFIG_PATH`) when present, otherwise build the
/// configuration from environment variables.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        AppConfig::load_and_validate().with_context(|| format!("loading {path}"))
    } else {
        warn!(%path, "config file not found; using environment variables");
        AppConfig::from_env()
    }
}

pub fn build_state(db: DatabaseConnection, cfg: &AppConfig) -> anyhow::Result<ServerState> {
    Ok(ServerState {
        db,
        auth: ServerAuthConfig {
            jwt_secret: cfg.auth.jwt_secret.clone(),
            session_hours: cfg.auth.session_hours,
        },
        offset: offset_from_minutes(cfg.events.utc_offset_minutes)?,
    })
}

pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::ensure_env(&cfg.server.static_dir).await?;

    let db = models::db::connect_and_migrate(&cfg.database).await?;
    let state = build_state(db, &cfg)?;
    let app = routes::build_router(state, &cfg.server.static_dir);

    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port))
        .await
        .with_context(|| format!("binding {}:{}", cfg.server.host, cfg.server.port))?;
    let addr = listener.local_addr()?;
    info!(%addr, utc_offset_minutes = cfg.events.utc_offset_minutes, "event hub listening");
    axum::serve(listener, app).await?;
    Ok(())
}
