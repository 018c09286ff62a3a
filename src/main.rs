//! wildwatch-api server entry point.
//!
//! Connects to the store, applies migrations, and starts the Axum HTTP
//! server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::EnvFilter;

use wildwatch_api::api;
use wildwatch_api::app_state::AppState;
use wildwatch_api::chat::ChatRelay;
use wildwatch_api::config::DashboardConfig;
use wildwatch_api::domain::{EventBus, SessionManager};
use wildwatch_api::persistence::PostgresStore;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = DashboardConfig::from_env().context("loading configuration")?;
    tracing::info!(addr = %config.listen_addr, "starting wildwatch-api");

    let store = PostgresStore::connect(&config)
        .await
        .context("connecting to the store")?;
    if config.run_migrations {
        store.migrate().await.context("applying migrations")?;
        tracing::info!("migrations applied");
    }

    let event_bus = EventBus::new(config.event_bus_capacity);
    let sessions = Arc::new(SessionManager::new(config.session_ttl_secs));
    let chat = ChatRelay::new(config.chat.clone());
    if !chat.is_configured() {
        tracing::info!("chat relay disabled: CHAT_API_URL not set");
    }

    tokio::spawn(purge_sessions(Arc::clone(&sessions)));

    let app_state = AppState::new(Arc::new(store), event_bus, sessions, chat);
    let app = api::build_app(app_state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Drops expired sessions on a fixed interval.
async fn purge_sessions(sessions: Arc<SessionManager>) {
    let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
    loop {
        ticker.tick().await;
        let purged = sessions.purge_expired(Utc::now()).await;
        if purged > 0 {
            tracing::debug!(purged, "expired sessions purged");
        }
    }
}
