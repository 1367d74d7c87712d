//! # themekey-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the ThemeKey licensing service.
//! Binds to a configurable port (default 8080).

use std::sync::Arc;

use themekey_api::{AppConfig, AppState};
use themekey_notify::{LogNotifier, NotifyConfig, Notifier, ResendNotifier};
use themekey_store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    // The record store. The spreadsheet-backed table of earlier
    // deployments plugs in behind the same trait; without one configured
    // the service runs on in-memory records.
    tracing::warn!("no external record store configured — records will not survive restart");
    let store = Arc::new(MemoryStore::new());

    // Email delivery: fall back to log-only when no API key is configured.
    let notifier: Arc<dyn Notifier> = match NotifyConfig::from_env() {
        Ok(notify_config) => {
            tracing::info!("email notifier configured");
            Arc::new(ResendNotifier::new(notify_config)?)
        }
        Err(e) => {
            tracing::warn!("email notifier not configured: {e}. License emails will be logged only.");
            Arc::new(LogNotifier)
        }
    };

    let port = config.port;
    let state = AppState::try_with_parts(config, store, notifier)?;
    let app = themekey_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("ThemeKey API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
