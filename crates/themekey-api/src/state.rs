//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! `AppState` holds the external collaborators behind their trait
//! boundaries — the record store and the notifier — plus the asset origin
//! client and configuration. Handlers never construct adapters themselves.

use std::sync::Arc;

use themekey_notify::{LogNotifier, Notifier};
use themekey_store::{MemoryStore, RecordStore};

use crate::config::AppConfig;
use crate::origin::AssetOrigin;

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly: collaborators are behind `Arc`, the origin client is
/// itself cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// The license record table.
    pub store: Arc<dyn RecordStore>,
    /// Outbound buyer notification.
    pub notifier: Arc<dyn Notifier>,
    /// Client for the protected asset content origin.
    pub assets: AssetOrigin,
    /// Service configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Create application state with explicit collaborators, returning
    /// `Err` if the asset origin client cannot be built.
    pub fn try_with_parts(
        config: AppConfig,
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, crate::origin::AssetError> {
        let assets = AssetOrigin::new(
            config.asset_origin_url.clone(),
            config.asset_timeout_secs,
        )?;
        Ok(Self {
            store,
            notifier,
            assets,
            config,
        })
    }

    /// Create application state with explicit collaborators.
    ///
    /// # Panics
    ///
    /// Panics if the asset origin HTTP client cannot be built. Prefer
    /// [`AppState::try_with_parts`] at real startup paths.
    pub fn with_parts(
        config: AppConfig,
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::try_with_parts(config, store, notifier)
            .expect("failed to initialize asset origin client")
    }

    /// Create application state with in-memory storage and a logging
    /// notifier (development and test mode).
    pub fn new(config: AppConfig) -> Self {
        Self::with_parts(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(LogNotifier),
        )
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("assets", &self.assets)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
