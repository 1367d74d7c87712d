//! # Service Configuration
//!
//! Explicit configuration struct built once at startup and threaded into
//! the application state — no module-scope environment reads anywhere in
//! the workspace.

use url::Url;

use themekey_issue::ProductMatch;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Fixed content origin that protected theme assets are proxied from.
    pub asset_origin_url: Url,
    /// Timeout for asset origin requests, in seconds.
    pub asset_timeout_secs: u64,
    /// Which line items count as theme purchases.
    pub product: ProductMatch,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            asset_origin_url: Url::parse("https://cdn.themekey.dev/assets")
                .expect("default asset origin URL is valid"),
            asset_timeout_secs: 30,
            product: ProductMatch::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8080)
    /// - `ASSET_ORIGIN_URL` (default: `https://cdn.themekey.dev/assets`)
    /// - `ASSET_TIMEOUT_SECS` (default: 30)
    /// - `THEME_PRODUCT_SKU` (default: `ThemeKey`)
    /// - `THEME_TITLE_MARKER` (default: `ThemeKey Theme`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let asset_origin_url = match std::env::var("ASSET_ORIGIN_URL") {
            Ok(raw) => Url::parse(&raw)
                .map_err(|e| ConfigError::InvalidUrl("ASSET_ORIGIN_URL".to_string(), e.to_string()))?,
            Err(_) => defaults.asset_origin_url,
        };

        let mut product = defaults.product;
        if let Ok(sku) = std::env::var("THEME_PRODUCT_SKU") {
            product.sku = sku;
        }
        if let Ok(marker) = std::env::var("THEME_TITLE_MARKER") {
            product.title_marker = marker;
        }

        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            asset_origin_url,
            asset_timeout_secs: std::env::var("ASSET_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.asset_timeout_secs),
            product,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
