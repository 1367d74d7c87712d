//! Email delivery configuration.
//!
//! Explicit configuration struct constructed at binary startup and passed
//! into the notifier — adapters hold no process-wide mutable state.

use url::Url;

/// Configuration for the transactional email API.
///
/// Custom `Debug` redacts the API key to prevent credential leakage in logs.
#[derive(Clone)]
pub struct NotifyConfig {
    /// Base URL of the email API.
    /// Default: <https://api.resend.com>
    pub api_base: Url,
    /// API key for bearer authentication.
    pub api_key: String,
    /// Sender address for license emails.
    pub from_address: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for NotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl NotifyConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `RESEND_API_KEY` (required)
    /// - `LICENSE_FROM_EMAIL` (default: `licenses@themekey.dev`)
    /// - `RESEND_API_BASE` (default: `https://api.resend.com`)
    /// - `NOTIFY_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("RESEND_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;

        let raw_base = std::env::var("RESEND_API_BASE")
            .unwrap_or_else(|_| "https://api.resend.com".to_string());
        let api_base = Url::parse(&raw_base)
            .map_err(|e| ConfigError::InvalidUrl("RESEND_API_BASE".to_string(), e.to_string()))?;

        Ok(Self {
            api_base,
            api_key,
            from_address: std::env::var("LICENSE_FROM_EMAIL")
                .unwrap_or_else(|_| "licenses@themekey.dev".to_string()),
            timeout_secs: std::env::var("NOTIFY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("RESEND_API_KEY environment variable is required")]
    MissingApiKey,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
