//! # Asset Origin Client
//!
//! Thin typed client for the fixed content origin that protected theme
//! assets are served from. The API layer verifies the license first and
//! then proxies the asset bytes through unchanged.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Errors from the asset origin.
#[derive(Error, Debug)]
pub enum AssetError {
    /// The origin has no such asset.
    #[error("asset not found: {0}")]
    NotFound(String),

    /// Transport-level failure reaching the origin.
    #[error("asset origin transport error: {source}")]
    Http {
        #[source]
        source: reqwest::Error,
    },

    /// The origin answered with an unexpected status.
    #[error("asset origin error (status {status})")]
    Api { status: u16 },
}

/// An asset fetched from the origin, ready to proxy.
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    /// Content type reported by the origin, passed through to the client.
    pub content_type: Option<String>,
    /// Raw asset bytes.
    pub body: Vec<u8>,
}

/// Client for the protected asset content origin.
#[derive(Debug, Clone)]
pub struct AssetOrigin {
    http: reqwest::Client,
    base_url: Url,
}

impl AssetOrigin {
    /// Create a client for `base_url` with an explicit request timeout.
    pub fn new(base_url: Url, timeout_secs: u64) -> Result<Self, AssetError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AssetError::Http { source: e })?;
        Ok(Self { http, base_url })
    }

    /// Fetch the named asset from the origin.
    pub async fn fetch(&self, file: &str) -> Result<FetchedAsset, AssetError> {
        let url = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            file
        );

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AssetError::Http { source: e })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AssetError::NotFound(file.to_string()));
        }
        if !resp.status().is_success() {
            return Err(AssetError::Api {
                status: resp.status().as_u16(),
            });
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = resp
            .bytes()
            .await
            .map_err(|e| AssetError::Http { source: e })?
            .to_vec();

        Ok(FetchedAsset { content_type, body })
    }
}
