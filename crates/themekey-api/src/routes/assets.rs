//! # Gated Asset Proxy
//!
//! Serves protected theme assets from the fixed content origin. When the
//! request carries license credentials they are verified first with the
//! side-effect-free check — the proxy path never mutates license state and
//! is safe to retry or run concurrently.
//!
//! ## Endpoints
//!
//! - `GET /v1/assets/:file` — verify (optional) and proxy one asset

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use themekey_core::LicenseKey;
use themekey_state::Verdict;

use crate::error::AppError;
use crate::origin::AssetError;
use crate::state::AppState;

// ── Request DTO ─────────────────────────────────────────────────────

/// Optional license credentials on an asset request.
#[derive(Debug, Deserialize)]
pub struct AssetQuery {
    #[serde(default)]
    pub license_key: Option<String>,
    #[serde(default)]
    pub store_identity: Option<String>,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the assets router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/assets/:file", get(fetch_asset))
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /v1/assets/:file — verify the license (when credentials are
/// supplied) and proxy the asset from the content origin.
#[utoipa::path(
    get,
    path = "/v1/assets/:file",
    params(
        ("file" = String, Path, description = "Asset file name (single path segment)"),
        ("license_key" = Option<String>, Query, description = "License key to verify"),
        ("store_identity" = Option<String>, Query, description = "Identity of the requesting store"),
    ),
    responses(
        (status = 200, description = "Asset bytes, content type preserved from the origin"),
        (status = 400, description = "Invalid file name, or only one credential supplied", body = crate::error::ErrorBody),
        (status = 403, description = "License rejected", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown license key or asset", body = crate::error::ErrorBody),
        (status = 409, description = "License bound to a different store", body = crate::error::ErrorBody),
        (status = 500, description = "Record store or origin failure", body = crate::error::ErrorBody),
    ),
    tag = "assets"
)]
pub async fn fetch_asset(
    State(state): State<AppState>,
    Path(file): Path<String>,
    Query(query): Query<AssetQuery>,
) -> Result<Response, AppError> {
    validate_file_name(&file)?;

    match (&query.license_key, &query.store_identity) {
        (Some(raw_key), Some(identity)) => {
            verify_license(&state, raw_key, identity).await?;
        }
        (None, None) => {
            // Ungated passthrough: public preview assets carry no credentials.
        }
        _ => {
            return Err(AppError::BadRequest(
                "license_key and store_identity must be supplied together".to_string(),
            ));
        }
    }

    let asset = state.assets.fetch(&file).await.map_err(|err| match err {
        AssetError::NotFound(name) => AppError::NotFound(format!("asset {name} not found")),
        other => AppError::Upstream(other.to_string()),
    })?;

    let mut response = (StatusCode::OK, asset.body).into_response();
    if let Some(content_type) = asset.content_type {
        if let Ok(value) = header::HeaderValue::from_str(&content_type) {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, value);
        }
    }
    Ok(response)
}

/// Reject traversal attempts and empty names before touching the origin.
fn validate_file_name(file: &str) -> Result<(), AppError> {
    if file.is_empty()
        || file == "."
        || file == ".."
        || file.contains('/')
        || file.contains('\\')
    {
        return Err(AppError::BadRequest(format!(
            "invalid asset file name: {file:?}"
        )));
    }
    Ok(())
}

/// Run the side-effect-free license check for an asset request.
async fn verify_license(
    state: &AppState,
    raw_key: &str,
    identity: &str,
) -> Result<(), AppError> {
    let key = LicenseKey::parse(raw_key).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let record = state
        .store
        .find_by_key(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("license {key} not found")))?;

    match record.verify_only(identity)? {
        Verdict::Accepted | Verdict::Released => Ok(()),
        Verdict::Rejected(reason) => Err(AppError::Forbidden(reason.message().to_string())),
        Verdict::Conflict => Err(AppError::Conflict(
            "license bound to a different store".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_validation() {
        assert!(validate_file_name("theme.css").is_ok());
        assert!(validate_file_name("bundle.min.js").is_ok());

        assert!(validate_file_name("").is_err());
        assert!(validate_file_name(".").is_err());
        assert!(validate_file_name("..").is_err());
        assert!(validate_file_name("a/b").is_err());
        assert!(validate_file_name("a\\b").is_err());
    }
}
