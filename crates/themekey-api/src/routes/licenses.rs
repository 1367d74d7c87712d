//! # License Validation API
//!
//! The endpoint the deployed theme calls at runtime. One route handles
//! activation, re-validation, and release: only `action = "clear"` selects
//! release; any other value (or none) is an activation attempt.
//!
//! ## Endpoints
//!
//! - `POST /v1/licenses/validate` — apply the state machine to a record

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use themekey_core::LicenseKey;
use themekey_state::{Action, LicenseRecord, Verdict};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

// ── Request/Response DTOs ───────────────────────────────────────────

/// Request body for the validation endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateRequest {
    /// The license key, `LIC-XXXX-XXXX-XXXX`.
    pub license_key: String,
    /// The identity of the requesting store. Required for activation;
    /// checked against the binding for release.
    #[serde(default)]
    pub store_identity: Option<String>,
    /// `"clear"` releases the license; anything else activates.
    #[serde(default)]
    pub action: Option<String>,
}

/// Verdict payload returned by the validation endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateResponse {
    /// Whether the requesting store holds a usable license.
    pub valid: bool,
    /// License status after the request.
    pub status: String,
    /// Present on success verdicts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Present on rejection and conflict verdicts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the licenses router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/licenses/validate", post(validate_license))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /v1/licenses/validate — activate, re-validate, or release.
#[utoipa::path(
    post,
    path = "/v1/licenses/validate",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Accepted, released, or rejected without conflict", body = ValidateResponse),
        (status = 400, description = "Missing or malformed parameter", body = crate::error::ErrorBody),
        (status = 403, description = "Release forbidden: license bound to another store", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown license key", body = crate::error::ErrorBody),
        (status = 409, description = "Duplicate-binding conflict", body = ValidateResponse),
        (status = 500, description = "Record store failure", body = crate::error::ErrorBody),
    ),
    tag = "licenses"
)]
pub async fn validate_license(
    State(state): State<AppState>,
    body: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ValidateResponse>), AppError> {
    let req = extract_json(body)?;

    let raw_key = req.license_key.trim();
    if raw_key.is_empty() {
        return Err(AppError::BadRequest("missing license_key".to_string()));
    }
    let key = LicenseKey::parse(raw_key).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut record = state
        .store
        .find_by_key(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("license {key} not found")))?;

    let action = Action::from_request(req.action.as_deref());
    let identity = req.store_identity.as_deref().unwrap_or_default();
    let today = Utc::now().date_naive();

    let verdict = record.apply(action, identity, today)?;
    if verdict.mutates_record() {
        state.store.write(&record).await?;
    }

    tracing::info!(
        key = %record.key,
        verdict = ?verdict,
        status = %record.status,
        "license validation handled"
    );

    Ok(respond(verdict, &record))
}

/// Map a verdict onto the wire payload and status code.
fn respond(verdict: Verdict, record: &LicenseRecord) -> (StatusCode, Json<ValidateResponse>) {
    let status = record.status.to_string();
    match verdict {
        Verdict::Accepted => (
            StatusCode::OK,
            Json(ValidateResponse {
                valid: true,
                status,
                message: Some("license valid".to_string()),
                error: None,
            }),
        ),
        Verdict::Released => (
            StatusCode::OK,
            Json(ValidateResponse {
                valid: true,
                status,
                message: Some("license released".to_string()),
                error: None,
            }),
        ),
        Verdict::Rejected(reason) => (
            StatusCode::OK,
            Json(ValidateResponse {
                valid: false,
                status,
                message: None,
                error: Some(reason.message().to_string()),
            }),
        ),
        Verdict::Conflict => (
            StatusCode::CONFLICT,
            Json(ValidateResponse {
                valid: false,
                status,
                message: None,
                error: Some("duplicate binding".to_string()),
            }),
        ),
    }
}
