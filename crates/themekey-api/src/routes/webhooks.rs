//! # Order Webhook API
//!
//! Consumes purchase events from the commerce platform and runs the
//! issuance orchestrator. The platform retries webhook deliveries, so the
//! handler must stay safe to call repeatedly for non-matching orders.
//!
//! ## Endpoints
//!
//! - `POST /v1/webhooks/orders` — issue licenses for a purchase event

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use themekey_issue::{issue_for_order, IssueError, PurchaseEvent};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

// ── Response DTO ────────────────────────────────────────────────────

/// Issuance result returned to the webhook caller.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IssueResponse {
    /// Always true when issuance completed (including the zero-license no-op).
    pub success: bool,
    /// Reference of the originating order.
    pub order_ref: String,
    /// Number of licenses created.
    pub total_licenses: usize,
    /// The created keys, in sequence order.
    pub licenses: Vec<String>,
    /// Whether the consolidated license email was delivered.
    pub notified: bool,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the webhooks router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/webhooks/orders", post(order_webhook))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /v1/webhooks/orders — issue licenses for a purchase event.
#[utoipa::path(
    post,
    path = "/v1/webhooks/orders",
    request_body = PurchaseEvent,
    responses(
        (status = 200, description = "Issuance completed (possibly zero licenses)", body = IssueResponse),
        (status = 400, description = "Malformed webhook payload", body = crate::error::ErrorBody),
        (status = 500, description = "Record store failure during issuance", body = crate::error::ErrorBody),
    ),
    tag = "webhooks"
)]
pub async fn order_webhook(
    State(state): State<AppState>,
    body: Result<Json<PurchaseEvent>, JsonRejection>,
) -> Result<Json<IssueResponse>, AppError> {
    let event = extract_json(body)?;
    let today = Utc::now().date_naive();

    let outcome = issue_for_order(
        state.store.as_ref(),
        state.notifier.as_ref(),
        &state.config.product,
        &event,
        today,
    )
    .await
    .map_err(|err| match err {
        IssueError::Store(e) => AppError::from(e),
    })?;

    Ok(Json(IssueResponse {
        success: true,
        order_ref: outcome.order_ref.clone(),
        total_licenses: outcome.total(),
        licenses: outcome.keys.iter().map(|k| k.to_string()).collect(),
        notified: outcome.notified,
    }))
}
