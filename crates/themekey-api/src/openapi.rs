//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI document
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ThemeKey Licensing API",
        version = "0.3.2",
        description = "License issuance, validation/activation, and gated asset delivery for the ThemeKey storefront theme."
    ),
    paths(
        crate::routes::licenses::validate_license,
        crate::routes::webhooks::order_webhook,
        crate::routes::assets::fetch_asset,
    ),
    components(schemas(
        crate::routes::licenses::ValidateRequest,
        crate::routes::licenses::ValidateResponse,
        crate::routes::webhooks::IssueResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "licenses", description = "License validation and release"),
        (name = "webhooks", description = "Purchase-triggered issuance"),
        (name = "assets", description = "License-gated asset proxy"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_spec))
}

/// GET /openapi.json — the generated specification.
async fn serve_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
