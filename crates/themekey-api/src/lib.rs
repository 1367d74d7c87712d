//! # themekey-api — Axum HTTP Service for ThemeKey Licensing
//!
//! The public surface of the licensing stack. Three request-handling
//! areas plus health probes and the generated OpenAPI document.
//!
//! ## API Surface
//!
//! | Route                          | Module               | Purpose                       |
//! |--------------------------------|----------------------|-------------------------------|
//! | `POST /v1/licenses/validate`   | [`routes::licenses`] | Activation / release / check  |
//! | `POST /v1/webhooks/orders`     | [`routes::webhooks`] | Purchase-triggered issuance   |
//! | `GET  /v1/assets/:file`        | [`routes::assets`]   | License-gated asset proxy     |
//! | `GET  /health/*`               | here                 | Probes (outside middleware)   |
//! | `GET  /openapi.json`           | [`openapi`]          | Generated OpenAPI 3 document  |
//!
//! ## Middleware Stack (Tower)
//!
//! `TraceLayer` → `CorsLayer` (permissive: the theme calls these endpoints
//! from the buyer's storefront origin).
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers — the state machine lives in
//!   `themekey-state`, issuance in `themekey-issue`.
//! - All errors map to structured HTTP responses via [`AppError`].

pub mod config;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod origin;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::AppError;
pub use state::AppState;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes are mounted outside the middleware stack so they stay
/// reachable regardless of CORS or tracing configuration.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::licenses::router())
        .merge(routes::webhooks::router())
        .merge(routes::assets::router())
        .merge(openapi::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
