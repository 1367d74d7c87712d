//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from `themekey-state` and `themekey-store` to HTTP
//! status codes with JSON bodies. Upstream and internal error details are
//! never exposed in responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use themekey_state::TransitionError;
use themekey_store::StoreError;

/// Structured JSON error response body.
///
/// All error responses use this format for consistency across the API
/// surface.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "CONFLICT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed request input (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Release of a license bound to another store (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Unknown license key or asset (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate-binding conflict (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Record store / notifier / origin failure (500, safe to retry).
    /// Message is logged but not returned to the client.
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// Unexpected internal error (500). Message is logged but not
    /// returned to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_FAILURE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose upstream or internal details to clients.
        let message = match &self {
            Self::Upstream(_) => "A dependency of this service failed; please retry".to_string(),
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed with server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Record store failures surface as retryable upstream failures.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Upstream(err.to_string())
    }
}

/// State machine precondition failures map onto request errors.
impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::MissingIdentity => Self::BadRequest(err.to_string()),
            TransitionError::ReleaseForbidden => Self::Forbidden(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    /// Helper to extract status and body from a Response.
    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[test]
    fn status_codes_follow_the_taxonomy() {
        let cases = [
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                AppError::Upstream("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let (status, _) = err.status_and_code();
            assert_eq!(status, expected);
        }
    }

    #[tokio::test]
    async fn client_errors_carry_their_message() {
        let (status, body) =
            response_parts(AppError::NotFound("license LIC-0000 not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.code, "NOT_FOUND");
        assert!(body.error.message.contains("LIC-0000"));
    }

    #[tokio::test]
    async fn upstream_failures_hide_details() {
        let (status, body) =
            response_parts(AppError::Upstream("sheet API returned 502".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "UPSTREAM_FAILURE");
        assert!(
            !body.error.message.contains("sheet API"),
            "upstream details must not leak: {}",
            body.error.message
        );
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) = response_parts(AppError::Internal("lock poisoned".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert_eq!(body.error.message, "An internal error occurred");
    }

    #[test]
    fn store_error_becomes_upstream() {
        let err = AppError::from(StoreError::Unavailable("timeout".into()));
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[test]
    fn transition_errors_map_to_request_errors() {
        assert!(matches!(
            AppError::from(TransitionError::MissingIdentity),
            AppError::BadRequest(_)
        ));
        assert!(matches!(
            AppError::from(TransitionError::ReleaseForbidden),
            AppError::Forbidden(_)
        ));
    }
}
