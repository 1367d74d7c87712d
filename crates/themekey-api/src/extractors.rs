//! # Request Extraction Helpers
//!
//! JSON body extraction that maps deserialization failures onto the 400
//! taxonomy entry instead of Axum's default rejection statuses.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to
/// [`AppError::BadRequest`].
///
/// Handlers take `Result<Json<T>, JsonRejection>` and call this first:
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
///     // use req...
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}
