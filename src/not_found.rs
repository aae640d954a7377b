//! The fallback response for routes that do not exist.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Route handler for unknown paths.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// A 404 response with a JSON body.
pub fn get_404_not_found_response() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" }))).into_response()
}
