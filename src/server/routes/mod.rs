//! API route handlers
//!
//! - `health`: liveness, readiness and metrics
//! - `predict`: the three model endpoints

pub mod health;
pub mod predict;

use super::error::ServerError;
use axum::Json;
use axum::response::IntoResponse;
use serde_json::json;

/// Root endpoint (GET /)
///
/// # Response
///
/// ```json
/// { "message": "Welcome to Food AI API" }
/// ```
pub async fn welcome() -> impl IntoResponse {
    Json(json!({ "message": "Welcome to Food AI API" }))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
