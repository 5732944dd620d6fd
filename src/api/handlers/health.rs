use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

/// Liveness probe; no auth, no database.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
