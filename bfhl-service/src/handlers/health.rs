use crate::dtos::ApiResponse;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe; also the public "who runs this" endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse> {
    Json(ApiResponse::healthy(&state.official_email))
}

/// Readiness check endpoint for K8s readiness probes.
pub async fn readiness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ready" })))
}
