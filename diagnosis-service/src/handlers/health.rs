use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use service_core::error::AppError;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "diagnosis-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness probe: ready while at least one model handle is loaded.
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let models = &state.models;
    if models.is_empty() {
        tracing::warn!("Readiness check failed: no generative model loaded");
        return Err(AppError::ServiceUnavailable);
    }

    Ok(Json(json!({
        "status": "ready",
        "vision_model": models.vision().map(|m| m.name().to_string()),
        "text_model": models.text().map(|m| m.name().to_string()),
    })))
}
