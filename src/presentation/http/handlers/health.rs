//! Health Check Handlers
//!
//! # Endpoints
//! - `GET /health`, `/health-check`, `/ping` - static liveness answer
//! - `GET /health/ready` - readiness, pings the datastore

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::application::dto::response::{HealthResponse, ReadinessResponse};
use crate::startup::AppState;

/// Liveness probe
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { server: "OK" })
}

/// Readiness probe - 503 while the datastore does not answer
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.probe.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse { server: "OK", datastore: "OK" }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Datastore readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse { server: "OK", datastore: "UNAVAILABLE" }),
            )
        }
    }
}
