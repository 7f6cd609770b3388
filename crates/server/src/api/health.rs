use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;

use super::schemas::HealthResponse;

/// `GET /health` -- returns service status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    summary = "Health check",
    description = "Returns service status. Public, no API key required.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health() -> impl IntoResponse {
    let body = HealthResponse {
        status: "ok".into(),
        service: "depot-server".into(),
        timestamp: Utc::now(),
    };

    (StatusCode::OK, Json(body))
}
