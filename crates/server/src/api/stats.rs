use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use super::AppState;
use super::schemas::StatsResponse;
use crate::error::ServerError;

/// `GET /v1/stats` -- aggregate storage statistics.
#[utoipa::path(
    get,
    path = "/v1/stats",
    tag = "Stats",
    summary = "Storage statistics",
    description = "Record counts and stored bytes, aggregated over the record table.",
    responses(
        (status = 200, description = "Current statistics", body = StatsResponse),
        (status = 401, description = "Invalid or missing API key", body = super::schemas::ErrorResponse),
    )
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse, ServerError> {
    let stats = state.engine.stats().await?;

    Ok(Json(StatsResponse {
        total: stats.total,
        active: stats.active,
        deleted: stats.deleted,
        downloaded: stats.downloaded,
        total_size_bytes: stats.total_size_bytes,
        total_size_human: stats.total_size_human(),
    }))
}
