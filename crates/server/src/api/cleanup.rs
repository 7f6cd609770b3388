use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use chrono::Utc;

use super::AppState;
use crate::error::ServerError;

/// `POST /v1/cleanup` -- run a cleanup sweep now.
#[utoipa::path(
    post,
    path = "/v1/cleanup",
    tag = "Cleanup",
    summary = "Run a cleanup sweep",
    description = "Tombstones every record first downloaded before the configured retention \
                   horizon. Skipped (and nothing is touched) while the `cleanup_enabled` \
                   setting is false.",
    responses(
        (status = 200, description = "Sweep result", body = depot_core::CleanupReport),
        (status = 401, description = "Invalid or missing API key", body = super::schemas::ErrorResponse),
    )
)]
pub async fn run_cleanup(State(state): State<AppState>) -> Result<impl IntoResponse, ServerError> {
    let report = state.engine.run_cleanup(Utc::now()).await?;
    Ok(Json(report))
}
