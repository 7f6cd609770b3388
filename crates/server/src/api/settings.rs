//! Cleanup policy settings endpoints.

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};

use depot_core::settings as setting_keys;

use super::AppState;
use super::schemas::{SettingsResponse, UpdateSettingsRequest};
use crate::error::ServerError;

/// Build the settings snapshot from the engine.
async fn snapshot(state: &AppState) -> Result<SettingsResponse, ServerError> {
    let policy = state.engine.cleanup_policy().await?;
    let cleanup_last_run = state
        .engine
        .setting(setting_keys::CLEANUP_LAST_RUN)
        .await?
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map(|ts| ts.with_timezone(&Utc));

    Ok(SettingsResponse {
        cleanup_enabled: policy.enabled,
        cleanup_max_age_hours: policy.max_age_hours,
        cleanup_last_run,
    })
}

/// `GET /v1/settings` -- current cleanup policy settings.
#[utoipa::path(
    get,
    path = "/v1/settings",
    tag = "Settings",
    summary = "Get cleanup settings",
    responses(
        (status = 200, description = "Current settings", body = SettingsResponse),
        (status = 401, description = "Invalid or missing API key", body = super::schemas::ErrorResponse),
    )
)]
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServerError> {
    Ok(Json(snapshot(&state).await?))
}

/// `PUT /v1/settings` -- update cleanup policy settings.
#[utoipa::path(
    put,
    path = "/v1/settings",
    tag = "Settings",
    summary = "Update cleanup settings",
    description = "Updates the provided fields; omitted fields keep their current value.",
    request_body(content = UpdateSettingsRequest),
    responses(
        (status = 200, description = "Settings after the update", body = SettingsResponse),
        (status = 400, description = "Invalid setting value", body = super::schemas::ErrorResponse),
        (status = 401, description = "Invalid or missing API key", body = super::schemas::ErrorResponse),
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, ServerError> {
    if let Some(enabled) = update.cleanup_enabled {
        state
            .engine
            .set_setting(
                setting_keys::CLEANUP_ENABLED,
                if enabled { "true" } else { "false" },
            )
            .await?;
    }
    if let Some(hours) = update.cleanup_max_age_hours {
        state
            .engine
            .set_setting(setting_keys::CLEANUP_MAX_AGE_HOURS, &hours.to_string())
            .await?;
    }

    Ok(Json(snapshot(&state).await?))
}
