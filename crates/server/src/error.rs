use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use depot_engine::EngineError;

/// Errors that can occur when running the Depot server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An engine-level error surfaced through the API.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Engine(EngineError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            Self::Engine(EngineError::NotFound(job_id)) => {
                (StatusCode::NOT_FOUND, format!("job not found: {job_id}"))
            }
            Self::Engine(EngineError::Gone(job_id)) => (
                StatusCode::GONE,
                format!("archive already deleted: {job_id}"),
            ),
            Self::Engine(e) => {
                // Backing-store faults: log the details, return a generic
                // server-side failure.
                tracing::error!(error = %e, "request failed on a backing store");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            Self::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            Self::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}
