use axum::Json;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::AppState;
use crate::auth::api_key::authenticate_api_key;

/// Require a valid API key on every request passing through.
///
/// The key is taken from `Authorization: Bearer <key>` or the `X-API-Key`
/// header. When authentication is disabled (no key table in the state),
/// requests pass straight through.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(table) = state.api_keys.as_ref() else {
        return next.run(request).await;
    };

    let token = bearer_token(&request).or_else(|| api_key_header(&request));
    match token.and_then(|raw| authenticate_api_key(&raw, table)) {
        Some(entry) => {
            tracing::debug!(key = %entry.name, "api key accepted");
            next.run(request).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "invalid or missing API key" })),
        )
            .into_response(),
    }
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

fn api_key_header(request: &Request) -> Option<String> {
    request
        .headers()
        .get("x-api-key")?
        .to_str()
        .ok()
        .map(str::to_owned)
}
