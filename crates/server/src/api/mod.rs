pub mod cleanup;
pub mod files;
pub mod health;
pub mod openapi;
pub mod schemas;
pub mod settings;
pub mod stats;

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use depot_engine::Engine;

use crate::auth::ApiKeyEntry;

use self::openapi::ApiDoc;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The lifecycle engine.
    pub engine: Arc<Engine>,
    /// API key lookup table (None when auth is disabled).
    pub api_keys: Option<Arc<HashMap<String, ApiKeyEntry>>>,
}

/// Build the Axum router with all API routes, middleware, and Swagger UI.
pub fn router(state: AppState) -> Router {
    // Health stays public so load balancers can probe without a key.
    let public = Router::new().route("/health", get(health::health));

    let protected = Router::new()
        .route(
            "/v1/files",
            post(files::upload_multipart).get(files::list_files),
        )
        .route(
            "/v1/files/{job_id}",
            put(files::upload_raw)
                .get(files::check_file)
                .delete(files::delete_file),
        )
        .route("/v1/files/{job_id}/download", get(files::download_file))
        .route("/v1/cleanup", post(cleanup::run_cleanup))
        .route(
            "/v1/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route("/v1/stats", get(stats::get_stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_api_key,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
