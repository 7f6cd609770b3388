use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{self, Request, StatusCode};
use tower::ServiceExt;

use depot_blob::BlobStore;
use depot_blob_memory::MemoryBlobStore;
use depot_engine::{Engine, EngineConfig};
use depot_server::api::AppState;
use depot_server::auth::{build_api_key_table, hash_api_key};
use depot_server::config::ApiKeyConfig;
use depot_store::{RecordStore, SettingsStore};
use depot_store_memory::{MemoryRecordStore, MemorySettingsStore};

// -- Helpers --------------------------------------------------------------

fn build_state_with(config: EngineConfig, api_key: Option<&str>) -> AppState {
    let engine = Engine::builder()
        .records(Arc::new(MemoryRecordStore::new()) as Arc<dyn RecordStore>)
        .settings(Arc::new(MemorySettingsStore::new()) as Arc<dyn SettingsStore>)
        .blobs(Arc::new(MemoryBlobStore::new()) as Arc<dyn BlobStore>)
        .config(config)
        .build()
        .expect("engine should build");

    let api_keys = api_key.map(|raw| {
        Arc::new(build_api_key_table(&[ApiKeyConfig {
            name: "test".into(),
            key_hash: hash_api_key(raw),
        }]))
    });

    AppState {
        engine: Arc::new(engine),
        api_keys,
    }
}

fn build_state() -> AppState {
    build_state_with(EngineConfig::default(), None)
}

fn build_app(state: AppState) -> axum::Router {
    depot_server::api::router(state)
}

fn put_upload(job_id: &str, payload: &'static [u8]) -> Request<Body> {
    Request::builder()
        .method(http::Method::PUT)
        .uri(format!("/v1/files/{job_id}"))
        .header(http::header::CONTENT_TYPE, "application/octet-stream")
        .body(Body::from(payload))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

// -- Tests ----------------------------------------------------------------

#[tokio::test]
async fn health_returns_200() {
    let app = build_app(build_state());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "depot-server");
}

#[tokio::test]
async fn upload_then_download_roundtrip() {
    let app = build_app(build_state());

    let response = app
        .clone()
        .oneshot(put_upload("job-1", b"0123456789abcdefg"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["status"], "uploaded");
    assert_eq!(json["job_id"], "job-1");
    assert_eq!(json["size_bytes"], 17);
    assert_eq!(json["download_url"], "/v1/files/job-1/download");

    let response = app
        .clone()
        .oneshot(get("/v1/files/job-1/download?keep=true"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(http::header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(disposition.contains("job-1.zip"), "got {disposition}");

    let data = body_bytes(response).await;
    assert_eq!(&data[..], b"0123456789abcdefg");
}

#[tokio::test]
async fn multipart_upload_is_accepted() {
    let app = build_app(build_state());

    let boundary = "X-DEPOT-TEST-BOUNDARY";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"job_id\"\r\n\r\n\
         job-mp\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"job-mp.zip\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n\
         multipart payload\r\n\
         --{boundary}--\r\n"
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(http::Method::POST)
                .uri("/v1/files")
                .header(
                    http::header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(get("/v1/files/job-mp/download?keep=true"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_bytes(response).await;
    assert_eq!(&data[..], b"multipart payload");
}

#[tokio::test]
async fn upload_with_empty_body_is_rejected() {
    let app = build_app(build_state());

    let response = app
        .oneshot(
            Request::builder()
                .method(http::Method::PUT)
                .uri("/v1/files/job-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn download_unknown_job_returns_404() {
    let app = build_app(build_state());

    let response = app
        .oneshot(get("/v1/files/nope/download"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn download_after_delete_returns_410() {
    let app = build_app(build_state());

    app.clone()
        .oneshot(put_upload("job-1", b"data"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(http::Method::DELETE)
                .uri("/v1/files/job-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "deleted");

    let response = app
        .oneshot(get("/v1/files/job-1/download"))
        .await
        .unwrap();
    assert_eq!(
        response.status(),
        StatusCode::GONE,
        "a tombstoned archive is 410, not 404"
    );
}

#[tokio::test]
async fn delete_twice_returns_404() {
    let app = build_app(build_state());

    app.clone()
        .oneshot(put_upload("job-1", b"data"))
        .await
        .unwrap();

    let delete = || {
        Request::builder()
            .method(http::Method::DELETE)
            .uri("/v1/files/job-1")
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn auto_delete_removes_archive_after_download() {
    let app = build_app(build_state());

    app.clone()
        .oneshot(put_upload("job-1", b"one-shot archive"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get("/v1/files/job-1/download"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_bytes(response).await;
    assert_eq!(&data[..], b"one-shot archive");

    // Let the deferred deletion fire.
    tokio::time::sleep(Duration::from_secs(5)).await;

    let response = app
        .clone()
        .oneshot(get("/v1/files/job-1/download"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::GONE);

    let response = app.oneshot(get("/v1/files/job-1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn keep_true_survives_auto_delete_policy() {
    let app = build_app(build_state());

    app.clone()
        .oneshot(put_upload("job-1", b"keep me"))
        .await
        .unwrap();

    app.clone()
        .oneshot(get("/v1/files/job-1/download?keep=true"))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;

    let response = app
        .oneshot(get("/v1/files/job-1/download?keep=true"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_bytes(response).await;
    assert_eq!(&data[..], b"keep me");
}

#[tokio::test]
async fn check_reports_record_fields() {
    let app = build_app(build_state());

    app.clone()
        .oneshot(put_upload("job-1", b"payload"))
        .await
        .unwrap();

    let response = app.oneshot(get("/v1/files/job-1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["job_id"], "job-1");
    assert_eq!(json["size_bytes"], 7);
    assert_eq!(json["deleted"], false);
    assert!(json["downloaded_at"].is_null());
}

#[tokio::test]
async fn list_returns_uploaded_records() {
    let app = build_app(build_state());

    for id in ["a", "b", "c"] {
        app.clone().oneshot(put_upload(id, b"x")).await.unwrap();
    }

    let response = app.oneshot(get("/v1/files?limit=2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["files"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn settings_update_roundtrip() {
    let app = build_app(build_state());

    let response = app.clone().oneshot(get("/v1/settings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["cleanup_enabled"], false);
    assert_eq!(json["cleanup_max_age_hours"], 24);
    assert!(json["cleanup_last_run"].is_null());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(http::Method::PUT)
                .uri("/v1/settings")
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"cleanup_enabled": true, "cleanup_max_age_hours": 48}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["cleanup_enabled"], true);
    assert_eq!(json["cleanup_max_age_hours"], 48);

    let response = app.oneshot(get("/v1/settings")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["cleanup_enabled"], true);
    assert_eq!(json["cleanup_max_age_hours"], 48);
}

#[tokio::test]
async fn settings_reject_zero_hours() {
    let app = build_app(build_state());

    let response = app
        .oneshot(
            Request::builder()
                .method(http::Method::PUT)
                .uri("/v1/settings")
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"cleanup_max_age_hours": 0}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cleanup_endpoint_reports_policy_state() {
    let app = build_app(build_state());

    // Disabled by default: the sweep is skipped.
    let cleanup = || {
        Request::builder()
            .method(http::Method::POST)
            .uri("/v1/cleanup")
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(cleanup()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "skipped");
    assert_eq!(json["deleted_count"], 0);

    app.clone()
        .oneshot(
            Request::builder()
                .method(http::Method::PUT)
                .uri("/v1/settings")
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"cleanup_enabled": true}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app.oneshot(cleanup()).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["status"], "completed");
    assert_eq!(json["deleted_count"], 0);
    assert_eq!(json["max_age_hours"], 24);
}

#[tokio::test]
async fn stats_reflect_uploads() {
    let app = build_app(build_state());

    app.clone()
        .oneshot(put_upload("job-1", b"0123456789abcdefg"))
        .await
        .unwrap();

    let response = app.oneshot(get("/v1/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["active"], 1);
    assert_eq!(json["deleted"], 0);
    assert_eq!(json["total_size_bytes"], 17);
    assert_eq!(json["total_size_human"], "17 B");
}

#[tokio::test]
async fn protected_routes_require_an_api_key() {
    let state = build_state_with(EngineConfig::default(), Some("s3cret"));
    let app = build_app(state);

    // Health stays public.
    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // No key.
    let response = app.clone().oneshot(get("/v1/files")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong key.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/files")
                .header("X-API-Key", "wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Bearer token.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/files")
                .header(http::header::AUTHORIZATION, "Bearer s3cret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // X-API-Key header.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/files")
                .header("X-API-Key", "s3cret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = build_app(build_state());

    let response = app.oneshot(get("/api-doc/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["info"]["title"], "Depot Storage API");
    assert!(json["paths"]["/v1/files/{job_id}/download"].is_object());
}
