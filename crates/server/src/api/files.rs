//! Archive upload, download, check, delete, and listing endpoints.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use utoipa::IntoParams;

use depot_engine::EngineError;

use super::AppState;
use super::schemas::{DeleteResponse, ListFilesResponse, UploadResponse};
use crate::error::ServerError;

/// Query parameters for downloads.
#[derive(Debug, Deserialize, IntoParams)]
pub struct DownloadParams {
    /// When `true`, the archive is kept even if auto-delete is configured.
    #[serde(default)]
    pub keep: bool,
}

/// Query parameters for the listing endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListParams {
    /// Maximum number of records to return (default: 100).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Number of records to skip (default: 0).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    100
}

/// `PUT /v1/files/{job_id}` -- upload an archive as a raw request body.
#[utoipa::path(
    put,
    path = "/v1/files/{job_id}",
    tag = "Files",
    summary = "Upload an archive (raw body)",
    description = "Stores the request body as the archive for this job id, fully replacing any previous one.",
    params(("job_id" = String, Path, description = "Job id to store the archive under")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Archive stored", body = UploadResponse),
        (status = 400, description = "Empty job id or payload", body = super::schemas::ErrorResponse),
        (status = 401, description = "Invalid or missing API key", body = super::schemas::ErrorResponse),
    )
)]
pub async fn upload_raw(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ServerError> {
    let record = state.engine.upload(&job_id, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse::from_record(&record)),
    ))
}

/// `POST /v1/files` -- upload an archive as multipart form data.
///
/// Expects a `job_id` text field and a `file` binary field.
#[utoipa::path(
    post,
    path = "/v1/files",
    tag = "Files",
    summary = "Upload an archive (multipart)",
    description = "Stores the `file` field as the archive for the `job_id` field.",
    responses(
        (status = 201, description = "Archive stored", body = UploadResponse),
        (status = 400, description = "Missing field, empty job id, or empty payload", body = super::schemas::ErrorResponse),
        (status = 401, description = "Invalid or missing API key", body = super::schemas::ErrorResponse),
    )
)]
pub async fn upload_multipart(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServerError> {
    let mut job_id: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| EngineError::InvalidInput(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("job_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| EngineError::InvalidInput(format!("bad job_id field: {e}")))?;
                job_id = Some(value);
            }
            Some("file") => {
                let value = field
                    .bytes()
                    .await
                    .map_err(|e| EngineError::InvalidInput(format!("bad file field: {e}")))?;
                data = Some(value);
            }
            _ => {}
        }
    }

    let job_id = job_id
        .ok_or_else(|| EngineError::InvalidInput("missing job_id field".into()))?;
    let data = data.ok_or_else(|| EngineError::InvalidInput("missing file field".into()))?;

    let record = state.engine.upload(&job_id, data).await?;
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse::from_record(&record)),
    ))
}

/// `GET /v1/files/{job_id}/download` -- download an archive.
#[utoipa::path(
    get,
    path = "/v1/files/{job_id}/download",
    tag = "Files",
    summary = "Download an archive",
    description = "Returns the archive bytes. Unless `keep=true` is passed, a configured \
                   auto-delete policy deletes the archive shortly after the download.",
    params(
        ("job_id" = String, Path, description = "Job id of the archive"),
        DownloadParams,
    ),
    responses(
        (status = 200, description = "Archive content", body = Vec<u8>, content_type = "application/zip"),
        (status = 404, description = "Unknown job id or blob missing", body = super::schemas::ErrorResponse),
        (status = 410, description = "Archive already deleted", body = super::schemas::ErrorResponse),
    )
)]
pub async fn download_file(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, ServerError> {
    let (record, data) = state.engine.retrieve(&job_id, params.keep).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_owned()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.zip\"", record.job_id),
        ),
    ];
    Ok((headers, data).into_response())
}

/// `GET /v1/files/{job_id}` -- check that an archive is retrievable.
#[utoipa::path(
    get,
    path = "/v1/files/{job_id}",
    tag = "Files",
    summary = "Check an archive",
    description = "Returns the record if the archive exists, is not deleted, and its blob is present.",
    params(("job_id" = String, Path, description = "Job id to check")),
    responses(
        (status = 200, description = "Archive is retrievable", body = depot_core::FileRecord),
        (status = 404, description = "Unknown, deleted, or blob missing", body = super::schemas::ErrorResponse),
    )
)]
pub async fn check_file(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let record = state.engine.check(&job_id).await?;
    Ok(Json(record))
}

/// `DELETE /v1/files/{job_id}` -- delete an archive now.
#[utoipa::path(
    delete,
    path = "/v1/files/{job_id}",
    tag = "Files",
    summary = "Delete an archive",
    description = "Removes the blob and tombstones the record.",
    params(("job_id" = String, Path, description = "Job id to delete")),
    responses(
        (status = 200, description = "Archive deleted", body = DeleteResponse),
        (status = 404, description = "Unknown job id or already deleted", body = super::schemas::ErrorResponse),
    )
)]
pub async fn delete_file(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    state.engine.delete(&job_id).await?;
    Ok(Json(DeleteResponse {
        status: "deleted".to_owned(),
        job_id,
    }))
}

/// `GET /v1/files` -- list stored records.
#[utoipa::path(
    get,
    path = "/v1/files",
    tag = "Files",
    summary = "List archives",
    description = "Lists records ordered by upload time, newest first. Tombstoned records are included.",
    params(ListParams),
    responses(
        (status = 200, description = "Record listing", body = ListFilesResponse),
    )
)]
pub async fn list_files(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ServerError> {
    let files = state.engine.list(params.limit, params.offset).await?;
    let count = files.len();
    Ok(Json(ListFilesResponse { files, count }))
}
