//! Wire types for the Depot HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use depot_core::FileRecord;

/// Error response from the API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Response from the health endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when the service is up.
    pub status: String,
    /// Service identifier.
    pub service: String,
    /// Server-side timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Response from an upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Always `"uploaded"`.
    pub status: String,
    /// The job id the archive is stored under.
    pub job_id: String,
    /// Stored payload size in bytes.
    pub size_bytes: u64,
    /// Relative URL the archive can be downloaded from.
    pub download_url: String,
}

/// Response from a manual delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always `"deleted"`.
    pub status: String,
    /// The job id that was deleted.
    pub job_id: String,
}

/// Response from the listing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListFilesResponse {
    /// Records ordered newest upload first.
    pub files: Vec<FileRecord>,
    /// Number of records returned.
    pub count: usize,
}

/// Current cleanup policy settings.
#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsResponse {
    /// Whether the cleanup sweeper may delete anything.
    pub cleanup_enabled: bool,
    /// Retention horizon in hours, measured from the first download.
    pub cleanup_max_age_hours: u32,
    /// When the last sweep executed, if any.
    #[serde(default)]
    pub cleanup_last_run: Option<DateTime<Utc>>,
}

/// Request body for updating cleanup policy settings.
///
/// Omitted fields keep their current value.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    /// New enabled state.
    #[serde(default)]
    pub cleanup_enabled: Option<bool>,
    /// New retention horizon in hours (must be positive).
    #[serde(default)]
    pub cleanup_max_age_hours: Option<u32>,
}

/// Aggregate storage statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    /// All records, tombstoned or not.
    pub total: u64,
    /// Records whose blob is still stored.
    pub active: u64,
    /// Tombstoned records.
    pub deleted: u64,
    /// Records downloaded at least once.
    pub downloaded: u64,
    /// Sum of stored bytes over active records.
    pub total_size_bytes: u64,
    /// Human-readable rendering of `total_size_bytes`.
    pub total_size_human: String,
}
