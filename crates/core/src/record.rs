use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored archive, one per job id.
///
/// The record outlives its blob: deletion tombstones the row (`deleted`)
/// while the backing object is removed from the blob store. Rows are never
/// physically deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FileRecord {
    /// Caller-supplied opaque identifier. Primary identity, immutable.
    pub job_id: String,
    /// Location of the backing object in the blob store.
    pub blob_path: String,
    /// Byte length of the archive at upload time.
    pub size_bytes: u64,
    /// When the archive was uploaded (re-uploads reset this).
    pub uploaded_at: DateTime<Utc>,
    /// When the archive was first downloaded. Set once; later downloads do
    /// not move it, so the cleanup cutoff stays anchored to the first
    /// retrieval.
    #[serde(default)]
    pub downloaded_at: Option<DateTime<Utc>>,
    /// Tombstone flag. Once set it is never reverted.
    #[serde(default)]
    pub deleted: bool,
}

impl FileRecord {
    /// Create a fresh record for a newly uploaded archive.
    pub fn new(
        job_id: impl Into<String>,
        blob_path: impl Into<String>,
        size_bytes: u64,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            blob_path: blob_path.into(),
            size_bytes,
            uploaded_at,
            downloaded_at: None,
            deleted: false,
        }
    }

    /// Returns `true` if the archive has been downloaded at least once.
    pub fn is_downloaded(&self) -> bool {
        self.downloaded_at.is_some()
    }
}
