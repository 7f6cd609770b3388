use async_trait::async_trait;
use bytes::Bytes;

use crate::error::BlobError;

/// Pluggable blob storage backend, one binary object per job id.
///
/// The object's location is derived deterministically from the job id, so
/// a re-upload overwrites the previous object in place. A missing object
/// is never an error on `delete`; the lifecycle layer relies on that to
/// make deletion idempotent across the reaper, the sweeper, and manual
/// deletes.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store an object, overwriting any previous one for this job id.
    /// Returns the location string to record on the file record.
    async fn put(&self, job_id: &str, data: Bytes) -> Result<String, BlobError>;

    /// Retrieve the object for a job id. Returns `None` if absent.
    async fn get(&self, job_id: &str) -> Result<Option<Bytes>, BlobError>;

    /// Remove the object. Returns `true` if it existed; a missing object
    /// is a successful no-op.
    async fn delete(&self, job_id: &str) -> Result<bool, BlobError>;

    /// Check whether the object is present.
    async fn exists(&self, job_id: &str) -> Result<bool, BlobError>;
}
