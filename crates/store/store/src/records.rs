use async_trait::async_trait;
use chrono::{DateTime, Utc};

use depot_core::{FileRecord, RecordStats};

use crate::error::StoreError;

/// Trait for persisting file records.
///
/// The record store is the single owner of lifecycle transitions: callers
/// request a transition through these methods and never mutate a
/// [`FileRecord`] they hold. Implementations must be `Send + Sync` and safe
/// for concurrent access; mutations for a single `job_id` must not
/// interleave.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert or fully replace the record for `record.job_id`.
    ///
    /// A replace resets the whole lifecycle: the previous `downloaded_at`
    /// and `deleted` values are discarded, not merged.
    async fn put(&self, record: FileRecord) -> Result<(), StoreError>;

    /// Look up a record by job id.
    async fn get(&self, job_id: &str) -> Result<Option<FileRecord>, StoreError>;

    /// Record the first download at `at` and return the updated record.
    ///
    /// If `downloaded_at` is already set the record is returned unchanged
    /// (set-once semantics). Fails with [`StoreError::NotFound`] if no
    /// record exists. The tombstone flag is not checked here; callers gate
    /// on `deleted` before downloading.
    async fn mark_downloaded(
        &self,
        job_id: &str,
        at: DateTime<Utc>,
    ) -> Result<FileRecord, StoreError>;

    /// Tombstone the record.
    ///
    /// Idempotent: tombstoning an already-deleted record is a no-op
    /// success, so the sweeper and a concurrent manual delete can both
    /// target the same id. Fails with [`StoreError::NotFound`] only when
    /// no record exists at all.
    async fn mark_deleted(&self, job_id: &str) -> Result<(), StoreError>;

    /// List records ordered by `uploaded_at` descending, ties broken by
    /// insertion order. A pure function of `limit`/`offset`.
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<FileRecord>, StoreError>;

    /// Records eligible for cleanup: not tombstoned, downloaded at least
    /// once, and first downloaded strictly before `cutoff`.
    async fn cleanup_candidates(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<FileRecord>, StoreError>;

    /// Aggregate statistics over all records.
    async fn stats(&self) -> Result<RecordStats, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify object safety.
    fn _assert_dyn_record_store(_: &dyn RecordStore) {}
}
