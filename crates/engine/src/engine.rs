use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use depot_blob::BlobStore;
use depot_core::settings as setting_keys;
use depot_core::{CleanupPolicy, CleanupReport, CleanupStatus, FileRecord, RecordStats};
use depot_store::{RecordStore, SettingsStore, StoreError};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::locks::RecordLocks;
use crate::reaper::Reaper;

/// The archive lifecycle engine.
///
/// Owns every record state transition: upload, retrieval (with the
/// deferred-deletion protocol), manual deletion, and the cleanup sweep.
/// All transitions for one job id are serialized through a per-record
/// mutex, so the reaper, the sweeper, and concurrent requests cannot
/// interleave a blob removal with a tombstone write.
pub struct Engine {
    records: Arc<dyn RecordStore>,
    settings: Arc<dyn SettingsStore>,
    blobs: Arc<dyn BlobStore>,
    locks: Arc<RecordLocks>,
    reaper: Reaper,
    config: EngineConfig,
}

/// Builder for assembling an [`Engine`] from its stores.
#[derive(Default)]
pub struct EngineBuilder {
    records: Option<Arc<dyn RecordStore>>,
    settings: Option<Arc<dyn SettingsStore>>,
    blobs: Option<Arc<dyn BlobStore>>,
    config: EngineConfig,
}

impl EngineBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the record store backend.
    #[must_use]
    pub fn records(mut self, records: Arc<dyn RecordStore>) -> Self {
        self.records = Some(records);
        self
    }

    /// Set the settings store backend.
    #[must_use]
    pub fn settings(mut self, settings: Arc<dyn SettingsStore>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Set the blob store backend.
    #[must_use]
    pub fn blobs(mut self, blobs: Arc<dyn BlobStore>) -> Self {
        self.blobs = Some(blobs);
        self
    }

    /// Set the engine configuration.
    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the engine and spawn its deletion worker.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`] if a store is missing.
    pub fn build(self) -> Result<Engine, EngineError> {
        let records = self
            .records
            .ok_or_else(|| EngineError::Configuration("record store is required".into()))?;
        let settings = self
            .settings
            .ok_or_else(|| EngineError::Configuration("settings store is required".into()))?;
        let blobs = self
            .blobs
            .ok_or_else(|| EngineError::Configuration("blob store is required".into()))?;

        let locks = Arc::new(RecordLocks::default());
        let reaper = Reaper::spawn(
            Arc::clone(&records),
            Arc::clone(&blobs),
            Arc::clone(&locks),
            self.config.delete_delay,
        );

        Ok(Engine {
            records,
            settings,
            blobs,
            locks,
            reaper,
            config: self.config,
        })
    }
}

impl Engine {
    /// Create a builder.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Store an archive under `job_id`, fully replacing any previous one.
    ///
    /// The record's lifecycle starts over: not downloaded, not deleted.
    pub async fn upload(&self, job_id: &str, data: Bytes) -> Result<FileRecord, EngineError> {
        validate_job_id(job_id)?;
        if data.is_empty() {
            return Err(EngineError::InvalidInput(
                "archive payload must not be empty".into(),
            ));
        }

        let _guard = self.locks.acquire(job_id).await;

        let size_bytes = data.len() as u64;
        let blob_path = self.blobs.put(job_id, data).await?;
        let record = FileRecord::new(job_id, blob_path, size_bytes, Utc::now());
        self.records.put(record.clone()).await?;

        tracing::info!(job_id, size_bytes, "archive uploaded");
        Ok(record)
    }

    /// Retrieve the archive for `job_id`.
    ///
    /// The download timestamp is recorded before the content is handed
    /// back, so it survives a transfer that fails partway. With
    /// auto-delete enabled and `keep == false`, deletion of the archive is
    /// scheduled with the reaper; it runs after the configured delay,
    /// independent of this request.
    pub async fn retrieve(
        &self,
        job_id: &str,
        keep: bool,
    ) -> Result<(FileRecord, Bytes), EngineError> {
        validate_job_id(job_id)?;

        let _guard = self.locks.acquire(job_id).await;

        let record = self
            .records
            .get(job_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(job_id.to_owned()))?;
        if record.deleted {
            return Err(EngineError::Gone(job_id.to_owned()));
        }

        let Some(data) = self.blobs.get(job_id).await? else {
            // Record and blob disagree; surface as NotFound but flag the
            // inconsistency.
            tracing::warn!(job_id, blob_path = %record.blob_path, "record is live but blob is missing");
            return Err(EngineError::NotFound(job_id.to_owned()));
        };

        let record = self.records.mark_downloaded(job_id, Utc::now()).await?;

        let should_delete = self.config.auto_delete && !keep;
        if should_delete {
            self.reaper.schedule(job_id);
            tracing::debug!(job_id, "deletion scheduled after download");
        }

        Ok((record, data))
    }

    /// Delete the archive for `job_id` now.
    ///
    /// Fails with [`EngineError::NotFound`] when the id is unknown or the
    /// record is already tombstoned.
    pub async fn delete(&self, job_id: &str) -> Result<(), EngineError> {
        validate_job_id(job_id)?;

        let _guard = self.locks.acquire(job_id).await;

        let record = self
            .records
            .get(job_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(job_id.to_owned()))?;
        if record.deleted {
            return Err(EngineError::NotFound(job_id.to_owned()));
        }

        self.blobs.delete(job_id).await?;
        self.records.mark_deleted(job_id).await?;

        tracing::info!(job_id, "archive deleted");
        Ok(())
    }

    /// Check that `job_id` is retrievable: live record and present blob.
    pub async fn check(&self, job_id: &str) -> Result<FileRecord, EngineError> {
        validate_job_id(job_id)?;

        let record = self
            .records
            .get(job_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(job_id.to_owned()))?;
        if record.deleted || !self.blobs.exists(job_id).await? {
            return Err(EngineError::NotFound(job_id.to_owned()));
        }
        Ok(record)
    }

    /// List records, newest upload first.
    pub async fn list(&self, limit: usize, offset: usize) -> Result<Vec<FileRecord>, EngineError> {
        Ok(self.records.list(limit, offset).await?)
    }

    /// Aggregate storage statistics.
    pub async fn stats(&self) -> Result<RecordStats, EngineError> {
        Ok(self.records.stats().await?)
    }

    /// Run one cleanup sweep at `now`.
    ///
    /// Tombstones every record first downloaded before the policy cutoff.
    /// A per-record failure is logged and skipped; the sweep continues.
    /// `cleanup_last_run` is updated whenever the sweep executes, even if
    /// nothing was eligible.
    pub async fn run_cleanup(&self, now: DateTime<Utc>) -> Result<CleanupReport, EngineError> {
        let policy = self.cleanup_policy().await?;
        if !policy.enabled {
            tracing::debug!("cleanup is disabled, sweep skipped");
            return Ok(CleanupReport::skipped(&policy, now));
        }

        let cutoff = policy.cutoff(now);
        let candidates = self.records.cleanup_candidates(cutoff).await?;

        let mut deleted_count = 0u64;
        for candidate in candidates {
            let job_id = candidate.job_id.as_str();
            let _guard = self.locks.acquire(job_id).await;

            // Re-read under the lock; the reaper or a manual delete may
            // have won the race since the candidate scan.
            let fresh = match self.records.get(job_id).await {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(e) => {
                    tracing::error!(job_id, error = %e, "cleanup could not re-read record, skipping");
                    continue;
                }
            };
            if fresh.deleted {
                continue;
            }

            if let Err(e) = self.blobs.delete(job_id).await {
                // Leave the record live so a later sweep retries.
                tracing::error!(job_id, error = %e, "cleanup blob removal failed, record skipped");
                continue;
            }

            match self.records.mark_deleted(job_id).await {
                Ok(()) => {
                    deleted_count += 1;
                    tracing::info!(job_id, "cleanup removed expired archive");
                }
                Err(StoreError::NotFound(_)) => {}
                Err(e) => {
                    tracing::error!(job_id, error = %e, "cleanup could not tombstone record");
                }
            }
        }

        self.settings
            .set(setting_keys::CLEANUP_LAST_RUN, &now.to_rfc3339())
            .await?;

        tracing::info!(
            deleted_count,
            max_age_hours = policy.max_age_hours,
            "cleanup sweep completed"
        );

        Ok(CleanupReport {
            status: CleanupStatus::Completed,
            deleted_count,
            max_age_hours: policy.max_age_hours,
            timestamp: now,
        })
    }

    /// The effective cleanup policy from the settings table.
    pub async fn cleanup_policy(&self) -> Result<CleanupPolicy, EngineError> {
        let enabled = self.settings.get(setting_keys::CLEANUP_ENABLED).await?;
        let max_age = self
            .settings
            .get(setting_keys::CLEANUP_MAX_AGE_HOURS)
            .await?;
        Ok(CleanupPolicy::from_values(
            enabled.as_deref(),
            max_age.as_deref(),
        ))
    }

    /// Get one setting value.
    pub async fn setting(&self, key: &str) -> Result<Option<String>, EngineError> {
        require_known_key(key)?;
        Ok(self.settings.get(key).await?)
    }

    /// Set one setting value, validating it for its key.
    pub async fn set_setting(&self, key: &str, value: &str) -> Result<(), EngineError> {
        require_known_key(key)?;
        validate_setting_value(key, value)?;
        self.settings.set(key, value).await?;
        tracing::info!(key, value, "setting updated");
        Ok(())
    }

    /// All stored settings.
    pub async fn settings(&self) -> Result<Vec<(String, String)>, EngineError> {
        Ok(self.settings.all().await?)
    }
}

/// Reject ids that are empty or could escape the blob root.
fn validate_job_id(job_id: &str) -> Result<(), EngineError> {
    if job_id.is_empty() {
        return Err(EngineError::InvalidInput("job id must not be empty".into()));
    }
    if job_id == "." || job_id == ".." || job_id.contains('/') || job_id.contains('\\') {
        return Err(EngineError::InvalidInput(format!(
            "job id must not contain path separators: {job_id}"
        )));
    }
    Ok(())
}

fn require_known_key(key: &str) -> Result<(), EngineError> {
    if setting_keys::is_known_key(key) {
        Ok(())
    } else {
        Err(EngineError::InvalidInput(format!("unknown setting: {key}")))
    }
}

fn validate_setting_value(key: &str, value: &str) -> Result<(), EngineError> {
    match key {
        setting_keys::CLEANUP_ENABLED if value == "true" || value == "false" => Ok(()),
        setting_keys::CLEANUP_ENABLED => Err(EngineError::InvalidInput(format!(
            "{key} must be \"true\" or \"false\""
        ))),
        setting_keys::CLEANUP_MAX_AGE_HOURS => match value.parse::<u32>() {
            Ok(hours) if hours > 0 => Ok(()),
            _ => Err(EngineError::InvalidInput(format!(
                "{key} must be a positive integer"
            ))),
        },
        setting_keys::CLEANUP_LAST_RUN => match DateTime::parse_from_rfc3339(value) {
            Ok(_) => Ok(()),
            Err(_) => Err(EngineError::InvalidInput(format!(
                "{key} must be an RFC 3339 timestamp"
            ))),
        },
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;

    use chrono::Duration;

    use depot_blob_memory::MemoryBlobStore;
    use depot_store_memory::{MemoryRecordStore, MemorySettingsStore};

    use super::*;

    /// A 17-byte payload, matching the canonical upload scenario.
    const PAYLOAD: &[u8] = b"0123456789abcdefg";

    struct Harness {
        engine: Engine,
        records: Arc<MemoryRecordStore>,
        blobs: Arc<MemoryBlobStore>,
    }

    fn harness(config: EngineConfig) -> Harness {
        let records = Arc::new(MemoryRecordStore::new());
        let settings = Arc::new(MemorySettingsStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());

        let engine = Engine::builder()
            .records(Arc::clone(&records) as Arc<dyn RecordStore>)
            .settings(settings as Arc<dyn SettingsStore>)
            .blobs(Arc::clone(&blobs) as Arc<dyn BlobStore>)
            .config(config)
            .build()
            .expect("engine should build");

        Harness {
            engine,
            records,
            blobs,
        }
    }

    fn default_harness() -> Harness {
        harness(EngineConfig::default())
    }

    #[tokio::test]
    async fn upload_then_check_shows_fresh_record() {
        let h = default_harness();

        let record = h
            .engine
            .upload("job-1", Bytes::from_static(PAYLOAD))
            .await
            .unwrap();
        assert_eq!(record.size_bytes, 17);
        assert!(!record.deleted);
        assert!(record.downloaded_at.is_none());

        let checked = h.engine.check("job-1").await.unwrap();
        assert_eq!(checked.job_id, "job-1");
        assert_eq!(checked.size_bytes, 17);
    }

    #[tokio::test]
    async fn upload_rejects_bad_input() {
        let h = default_harness();

        let empty_id = h.engine.upload("", Bytes::from_static(PAYLOAD)).await;
        assert!(matches!(empty_id, Err(EngineError::InvalidInput(_))));

        let empty_payload = h.engine.upload("job-1", Bytes::new()).await;
        assert!(matches!(empty_payload, Err(EngineError::InvalidInput(_))));

        for bad in ["a/b", "a\\b", ".", ".."] {
            let result = h.engine.upload(bad, Bytes::from_static(PAYLOAD)).await;
            assert!(
                matches!(result, Err(EngineError::InvalidInput(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retrieve_with_keep_never_deletes() {
        let h = default_harness();
        h.engine
            .upload("job-1", Bytes::from_static(PAYLOAD))
            .await
            .unwrap();

        let (record, data) = h.engine.retrieve("job-1", true).await.unwrap();
        assert_eq!(&data[..], PAYLOAD);
        assert!(record.downloaded_at.is_some());

        // Give any (wrongly) scheduled deletion ample time to fire.
        tokio::time::sleep(StdDuration::from_secs(10)).await;

        let record = h.records.get("job-1").await.unwrap().unwrap();
        assert!(!record.deleted);
        let (_, data) = h.engine.retrieve("job-1", true).await.unwrap();
        assert_eq!(&data[..], PAYLOAD, "record stays retrievable");
    }

    #[tokio::test(start_paused = true)]
    async fn retrieve_with_auto_delete_tombstones_after_delay() {
        let h = default_harness();
        h.engine
            .upload("job-1", Bytes::from_static(PAYLOAD))
            .await
            .unwrap();

        let (_, data) = h.engine.retrieve("job-1", false).await.unwrap();
        assert_eq!(&data[..], PAYLOAD, "the retrieval itself returns the full content");

        // Not yet: the reaper waits out its delay first.
        let record = h.records.get("job-1").await.unwrap().unwrap();
        assert!(!record.deleted);

        tokio::time::sleep(StdDuration::from_secs(5)).await;

        let record = h.records.get("job-1").await.unwrap().unwrap();
        assert!(record.deleted);
        assert!(!h.blobs.exists("job-1").await.unwrap());

        let result = h.engine.retrieve("job-1", false).await;
        assert!(matches!(result, Err(EngineError::Gone(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn auto_delete_disabled_keeps_everything() {
        let h = harness(EngineConfig {
            auto_delete: false,
            ..EngineConfig::default()
        });
        h.engine
            .upload("job-1", Bytes::from_static(PAYLOAD))
            .await
            .unwrap();

        h.engine.retrieve("job-1", false).await.unwrap();
        tokio::time::sleep(StdDuration::from_secs(10)).await;

        let record = h.records.get("job-1").await.unwrap().unwrap();
        assert!(!record.deleted);
    }

    #[tokio::test]
    async fn retrieve_distinguishes_gone_from_not_found() {
        let h = default_harness();

        let missing = h.engine.retrieve("never-uploaded", false).await;
        assert!(matches!(missing, Err(EngineError::NotFound(_))));

        h.engine
            .upload("job-1", Bytes::from_static(PAYLOAD))
            .await
            .unwrap();
        h.engine.delete("job-1").await.unwrap();

        let gone = h.engine.retrieve("job-1", false).await;
        assert!(
            matches!(gone, Err(EngineError::Gone(_))),
            "a tombstoned record is Gone, never NotFound"
        );
    }

    #[tokio::test]
    async fn retrieve_reports_missing_blob_as_not_found() {
        let h = default_harness();
        h.engine
            .upload("job-1", Bytes::from_static(PAYLOAD))
            .await
            .unwrap();

        // Simulate an inconsistency: the blob vanishes behind the record.
        h.blobs.delete("job-1").await.unwrap();

        let result = h.engine.retrieve("job-1", false).await;
        assert!(matches!(result, Err(EngineError::NotFound(_))));
    }

    #[tokio::test]
    async fn repeated_retrieval_keeps_first_download_time() {
        let h = default_harness();
        h.engine
            .upload("job-1", Bytes::from_static(PAYLOAD))
            .await
            .unwrap();

        let (first, _) = h.engine.retrieve("job-1", true).await.unwrap();
        let (second, _) = h.engine.retrieve("job-1", true).await.unwrap();
        assert_eq!(
            second.downloaded_at, first.downloaded_at,
            "downloaded_at anchors to the first retrieval"
        );
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let h = default_harness();
        h.engine
            .upload("job-1", Bytes::from_static(PAYLOAD))
            .await
            .unwrap();

        h.engine.delete("job-1").await.unwrap();
        let record = h.records.get("job-1").await.unwrap().unwrap();
        assert!(record.deleted);
        assert!(!h.blobs.exists("job-1").await.unwrap());

        let second = h.engine.delete("job-1").await;
        assert!(matches!(second, Err(EngineError::NotFound(_))));

        // The first delete's effect is unchanged by the failed second one.
        let record = h.records.get("job-1").await.unwrap().unwrap();
        assert!(record.deleted);
    }

    #[tokio::test]
    async fn reupload_restarts_the_lifecycle() {
        let h = default_harness();
        h.engine
            .upload("job-1", Bytes::from_static(PAYLOAD))
            .await
            .unwrap();
        h.engine.retrieve("job-1", true).await.unwrap();
        h.engine.delete("job-1").await.unwrap();

        let record = h
            .engine
            .upload("job-1", Bytes::from_static(b"fresh archive"))
            .await
            .unwrap();
        assert!(!record.deleted);
        assert!(record.downloaded_at.is_none());

        let (_, data) = h.engine.retrieve("job-1", true).await.unwrap();
        assert_eq!(&data[..], b"fresh archive");
    }

    #[tokio::test]
    async fn cleanup_disabled_touches_nothing() {
        let h = default_harness();
        h.engine
            .upload("job-1", Bytes::from_static(PAYLOAD))
            .await
            .unwrap();
        h.records
            .mark_downloaded("job-1", Utc::now() - Duration::hours(48))
            .await
            .unwrap();

        let report = h.engine.run_cleanup(Utc::now()).await.unwrap();
        assert_eq!(report.status, CleanupStatus::Skipped);
        assert_eq!(report.deleted_count, 0);

        let record = h.records.get("job-1").await.unwrap().unwrap();
        assert!(!record.deleted, "a skipped sweep must not touch records");
        assert!(
            h.engine
                .setting(setting_keys::CLEANUP_LAST_RUN)
                .await
                .unwrap()
                .is_none(),
            "a skipped sweep does not count as a run"
        );
    }

    #[tokio::test]
    async fn cleanup_sweeps_only_past_cutoff_downloads() {
        let h = default_harness();
        let now = Utc::now();

        h.engine
            .upload("old", Bytes::from_static(PAYLOAD))
            .await
            .unwrap();
        h.records
            .mark_downloaded("old", now - Duration::hours(25))
            .await
            .unwrap();

        h.engine
            .upload("fresh", Bytes::from_static(PAYLOAD))
            .await
            .unwrap();
        h.records
            .mark_downloaded("fresh", now - Duration::hours(1))
            .await
            .unwrap();

        h.engine
            .upload("unread", Bytes::from_static(PAYLOAD))
            .await
            .unwrap();

        h.engine
            .set_setting(setting_keys::CLEANUP_ENABLED, "true")
            .await
            .unwrap();

        let report = h.engine.run_cleanup(now).await.unwrap();
        assert_eq!(report.status, CleanupStatus::Completed);
        assert_eq!(report.deleted_count, 1);
        assert_eq!(report.max_age_hours, 24);

        assert!(h.records.get("old").await.unwrap().unwrap().deleted);
        assert!(!h.blobs.exists("old").await.unwrap());
        assert!(!h.records.get("fresh").await.unwrap().unwrap().deleted);
        assert!(
            !h.records.get("unread").await.unwrap().unwrap().deleted,
            "never-downloaded records are never swept"
        );

        let last_run = h
            .engine
            .setting(setting_keys::CLEANUP_LAST_RUN)
            .await
            .unwrap();
        assert_eq!(last_run.as_deref(), Some(now.to_rfc3339().as_str()));

        // Idempotent: an immediate re-run has nothing left to do.
        let report = h.engine.run_cleanup(now).await.unwrap();
        assert_eq!(report.deleted_count, 0);
    }

    #[tokio::test]
    async fn cleanup_honors_configured_horizon() {
        let h = default_harness();
        let now = Utc::now();

        h.engine
            .upload("job-1", Bytes::from_static(PAYLOAD))
            .await
            .unwrap();
        h.records
            .mark_downloaded("job-1", now - Duration::hours(25))
            .await
            .unwrap();

        h.engine
            .set_setting(setting_keys::CLEANUP_ENABLED, "true")
            .await
            .unwrap();
        h.engine
            .set_setting(setting_keys::CLEANUP_MAX_AGE_HOURS, "48")
            .await
            .unwrap();

        let report = h.engine.run_cleanup(now).await.unwrap();
        assert_eq!(report.max_age_hours, 48);
        assert_eq!(
            report.deleted_count, 0,
            "25h-old download survives a 48h policy"
        );
    }

    #[tokio::test]
    async fn cleanup_records_last_run_even_when_idle() {
        let h = default_harness();
        h.engine
            .set_setting(setting_keys::CLEANUP_ENABLED, "true")
            .await
            .unwrap();

        let now = Utc::now();
        let report = h.engine.run_cleanup(now).await.unwrap();
        assert_eq!(report.status, CleanupStatus::Completed);
        assert_eq!(report.deleted_count, 0);

        let last_run = h
            .engine
            .setting(setting_keys::CLEANUP_LAST_RUN)
            .await
            .unwrap();
        assert_eq!(last_run.as_deref(), Some(now.to_rfc3339().as_str()));
    }

    #[tokio::test]
    async fn settings_are_validated_on_write() {
        let h = default_harness();

        let unknown = h.engine.set_setting("cleanup_dry_run", "true").await;
        assert!(matches!(unknown, Err(EngineError::InvalidInput(_))));

        let bad_bool = h
            .engine
            .set_setting(setting_keys::CLEANUP_ENABLED, "yes")
            .await;
        assert!(matches!(bad_bool, Err(EngineError::InvalidInput(_))));

        let zero_hours = h
            .engine
            .set_setting(setting_keys::CLEANUP_MAX_AGE_HOURS, "0")
            .await;
        assert!(matches!(zero_hours, Err(EngineError::InvalidInput(_))));

        h.engine
            .set_setting(setting_keys::CLEANUP_MAX_AGE_HOURS, "72")
            .await
            .unwrap();
        let policy = h.engine.cleanup_policy().await.unwrap();
        assert_eq!(policy.max_age_hours, 72);
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let h = default_harness();

        // Uploads happen in order; timestamps may collide at test speed,
        // in which case insertion order breaks the tie.
        h.engine.upload("a", Bytes::from_static(PAYLOAD)).await.unwrap();
        h.engine.upload("b", Bytes::from_static(PAYLOAD)).await.unwrap();
        h.engine.upload("c", Bytes::from_static(PAYLOAD)).await.unwrap();

        let listed = h.engine.list(10, 0).await.unwrap();
        assert_eq!(listed.len(), 3);

        let page = h.engine.list(2, 2).await.unwrap();
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn stats_track_the_lifecycle() {
        let h = default_harness();

        h.engine.upload("a", Bytes::from_static(PAYLOAD)).await.unwrap();
        h.engine.upload("b", Bytes::from_static(PAYLOAD)).await.unwrap();
        h.engine.retrieve("a", true).await.unwrap();
        h.engine.delete("b").await.unwrap();

        let stats = h.engine.stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.deleted, 1);
        assert_eq!(stats.downloaded, 1);
        assert_eq!(stats.total_size_bytes, 17);
    }
}
