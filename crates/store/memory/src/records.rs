use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use depot_core::{FileRecord, RecordStats};
use depot_store::error::StoreError;
use depot_store::records::RecordStore;

/// A stored record plus its insertion sequence number.
///
/// The sequence breaks `uploaded_at` ties in [`RecordStore::list`]: records
/// uploaded at the same instant come back in insertion order.
#[derive(Debug, Clone)]
struct Entry {
    record: FileRecord,
    seq: u64,
}

/// In-memory [`RecordStore`] backed by a [`DashMap`].
///
/// Mutations for one job id go through the map's per-entry locking, so
/// concurrent transitions on the same record cannot interleave. Intended
/// for tests and ephemeral single-process deployments; nothing survives a
/// restart.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    data: DashMap<String, Entry>,
    next_seq: AtomicU64,
}

impl MemoryRecordStore {
    /// Create a new, empty in-memory record store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn put(&self, record: FileRecord) -> Result<(), StoreError> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.data
            .insert(record.job_id.clone(), Entry { record, seq });
        Ok(())
    }

    async fn get(&self, job_id: &str) -> Result<Option<FileRecord>, StoreError> {
        Ok(self.data.get(job_id).map(|entry| entry.record.clone()))
    }

    async fn mark_downloaded(
        &self,
        job_id: &str,
        at: DateTime<Utc>,
    ) -> Result<FileRecord, StoreError> {
        let Some(mut entry) = self.data.get_mut(job_id) else {
            return Err(StoreError::NotFound(job_id.to_owned()));
        };

        entry.record.downloaded_at.get_or_insert(at);
        Ok(entry.record.clone())
    }

    async fn mark_deleted(&self, job_id: &str) -> Result<(), StoreError> {
        let Some(mut entry) = self.data.get_mut(job_id) else {
            return Err(StoreError::NotFound(job_id.to_owned()));
        };

        entry.record.deleted = true;
        Ok(())
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<FileRecord>, StoreError> {
        let mut entries: Vec<Entry> = self.data.iter().map(|e| e.value().clone()).collect();
        entries.sort_by(|a, b| {
            b.record
                .uploaded_at
                .cmp(&a.record.uploaded_at)
                .then(a.seq.cmp(&b.seq))
        });

        Ok(entries
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|e| e.record)
            .collect())
    }

    async fn cleanup_candidates(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<FileRecord>, StoreError> {
        Ok(self
            .data
            .iter()
            .filter(|e| {
                let record = &e.value().record;
                !record.deleted && record.downloaded_at.is_some_and(|at| at < cutoff)
            })
            .map(|e| e.value().record.clone())
            .collect())
    }

    async fn stats(&self) -> Result<RecordStats, StoreError> {
        let mut stats = RecordStats::default();
        for entry in &self.data {
            let record = &entry.value().record;
            stats.total += 1;
            if record.deleted {
                stats.deleted += 1;
            } else {
                stats.active += 1;
                stats.total_size_bytes += record.size_bytes;
            }
            if record.downloaded_at.is_some() {
                stats.downloaded += 1;
            }
        }
        Ok(stats)
    }
}
