use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-job-id mutual exclusion for lifecycle transitions.
///
/// Download-and-delete, manual delete, the reaper, and the sweeper may all
/// target the same record concurrently; holding the record's mutex across
/// the whole blob-removal + tombstone sequence keeps those transitions
/// from interleaving. Locking is in-process only, matching the
/// single-process deployment model.
///
/// Entries are retained for the life of the engine, one per job id seen,
/// mirroring the record table (records are tombstoned, never removed).
#[derive(Debug, Default)]
pub(crate) struct RecordLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl RecordLocks {
    /// Acquire the mutex for `job_id`, waiting if another transition on
    /// the same record is in flight.
    pub(crate) async fn acquire(&self, job_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(job_id.to_owned())
            .or_default()
            .clone();
        lock.lock_owned().await
    }
}
