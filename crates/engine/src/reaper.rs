use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use depot_blob::BlobStore;
use depot_store::{RecordStore, StoreError};

use crate::locks::RecordLocks;

/// A scheduled deletion of one downloaded archive.
struct DeleteJob {
    job_id: String,
    due: Instant,
}

/// Executes delete-after-download actions decoupled from the request that
/// scheduled them.
///
/// Jobs go over an unbounded channel to a worker task owned by the engine,
/// so a deletion runs even when the originating request's handler has long
/// returned. Each job carries its due time (enqueue + delay), computed up
/// front so queue backlog does not stretch the delay. Completion and
/// failure are logged; a job is never dropped silently.
pub(crate) struct Reaper {
    tx: mpsc::UnboundedSender<DeleteJob>,
    delay: Duration,
}

impl Reaper {
    /// Spawn the worker task and return the scheduling handle.
    pub(crate) fn spawn(
        records: Arc<dyn RecordStore>,
        blobs: Arc<dyn BlobStore>,
        locks: Arc<RecordLocks>,
        delay: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(rx, records, blobs, locks));
        Self { tx, delay }
    }

    /// Schedule deletion of `job_id` after the configured delay.
    ///
    /// Fire-and-forget; the deletion cannot be cancelled once scheduled.
    pub(crate) fn schedule(&self, job_id: &str) {
        let job = DeleteJob {
            job_id: job_id.to_owned(),
            due: Instant::now() + self.delay,
        };
        if self.tx.send(job).is_err() {
            // Only possible once the worker is gone, i.e. at shutdown.
            tracing::error!(job_id, "deletion worker unavailable, deletion not scheduled");
        }
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<DeleteJob>,
    records: Arc<dyn RecordStore>,
    blobs: Arc<dyn BlobStore>,
    locks: Arc<RecordLocks>,
) {
    while let Some(job) = rx.recv().await {
        tokio::time::sleep_until(job.due).await;

        // Hold the record's mutex across blob removal + tombstone so a
        // concurrent manual delete or sweep cannot interleave.
        let _guard = locks.acquire(&job.job_id).await;

        match blobs.delete(&job.job_id).await {
            Ok(removed) => match records.mark_deleted(&job.job_id).await {
                Ok(()) => {
                    tracing::info!(
                        job_id = %job.job_id,
                        blob_removed = removed,
                        "downloaded archive deleted"
                    );
                }
                Err(StoreError::NotFound(_)) => {
                    tracing::debug!(job_id = %job.job_id, "record gone before deferred deletion");
                }
                Err(e) => {
                    tracing::error!(
                        job_id = %job.job_id,
                        error = %e,
                        "failed to tombstone record after blob removal"
                    );
                }
            },
            Err(e) => {
                // Leave the record untombstoned; a later sweep or manual
                // delete retries the removal.
                tracing::error!(
                    job_id = %job.job_id,
                    error = %e,
                    "deferred blob removal failed, record left live"
                );
            }
        }
    }
}
