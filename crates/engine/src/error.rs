use thiserror::Error;

use depot_blob::BlobError;
use depot_store::StoreError;

/// Errors surfaced by engine operations.
///
/// The first three variants are caller errors and map onto 4xx responses;
/// `Store` and `Blob` are backing-store faults, fatal to the current
/// operation and surfaced as server-side failures. No operation retries
/// automatically.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request itself is malformed (empty job id, empty payload,
    /// unknown setting key, ...). Not retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No live record (or backing blob) for this job id. Not retried.
    #[error("job not found: {0}")]
    NotFound(String),

    /// The record exists but has been tombstoned. Not retried.
    #[error("archive deleted: {0}")]
    Gone(String),

    /// The engine was assembled without a required component.
    #[error("engine configuration error: {0}")]
    Configuration(String),

    /// Record or settings store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Blob store failure.
    #[error("blob error: {0}")]
    Blob(#[from] BlobError),
}
