use thiserror::Error;

/// Errors that can occur during blob storage operations.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The job id cannot be mapped to a storage location.
    #[error("invalid job id: {0}")]
    InvalidJobId(String),

    /// A storage backend I/O error occurred.
    #[error("blob storage error: {0}")]
    Storage(String),
}
