use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use depot_blob::error::BlobError;
use depot_blob::store::BlobStore;

/// In-memory [`BlobStore`] backed by a [`DashMap`].
///
/// Used in tests and ephemeral deployments. Locations are rendered as
/// `mem://{job_id}.zip` so records still carry a recognizable blob path.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    data: DashMap<String, Bytes>,
}

impl MemoryBlobStore {
    /// Create a new, empty in-memory blob store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, job_id: &str, data: Bytes) -> Result<String, BlobError> {
        if job_id.is_empty() {
            return Err(BlobError::InvalidJobId(job_id.to_owned()));
        }
        self.data.insert(job_id.to_owned(), data);
        Ok(format!("mem://{job_id}.zip"))
    }

    async fn get(&self, job_id: &str) -> Result<Option<Bytes>, BlobError> {
        Ok(self.data.get(job_id).map(|entry| entry.clone()))
    }

    async fn delete(&self, job_id: &str) -> Result<bool, BlobError> {
        Ok(self.data.remove(job_id).is_some())
    }

    async fn exists(&self, job_id: &str) -> Result<bool, BlobError> {
        Ok(self.data.contains_key(job_id))
    }
}
