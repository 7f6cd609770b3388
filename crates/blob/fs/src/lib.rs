use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use depot_blob::error::BlobError;
use depot_blob::store::BlobStore;

/// Filesystem-backed [`BlobStore`].
///
/// Stores one `{job_id}.zip` file per job id directly under the root
/// directory. The flat layout keeps the path derivation deterministic:
/// re-uploading a job id overwrites the same file, so no orphaned object
/// can accumulate.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::Storage`] if the directory cannot be created.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| BlobError::Storage(format!("create {}: {e}", root.display())))?;
        Ok(Self { root })
    }

    /// The directory blobs are stored under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a job id to its backing file path.
    ///
    /// Ids that could escape the root directory are rejected rather than
    /// sanitized.
    fn blob_path(&self, job_id: &str) -> Result<PathBuf, BlobError> {
        if job_id.is_empty()
            || job_id == "."
            || job_id == ".."
            || job_id.contains('/')
            || job_id.contains('\\')
        {
            return Err(BlobError::InvalidJobId(job_id.to_owned()));
        }
        Ok(self.root.join(format!("{job_id}.zip")))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, job_id: &str, data: Bytes) -> Result<String, BlobError> {
        let path = self.blob_path(job_id)?;
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| BlobError::Storage(format!("write {}: {e}", path.display())))?;
        Ok(path.display().to_string())
    }

    async fn get(&self, job_id: &str) -> Result<Option<Bytes>, BlobError> {
        let path = self.blob_path(job_id)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BlobError::Storage(format!("read {}: {e}", path.display()))),
        }
    }

    async fn delete(&self, job_id: &str) -> Result<bool, BlobError> {
        let path = self.blob_path(job_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(job_id, "blob already absent on delete");
                Ok(false)
            }
            Err(e) => Err(BlobError::Storage(format!(
                "remove {}: {e}",
                path.display()
            ))),
        }
    }

    async fn exists(&self, job_id: &str) -> Result<bool, BlobError> {
        let path = self.blob_path(job_id)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| BlobError::Storage(format!("stat {}: {e}", path.display())))
    }
}
