//! Store construction from configuration.

use std::sync::Arc;

use depot_blob::BlobStore;
use depot_blob_fs::FsBlobStore;
use depot_store::{RecordStore, SettingsStore};
use depot_store_memory::{MemoryRecordStore, MemorySettingsStore};

use crate::config::StorageConfig;
use crate::error::ServerError;

/// Create the record and settings stores for the configured backend.
pub async fn create_stores(
    config: &StorageConfig,
) -> Result<(Arc<dyn RecordStore>, Arc<dyn SettingsStore>), ServerError> {
    match config.backend.as_str() {
        "memory" => Ok((
            Arc::new(MemoryRecordStore::new()),
            Arc::new(MemorySettingsStore::new()),
        )),
        #[cfg(feature = "postgres")]
        "postgres" => {
            let pg = depot_store_postgres::PostgresConfig {
                url: config.postgres.url.clone(),
                pool_size: config.postgres.pool_size,
                schema: config.postgres.schema.clone(),
                table_prefix: config.postgres.table_prefix.clone(),
            };
            let records = depot_store_postgres::PostgresRecordStore::new(pg.clone())
                .await
                .map_err(|e| ServerError::Config(format!("postgres record store: {e}")))?;
            let settings = depot_store_postgres::PostgresSettingsStore::from_pool(
                records.pool().clone(),
                pg,
            )
            .await
            .map_err(|e| ServerError::Config(format!("postgres settings store: {e}")))?;
            Ok((Arc::new(records), Arc::new(settings)))
        }
        #[cfg(not(feature = "postgres"))]
        "postgres" => Err(ServerError::Config(
            "this build does not include the postgres backend; rebuild with --features postgres"
                .into(),
        )),
        other => Err(ServerError::Config(format!(
            "unknown storage backend: {other} (expected \"memory\" or \"postgres\")"
        ))),
    }
}

/// Create the filesystem blob store under the configured root directory.
pub async fn create_blob_store(config: &StorageConfig) -> Result<Arc<dyn BlobStore>, ServerError> {
    let store = FsBlobStore::new(config.blob_root.clone())
        .await
        .map_err(|e| ServerError::Config(format!("blob root: {e}")))?;
    Ok(Arc::new(store))
}
