use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use depot_core::{FileRecord, RecordStats};
use depot_store::error::StoreError;
use depot_store::records::RecordStore;

use crate::config::PostgresConfig;
use crate::migrations;

/// Row shape shared by every record query.
type RecordRow = (
    String,
    String,
    i64,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
    bool,
);

fn record_from_row(row: RecordRow) -> Result<FileRecord, StoreError> {
    let (job_id, blob_path, size_bytes, uploaded_at, downloaded_at, deleted) = row;
    let size_bytes =
        u64::try_from(size_bytes).map_err(|e| StoreError::Serialization(e.to_string()))?;

    Ok(FileRecord {
        job_id,
        blob_path,
        size_bytes,
        uploaded_at,
        downloaded_at,
        deleted,
    })
}

fn size_to_db(size_bytes: u64) -> Result<i64, StoreError> {
    i64::try_from(size_bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

const RECORD_COLUMNS: &str = "job_id, blob_path, size_bytes, uploaded_at, downloaded_at, deleted";

/// PostgreSQL-backed implementation of [`RecordStore`].
///
/// Uses `sqlx::PgPool` for connection pooling. Row-level locking in
/// `PostgreSQL` serializes concurrent transitions on one job id; the `seq`
/// column (a `BIGSERIAL`) breaks `uploaded_at` ties in listings and takes
/// a fresh value on re-upload.
pub struct PostgresRecordStore {
    pool: PgPool,
    config: Arc<PostgresConfig>,
}

impl PostgresRecordStore {
    /// Create a new `PostgresRecordStore` from the provided configuration.
    ///
    /// Connects to `PostgreSQL`, creates the connection pool, and runs
    /// migrations to ensure the required tables exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if pool creation fails, or
    /// [`StoreError::Backend`] if migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, StoreError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.pool_size)
            .connect(&config.url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        migrations::run_migrations(&pool, &config)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }

    /// Create a `PostgresRecordStore` from an existing pool and config.
    ///
    /// Useful for sharing a pool with the settings store. Runs migrations
    /// on creation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if migrations fail.
    pub async fn from_pool(pool: PgPool, config: PostgresConfig) -> Result<Self, StoreError> {
        migrations::run_migrations(&pool, &config)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }

    /// The pool backing this store.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn put(&self, record: FileRecord) -> Result<(), StoreError> {
        let table = self.config.files_table();
        let size_bytes = size_to_db(record.size_bytes)?;

        // Full replace: the previous lifecycle is discarded and the row
        // takes a fresh seq slot so re-uploads sort as new arrivals.
        let query = format!(
            "INSERT INTO {table} (job_id, blob_path, size_bytes, uploaded_at, downloaded_at, deleted) \
             VALUES ($1, $2, $3, $4, NULL, FALSE) \
             ON CONFLICT (job_id) DO UPDATE SET \
               blob_path = EXCLUDED.blob_path, \
               size_bytes = EXCLUDED.size_bytes, \
               uploaded_at = EXCLUDED.uploaded_at, \
               downloaded_at = NULL, \
               deleted = FALSE, \
               seq = nextval(pg_get_serial_sequence('{table}', 'seq'))"
        );

        sqlx::query(&query)
            .bind(&record.job_id)
            .bind(&record.blob_path)
            .bind(size_bytes)
            .bind(record.uploaded_at)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, job_id: &str) -> Result<Option<FileRecord>, StoreError> {
        let table = self.config.files_table();
        let query = format!("SELECT {RECORD_COLUMNS} FROM {table} WHERE job_id = $1");

        let row: Option<RecordRow> = sqlx::query_as(&query)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        row.map(record_from_row).transpose()
    }

    async fn mark_downloaded(
        &self,
        job_id: &str,
        at: DateTime<Utc>,
    ) -> Result<FileRecord, StoreError> {
        let table = self.config.files_table();

        // COALESCE keeps the first download time on repeat calls.
        let query = format!(
            "UPDATE {table} SET downloaded_at = COALESCE(downloaded_at, $2) \
             WHERE job_id = $1 \
             RETURNING {RECORD_COLUMNS}"
        );

        let row: Option<RecordRow> = sqlx::query_as(&query)
            .bind(job_id)
            .bind(at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            Some(row) => record_from_row(row),
            None => Err(StoreError::NotFound(job_id.to_owned())),
        }
    }

    async fn mark_deleted(&self, job_id: &str) -> Result<(), StoreError> {
        let table = self.config.files_table();
        let query = format!("UPDATE {table} SET deleted = TRUE WHERE job_id = $1");

        let result = sqlx::query(&query)
            .bind(job_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(job_id.to_owned()));
        }
        Ok(())
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<FileRecord>, StoreError> {
        let table = self.config.files_table();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM {table} \
             ORDER BY uploaded_at DESC, seq ASC \
             LIMIT $1 OFFSET $2"
        );

        let rows: Vec<RecordRow> = sqlx::query_as(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter().map(record_from_row).collect()
    }

    async fn cleanup_candidates(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<FileRecord>, StoreError> {
        let table = self.config.files_table();
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM {table} \
             WHERE deleted = FALSE \
               AND downloaded_at IS NOT NULL \
               AND downloaded_at < $1 \
             ORDER BY downloaded_at ASC"
        );

        let rows: Vec<RecordRow> = sqlx::query_as(&query)
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        rows.into_iter().map(record_from_row).collect()
    }

    async fn stats(&self) -> Result<RecordStats, StoreError> {
        let table = self.config.files_table();
        let query = format!(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE NOT deleted), \
                    COUNT(*) FILTER (WHERE deleted), \
                    COUNT(*) FILTER (WHERE downloaded_at IS NOT NULL), \
                    COALESCE(SUM(size_bytes) FILTER (WHERE NOT deleted), 0)::BIGINT \
             FROM {table}"
        );

        let (total, active, deleted, downloaded, total_size): (i64, i64, i64, i64, i64) =
            sqlx::query_as(&query)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(RecordStats {
            total: u64::try_from(total).unwrap_or_default(),
            active: u64::try_from(active).unwrap_or_default(),
            deleted: u64::try_from(deleted).unwrap_or_default(),
            downloaded: u64::try_from(downloaded).unwrap_or_default(),
            total_size_bytes: u64::try_from(total_size).unwrap_or_default(),
        })
    }
}
