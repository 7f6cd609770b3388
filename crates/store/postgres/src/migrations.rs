use sqlx::PgPool;

use crate::config::PostgresConfig;

/// Run database migrations, creating required tables if they do not exist.
///
/// This creates the files and settings tables in the configured schema with
/// the configured table prefix.
///
/// # Errors
///
/// Returns a [`sqlx::Error`] if any DDL statement fails.
pub async fn run_migrations(pool: &PgPool, config: &PostgresConfig) -> Result<(), sqlx::Error> {
    let files_table = config.files_table();
    let settings_table = config.settings_table();

    // `seq` breaks uploaded_at ties in listings; rows are tombstoned via
    // `deleted`, never removed.
    let create_files = format!(
        "CREATE TABLE IF NOT EXISTS {files_table} (
            job_id TEXT PRIMARY KEY,
            blob_path TEXT NOT NULL,
            size_bytes BIGINT NOT NULL,
            uploaded_at TIMESTAMPTZ NOT NULL,
            downloaded_at TIMESTAMPTZ,
            deleted BOOLEAN NOT NULL DEFAULT FALSE,
            seq BIGSERIAL
        )"
    );

    let create_files_deleted_idx = format!(
        "CREATE INDEX IF NOT EXISTS {}files_deleted_idx ON {files_table} (deleted)",
        config.table_prefix
    );

    // The sweeper scans by first-download time.
    let create_files_downloaded_idx = format!(
        "CREATE INDEX IF NOT EXISTS {}files_downloaded_at_idx ON {files_table} (downloaded_at)",
        config.table_prefix
    );

    let create_settings = format!(
        "CREATE TABLE IF NOT EXISTS {settings_table} (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"
    );

    sqlx::query(&create_files).execute(pool).await?;
    sqlx::query(&create_files_deleted_idx).execute(pool).await?;
    sqlx::query(&create_files_downloaded_idx)
        .execute(pool)
        .await?;
    sqlx::query(&create_settings).execute(pool).await?;

    tracing::debug!(files = %files_table, settings = %settings_table, "migrations applied");

    Ok(())
}
