use serde::Deserialize;

/// Record/blob storage configuration.
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Record store backend: `"memory"` or `"postgres"`.
    ///
    /// The postgres backend requires building with the `postgres` feature.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Directory archive blobs are stored under.
    #[serde(default = "default_blob_root")]
    pub blob_root: String,
    /// Whether a download schedules deletion of the archive (unless the
    /// caller passes `keep=true`).
    #[serde(default = "default_auto_delete")]
    pub auto_delete: bool,
    /// Seconds the reaper waits before deleting a downloaded archive.
    #[serde(default = "default_delete_delay")]
    pub delete_delay_seconds: u64,
    /// PostgreSQL connection settings (used when `backend = "postgres"`).
    #[serde(default)]
    pub postgres: PostgresStorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            blob_root: default_blob_root(),
            auto_delete: default_auto_delete(),
            delete_delay_seconds: default_delete_delay(),
            postgres: PostgresStorageConfig::default(),
        }
    }
}

/// PostgreSQL connection settings.
#[derive(Debug, Deserialize)]
pub struct PostgresStorageConfig {
    /// Connection URL.
    #[serde(default = "default_postgres_url")]
    pub url: String,
    /// Maximum connections in the pool.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    /// Database schema for the tables.
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Prefix applied to table names.
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,
}

impl Default for PostgresStorageConfig {
    fn default() -> Self {
        Self {
            url: default_postgres_url(),
            pool_size: default_pool_size(),
            schema: default_schema(),
            table_prefix: default_table_prefix(),
        }
    }
}

fn default_backend() -> String {
    "memory".to_owned()
}

fn default_blob_root() -> String {
    "data/blobs".to_owned()
}

fn default_auto_delete() -> bool {
    true
}

fn default_delete_delay() -> u64 {
    2
}

fn default_postgres_url() -> String {
    "postgres://localhost:5432/depot".to_owned()
}

fn default_pool_size() -> u32 {
    5
}

fn default_schema() -> String {
    "public".to_owned()
}

fn default_table_prefix() -> String {
    "depot_".to_owned()
}
