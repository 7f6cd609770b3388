use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use depot_store::error::StoreError;
use depot_store::settings::SettingsStore;

use crate::config::PostgresConfig;
use crate::migrations;

/// PostgreSQL-backed implementation of [`SettingsStore`].
pub struct PostgresSettingsStore {
    pool: PgPool,
    config: Arc<PostgresConfig>,
}

impl PostgresSettingsStore {
    /// Create a `PostgresSettingsStore` from an existing pool and config.
    ///
    /// Runs migrations on creation so the settings table exists even when
    /// the record store has not been constructed yet.
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
}

#[async_trait]
impl SettingsStore for PostgresSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let table = self.config.settings_table();
        let query = format!("SELECT value FROM {table} WHERE key = $1");

        let row: Option<(String,)> = sqlx::query_as(&query)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(row.map(|(v,)| v))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let table = self.config.settings_table();
        let query = format!(
            "INSERT INTO {table} (key, value, updated_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()"
        );

        sqlx::query(&query)
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn all(&self) -> Result<Vec<(String, String)>, StoreError> {
        let table = self.config.settings_table();
        let query = format!("SELECT key, value FROM {table} ORDER BY key");

        sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use depot_store::testing::run_settings_store_conformance_tests;

    use super::*;

    #[tokio::test]
    #[ignore = "requires a live PostgreSQL instance; set DEPOT_TEST_POSTGRES_URL"]
    async fn conformance() {
        let url = std::env::var("DEPOT_TEST_POSTGRES_URL")
            .expect("DEPOT_TEST_POSTGRES_URL must be set");
        let config = PostgresConfig {
            url,
            table_prefix: "depot_test_".into(),
            ..PostgresConfig::default()
        };

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.pool_size)
            .connect(&config.url)
            .await
            .expect("pool should connect");

        let store = PostgresSettingsStore::from_pool(pool, config)
            .await
            .expect("store should build");

        run_settings_store_conformance_tests(&store)
            .await
            .expect("conformance tests should pass");
    }
}
