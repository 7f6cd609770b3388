use async_trait::async_trait;
use dashmap::DashMap;

use depot_store::error::StoreError;
use depot_store::settings::SettingsStore;

/// In-memory [`SettingsStore`] backed by a [`DashMap`].
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    data: DashMap<String, String>,
}

impl MemorySettingsStore {
    /// Create a new, empty in-memory settings store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.data.get(key).map(|v| v.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.data.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn all(&self) -> Result<Vec<(String, String)>, StoreError> {
        Ok(self
            .data
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect())
    }
}
