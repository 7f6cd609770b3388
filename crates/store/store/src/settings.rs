use async_trait::async_trait;

use crate::error::StoreError;

/// Trait for the durable settings table.
///
/// A flat string key-value map; the known keys live in
/// [`depot_core::settings`]. Implementations must be `Send + Sync`.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Get the value for a key. Returns `None` if the key has never been set.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Set a value, overwriting any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// All stored settings, in unspecified order.
    async fn all(&self) -> Result<Vec<(String, String)>, StoreError>;
}
