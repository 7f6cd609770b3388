mod auth;
mod cleanup;
mod server;
mod storage;


pub use auth::*;
pub use cleanup::*;
pub use server::*;
pub use storage::*;

use serde::Deserialize;

/// Top-level configuration for the Depot server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct DepotConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Record/blob storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// API-key authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Periodic cleanup scheduler configuration.
    #[serde(default)]
    pub cleanup: CleanupSchedulerConfig,
}
