use serde::Deserialize;

/// API-key authentication configuration.
///
/// When disabled, every route is open; the `/health` endpoint is public
/// either way. Keys are stored as SHA-256 hashes so the config file never
/// contains a raw credential.
#[derive(Debug, Default, Deserialize)]
pub struct AuthConfig {
    /// Whether API-key authentication is required on `/v1` routes.
    #[serde(default)]
    pub enabled: bool,
    /// Accepted API keys.
    #[serde(default)]
    pub api_keys: Vec<ApiKeyConfig>,
}

/// One accepted API key.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeyConfig {
    /// Display name for the key, used in logs.
    pub name: String,
    /// Lowercase hex SHA-256 of the raw key.
    pub key_hash: String,
}
