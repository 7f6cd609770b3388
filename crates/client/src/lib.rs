//! Depot HTTP Client
//!
//! A native Rust client for the Depot archive storage service's REST API.
//!
//! # Quick Start
//!
//! ```no_run
//! use bytes::Bytes;
//! use depot_client::DepotClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), depot_client::Error> {
//!     let client = DepotClient::new("http://localhost:8080");
//!
//!     // Upload an archive under a job id.
//!     client.upload("job-1", Bytes::from_static(b"archive bytes")).await?;
//!
//!     // Download it back, asking the server to keep it afterwards.
//!     let data = client.download("job-1", true).await?;
//!     assert_eq!(&data[..], b"archive bytes");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! Use the builder for custom configuration:
//!
//! ```no_run
//! use std::time::Duration;
//! use depot_client::DepotClientBuilder;
//!
//! let client = DepotClientBuilder::new("http://localhost:8080")
//!     .timeout(Duration::from_secs(30))
//!     .api_key("your-api-key")
//!     .build()
//!     .unwrap();
//! ```

mod error;
mod types;

pub use error::Error;
pub use types::{
    DeleteResponse, ErrorResponse, HealthResponse, ListFilesResponse, SettingsResponse,
    StatsResponse, UpdateSettingsRequest, UploadResponse,
};

// Re-export core types so callers don't need a direct `depot_core` dependency.
pub use depot_core::{CleanupReport, FileRecord};

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Depot archive storage service.
#[derive(Debug, Clone)]
pub struct DepotClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Builder for configuring a [`DepotClient`].
#[derive(Debug)]
pub struct DepotClientBuilder {
    base_url: String,
    timeout: Duration,
    api_key: Option<String>,
    client: Option<Client>,
}

impl DepotClientBuilder {
    /// Create a new builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
            client: None,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the API key for authentication.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Use a custom reqwest Client.
    ///
    /// Useful for configuring TLS, proxies, or other advanced settings.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<DepotClient, Error> {
        let client = match self.client {
            Some(c) => c,
            None => Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| Error::Configuration(e.to_string()))?,
        };

        Ok(DepotClient {
            client,
            base_url: self.base_url,
            api_key: self.api_key,
        })
    }
}

impl DepotClient {
    /// Create a new client with default configuration.
    pub fn new(base_url: impl Into<String>) -> Self {
        DepotClientBuilder::new(base_url)
            .build()
            .expect("default client configuration should not fail")
    }

    /// Create a builder for advanced configuration.
    pub fn builder(base_url: impl Into<String>) -> DepotClientBuilder {
        DepotClientBuilder::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Add the authorization header if an API key is set.
    fn add_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("Authorization", format!("Bearer {key}")),
            None => req,
        }
    }

    /// Parse a successful JSON body, or surface the server's error message.
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Error> {
        if response.status().is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| Error::Deserialization(e.to_string()))
        } else {
            Err(Self::error_from(response).await)
        }
    }

    /// Build an [`Error::Http`] from a non-success response.
    async fn error_from(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("request failed with status {status}"),
        };
        Error::Http { status, message }
    }

    /// Check if the server is healthy.
    pub async fn health(&self) -> Result<HealthResponse, Error> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        Self::read_json(response).await
    }

    /// Upload an archive under `job_id`, replacing any previous one.
    pub async fn upload(&self, job_id: &str, data: Bytes) -> Result<UploadResponse, Error> {
        let url = format!("{}/v1/files/{job_id}", self.base_url);
        let response = self
            .add_auth(self.client.put(&url))
            .header("Content-Type", "application/octet-stream")
            .body(data)
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        Self::read_json(response).await
    }

    /// Download the archive for `job_id`.
    ///
    /// With `keep == false` and server-side auto-delete enabled, the
    /// archive is deleted shortly after this download completes.
    pub async fn download(&self, job_id: &str, keep: bool) -> Result<Bytes, Error> {
        let mut url = format!("{}/v1/files/{job_id}/download", self.base_url);
        if keep {
            url.push_str("?keep=true");
        }

        let response = self
            .add_auth(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        if response.status().is_success() {
            response
                .bytes()
                .await
                .map_err(|e| Error::Connection(e.to_string()))
        } else {
            Err(Self::error_from(response).await)
        }
    }

    /// Fetch the record for `job_id`, verifying the archive is retrievable.
    pub async fn check(&self, job_id: &str) -> Result<FileRecord, Error> {
        let url = format!("{}/v1/files/{job_id}", self.base_url);
        let response = self
            .add_auth(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        Self::read_json(response).await
    }

    /// Delete the archive for `job_id` now.
    pub async fn delete(&self, job_id: &str) -> Result<DeleteResponse, Error> {
        let url = format!("{}/v1/files/{job_id}", self.base_url);
        let response = self
            .add_auth(self.client.delete(&url))
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        Self::read_json(response).await
    }

    /// List stored records, newest upload first.
    pub async fn list(&self, limit: usize, offset: usize) -> Result<ListFilesResponse, Error> {
        let url = format!(
            "{}/v1/files?limit={limit}&offset={offset}",
            self.base_url
        );
        let response = self
            .add_auth(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        Self::read_json(response).await
    }

    /// Trigger a cleanup sweep now.
    pub async fn cleanup(&self) -> Result<CleanupReport, Error> {
        let url = format!("{}/v1/cleanup", self.base_url);
        let response = self
            .add_auth(self.client.post(&url))
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        Self::read_json(response).await
    }

    /// Fetch the current cleanup policy settings.
    pub async fn settings(&self) -> Result<SettingsResponse, Error> {
        let url = format!("{}/v1/settings", self.base_url);
        let response = self
            .add_auth(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        Self::read_json(response).await
    }

    /// Update cleanup policy settings.
    pub async fn update_settings(
        &self,
        update: &UpdateSettingsRequest,
    ) -> Result<SettingsResponse, Error> {
        let url = format!("{}/v1/settings", self.base_url);
        let response = self
            .add_auth(self.client.put(&url))
            .json(update)
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        Self::read_json(response).await
    }

    /// Fetch aggregate storage statistics.
    pub async fn stats(&self) -> Result<StatsResponse, Error> {
        let url = format!("{}/v1/stats", self.base_url);
        let response = self
            .add_auth(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        Self::read_json(response).await
    }
}
