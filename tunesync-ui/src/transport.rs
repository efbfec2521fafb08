//! Request/response transport to the library server
//!
//! The [`Transport`] trait is what the orchestrator and library view are
//! written against; [`HttpTransport`] implements it over the server's JSON
//! API.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use tunesync_common::api::{ScanBatchResult, ScanRequest, ScanState};
use tunesync_common::models::{Artist, Folder, Playlist};

use crate::error::TransportError;

const USER_AGENT: &str = concat!("tunesync/", env!("CARGO_PKG_VERSION"));

/// Scan requests may take long on large batches
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET scanstate`: files already scanned and those still pending
    async fn scan_state(&self) -> Result<ScanState, TransportError>;

    /// `POST scan`: scan one batch of files
    async fn scan_batch(&self, request: &ScanRequest) -> Result<ScanBatchResult, TransportError>;

    /// `GET collection`: artists with their albums and tracks
    async fn collection(&self) -> Result<Vec<Artist>, TransportError>;

    /// `GET playlists`
    async fn playlists(&self) -> Result<Vec<Playlist>, TransportError>;

    /// `GET folders`
    async fn folders(&self) -> Result<Vec<Folder>, TransportError>;
}

/// JSON over HTTP transport
pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the API rooted at `base_url`
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let url = self.url(path);
        debug!(url = %url, "GET");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status(status.as_u16()));
    }

    response
        .json()
        .await
        .map_err(|e| TransportError::Decode(e.to_string()))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn scan_state(&self) -> Result<ScanState, TransportError> {
        self.get_json("scanstate").await
    }

    async fn scan_batch(&self, request: &ScanRequest) -> Result<ScanBatchResult, TransportError> {
        let url = self.url("scan");
        debug!(url = %url, files = %request.files, finalize = request.finalize, "POST");

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        decode(response).await
    }

    async fn collection(&self) -> Result<Vec<Artist>, TransportError> {
        self.get_json("collection").await
    }

    async fn playlists(&self) -> Result<Vec<Playlist>, TransportError> {
        self.get_json("playlists").await
    }

    async fn folders(&self) -> Result<Vec<Folder>, TransportError> {
        self.get_json("folders").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let transport = HttpTransport::new("http://localhost:5730/api/").unwrap();
        assert_eq!(transport.base_url(), "http://localhost:5730/api");
        assert_eq!(transport.url("scanstate"), "http://localhost:5730/api/scanstate");
    }
}
