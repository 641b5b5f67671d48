//! IPFS pinning client speaking the Kubo HTTP API (`/api/v0/add`), as exposed
//! by Infura and self-hosted nodes.

use std::time::Duration;

use async_trait::async_trait;
use mint_core::MintConfig;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::ContentStore;
use crate::error::StorageError;
use crate::metadata::NftMetadata;

/// Project credentials sent as HTTP Basic auth.
#[derive(Debug, Clone)]
pub struct IpfsCredentials {
    pub project_id: String,
    pub project_secret: String,
}

pub struct IpfsClient {
    client: Client,
    api_url: String,
    gateway_url: String,
    credentials: Option<IpfsCredentials>,
}

impl IpfsClient {
    pub fn new(
        api_url: &str,
        gateway_url: &str,
        credentials: Option<IpfsCredentials>,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Build a client from config. Credentials are used only when both the
    /// project id and secret are present.
    pub fn from_config(config: &MintConfig) -> Self {
        let credentials = match (&config.ipfs_project_id, &config.ipfs_project_secret) {
            (Some(id), Some(secret)) => Some(IpfsCredentials {
                project_id: id.clone(),
                project_secret: secret.clone(),
            }),
            (None, None) => None,
            _ => {
                warn!("only one of the IPFS project id/secret is set; uploading without auth");
                None
            }
        };
        Self::new(
            &config.ipfs_api_url,
            &config.ipfs_gateway_url,
            credentials,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Public URL for a content path: `{gateway}/ipfs/{path}`.
    pub fn gateway_url(&self, path: &str) -> String {
        format!("{}/ipfs/{}", self.gateway_url, path)
    }

    /// Rewrite `ipfs://<cid>` URIs onto the configured gateway; other URIs
    /// pass through untouched.
    pub fn resolve_uri(&self, uri: &str) -> String {
        match uri.strip_prefix("ipfs://") {
            Some(rest) => self.gateway_url(rest.trim_start_matches("ipfs/")),
            None => uri.to_string(),
        }
    }

    /// Upload `bytes` and return the content path (the CID for a single file).
    pub async fn add(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, StorageError> {
        let size = bytes.len();
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut request = self
            .client
            .post(format!("{}/api/v0/add?pin=true", self.api_url))
            .multipart(form);
        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.project_id, Some(&creds.project_secret));
        }

        debug!(file_name, size, "uploading to IPFS");

        let resp = request
            .send()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => StorageError::Unauthorized,
                code => StorageError::Api { status: code, body },
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;
        let added = parse_add_response(&body)?;

        info!(path = %added.hash, size = %added.size, "content pinned");
        Ok(added.hash)
    }
}

#[async_trait]
impl ContentStore for IpfsClient {
    async fn add_bytes(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, StorageError> {
        let path = self.add(bytes, file_name).await?;
        Ok(self.gateway_url(&path))
    }

    async fn add_json(&self, metadata: &NftMetadata) -> Result<String, StorageError> {
        let data =
            serde_json::to_vec(metadata).map_err(|e| StorageError::Decode(e.to_string()))?;
        let path = self.add(data, "metadata.json").await?;
        Ok(self.gateway_url(&path))
    }

    async fn fetch_metadata(&self, uri: &str) -> Result<NftMetadata, StorageError> {
        let url = self.resolve_uri(uri);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Api { status, body });
        }

        resp.json::<NftMetadata>()
            .await
            .map_err(|e| StorageError::Decode(format!("metadata at {url}: {e}")))
    }
}

// ---------------------------------------------------------------------------
// API types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
    #[serde(rename = "Size", default)]
    size: String,
}

/// `/api/v0/add` streams one JSON object per line; the last line describes
/// the root of what was added.
fn parse_add_response(body: &str) -> Result<AddResponse, StorageError> {
    let line = body
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| StorageError::Decode("empty add response".into()))?;
    serde_json::from_str(line).map_err(|e| StorageError::Decode(format!("{e}: {line}")))
}
