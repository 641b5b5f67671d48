//! Content-addressed storage for token images and metadata.

pub mod error;
pub mod ipfs;
pub mod metadata;

use async_trait::async_trait;

pub use error::StorageError;
pub use ipfs::{IpfsClient, IpfsCredentials};
pub use metadata::NftMetadata;

/// Where token images and metadata documents live.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store raw bytes and return the public URL they are served from.
    async fn add_bytes(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, StorageError>;

    /// Store a metadata document and return its public URL.
    async fn add_json(&self, metadata: &NftMetadata) -> Result<String, StorageError>;

    /// Fetch and decode the metadata document behind a token URI.
    async fn fetch_metadata(&self, uri: &str) -> Result<NftMetadata, StorageError>;
}
