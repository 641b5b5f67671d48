use mint_core::MarketError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("network error: {0}")]
    Network(String),

    #[error("pinning service rejected credentials")]
    Unauthorized,

    #[error("pinning service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<StorageError> for MarketError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Network(msg) => MarketError::Network(msg),
            other => MarketError::Storage(other.to_string()),
        }
    }
}
