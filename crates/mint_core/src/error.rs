use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for marketplace actions.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Incomplete form: missing {0}")]
    IncompleteForm(&'static str),
}

/// Classification of errors for logging and user display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Caused by user input (bad price, missing form field).
    UserError,
    /// Wallet missing, locked, or wrong password.
    WalletError,
    /// Pinning service or metadata host failure.
    StorageError,
    /// Contract call reverted or the chain rejected the transaction.
    ChainError,
    /// Connectivity or timeout issue.
    NetworkError,
    /// Invalid or missing configuration.
    ConfigError,
}

impl MarketError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::ConfigError,
            Self::Wallet(_) => ErrorCategory::WalletError,
            Self::Storage(_) => ErrorCategory::StorageError,
            Self::Contract(_) => ErrorCategory::ChainError,
            Self::Network(_) => ErrorCategory::NetworkError,
            Self::InvalidInput(_) | Self::IncompleteForm(_) => ErrorCategory::UserError,
        }
    }

    /// Returns a user-friendly message (hides transport details).
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(msg) => format!("Configuration issue: {msg}"),
            Self::Wallet(msg) => format!("Wallet: {msg}"),
            Self::Storage(_) => "Upload or metadata fetch failed. Check your IPFS settings.".into(),
            Self::Contract(msg) => format!("Transaction failed: {msg}"),
            Self::Network(_) => "Network error. Is the RPC node reachable?".into(),
            Self::InvalidInput(msg) => msg.clone(),
            Self::IncompleteForm(field) => format!("Please fill in the {field}."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_route_user_mistakes_separately() {
        assert_eq!(
            MarketError::IncompleteForm("price").category(),
            ErrorCategory::UserError
        );
        assert_eq!(
            MarketError::InvalidInput("bad".into()).category(),
            ErrorCategory::UserError
        );
        assert_eq!(
            MarketError::Contract("revert".into()).category(),
            ErrorCategory::ChainError
        );
        assert_eq!(
            MarketError::Wallet("locked".into()).category(),
            ErrorCategory::WalletError
        );
    }

    #[test]
    fn user_message_hides_transport_details() {
        let err = MarketError::Network("connection refused (os error 111)".into());
        assert!(!err.user_message().contains("os error"));

        let err = MarketError::Storage("401 Unauthorized: project id".into());
        assert!(!err.user_message().contains("401"));
    }

    #[test]
    fn incomplete_form_names_the_field() {
        let err = MarketError::IncompleteForm("description");
        assert_eq!(err.to_string(), "Incomplete form: missing description");
        assert_eq!(err.user_message(), "Please fill in the description.");
    }
}
