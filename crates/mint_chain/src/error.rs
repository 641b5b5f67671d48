use mint_core::MarketError;
use thiserror::Error;

/// Errors raised while talking to the chain or the local keystore.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC transport error: {0}")]
    Transport(String),

    #[error("contract call `{method}` failed: {reason}")]
    Call { method: &'static str, reason: String },

    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    #[error("invalid price `{0}`")]
    InvalidPrice(String),

    #[error("invalid address `{0}`")]
    InvalidAddress(String),

    #[error("invalid contract artifact: {0}")]
    Artifact(String),

    #[error("keystore error: {0}")]
    Keystore(String),

    #[error("no wallet is unlocked")]
    NoSigner,

    #[error("unknown network `{0}`")]
    UnknownNetwork(String),
}

impl From<ChainError> for MarketError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Transport(msg) => MarketError::Network(msg),
            ChainError::Call { .. } | ChainError::Reverted { .. } => {
                MarketError::Contract(err.to_string())
            }
            ChainError::InvalidPrice(_) | ChainError::InvalidAddress(_) => {
                MarketError::InvalidInput(err.to_string())
            }
            ChainError::Artifact(_) | ChainError::UnknownNetwork(_) => {
                MarketError::Config(err.to_string())
            }
            ChainError::Keystore(_) | ChainError::NoSigner => MarketError::Wallet(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mint_core::ErrorCategory;

    #[test]
    fn revert_maps_to_contract_error() {
        let err: MarketError = ChainError::Reverted {
            tx_hash: "0xabc".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::ChainError);
        assert!(err.to_string().contains("0xabc"));
    }

    #[test]
    fn bad_price_is_a_user_error() {
        let err: MarketError = ChainError::InvalidPrice("abc".into()).into();
        assert_eq!(err.category(), ErrorCategory::UserError);
    }

    #[test]
    fn missing_signer_is_a_wallet_error() {
        let err: MarketError = ChainError::NoSigner.into();
        assert_eq!(err.category(), ErrorCategory::WalletError);
    }
}
