// EVM side of the marketplace: networks, keystore, contract bindings, deploy.

pub mod deploy;
pub mod error;
pub mod evm;
pub mod marketplace;
pub mod networks;
pub mod rpc_config;
pub mod units;
pub mod wallet_store;

// Re-export primary types for convenient access.
pub use deploy::{ContractArtifact, DeployResult, deploy_marketplace};
pub use error::ChainError;
pub use evm::{Access, EvmConnector, EvmMarketplace, parse_address, rpc_client};
pub use marketplace::{MarketItem, Marketplace, MarketplaceConnector, TxOutcome};
pub use networks::{Chain, ChainConfig, get_chain_configs};
pub use rpc_config::{RpcConfig, RpcConfigStore};
pub use units::{format_price, parse_price};
pub use wallet_store::{WalletEntry, WalletStore, decrypt_key, encrypt_key};

pub use alloy::primitives::{Address, U256};
pub use alloy::signers::local::PrivateKeySigner;
