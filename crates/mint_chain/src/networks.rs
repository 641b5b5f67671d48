use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChainError;

/// Networks the marketplace can be deployed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// Local development node (`npx hardhat node` or anvil).
    Hardhat,
    Sepolia,
    Ethereum,
}

impl Chain {
    pub const ALL: [Chain; 3] = [Chain::Hardhat, Chain::Sepolia, Chain::Ethereum];

    /// Human-readable label for the chain.
    pub fn label(&self) -> &'static str {
        match self {
            Chain::Hardhat => "Hardhat Localhost",
            Chain::Sepolia => "Sepolia Testnet",
            Chain::Ethereum => "Ethereum Mainnet",
        }
    }

    /// EVM chain ID.
    pub fn chain_id(&self) -> u64 {
        match self {
            Chain::Hardhat => 1337,
            Chain::Sepolia => 11_155_111,
            Chain::Ethereum => 1,
        }
    }

    /// Lowercase key used in config files and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            Chain::Hardhat => "hardhat",
            Chain::Sepolia => "sepolia",
            Chain::Ethereum => "ethereum",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Chain {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hardhat" | "localhost" | "local" => Ok(Chain::Hardhat),
            "sepolia" => Ok(Chain::Sepolia),
            "ethereum" | "mainnet" => Ok(Chain::Ethereum),
            other => Err(ChainError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Network-specific configuration for a blockchain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub explorer_url: Option<String>,
}

/// Returns default chain configurations for all supported networks.
pub fn get_chain_configs() -> HashMap<Chain, ChainConfig> {
    let mut configs = HashMap::new();

    configs.insert(
        Chain::Hardhat,
        ChainConfig {
            name: Chain::Hardhat.label().to_string(),
            chain_id: Chain::Hardhat.chain_id(),
            rpc_url: "http://127.0.0.1:8545".to_string(),
            explorer_url: None,
        },
    );

    configs.insert(
        Chain::Sepolia,
        ChainConfig {
            name: Chain::Sepolia.label().to_string(),
            chain_id: Chain::Sepolia.chain_id(),
            rpc_url: "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
            explorer_url: Some("https://sepolia.etherscan.io".to_string()),
        },
    );

    configs.insert(
        Chain::Ethereum,
        ChainConfig {
            name: Chain::Ethereum.label().to_string(),
            chain_id: Chain::Ethereum.chain_id(),
            rpc_url: "https://eth.llamarpc.com".to_string(),
            explorer_url: Some("https://etherscan.io".to_string()),
        },
    );

    configs
}
