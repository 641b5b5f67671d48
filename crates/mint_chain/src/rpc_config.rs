use std::collections::HashMap;

use mint_core::validate_url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ChainError;
use crate::networks::{Chain, get_chain_configs};

/// Configuration for a single RPC endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    pub chain: Chain,
    pub url: String,
    pub is_custom: bool,
}

/// Per-chain RPC endpoints with custom override support.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfigStore {
    configs: HashMap<Chain, RpcConfig>,
}

impl RpcConfigStore {
    /// Create a store populated with default RPC URLs from [`get_chain_configs`].
    pub fn with_defaults() -> Self {
        let configs = get_chain_configs()
            .into_iter()
            .map(|(chain, cc)| {
                let rpc = RpcConfig {
                    chain,
                    url: cc.rpc_url,
                    is_custom: false,
                };
                (chain, rpc)
            })
            .collect();

        Self { configs }
    }

    pub fn get_rpc(&self, chain: Chain) -> Option<&RpcConfig> {
        self.configs.get(&chain)
    }

    /// Resolve the endpoint for `chain` as a parsed URL.
    pub fn endpoint(&self, chain: Chain) -> Result<url::Url, ChainError> {
        let rpc = self
            .get_rpc(chain)
            .ok_or_else(|| ChainError::UnknownNetwork(chain.key().to_string()))?;
        url::Url::parse(&rpc.url).map_err(|e| ChainError::Transport(format!("{}: {e}", rpc.url)))
    }

    /// Override the RPC URL for a chain with a custom endpoint.
    pub fn set_custom_rpc(&mut self, chain: Chain, url: String) -> Result<(), ChainError> {
        if !validate_url(&url) {
            return Err(ChainError::Transport(format!("invalid RPC URL: {url}")));
        }

        debug!(chain = chain.key(), %url, "custom RPC endpoint");
        let entry = self.configs.entry(chain).or_insert_with(|| RpcConfig {
            chain,
            url: String::new(),
            is_custom: false,
        });
        entry.url = url;
        entry.is_custom = true;
        Ok(())
    }

    /// Reset a chain's RPC URL back to the built-in default.
    pub fn reset_to_default(&mut self, chain: Chain) {
        if let Some(default_config) = get_chain_configs().remove(&chain) {
            self.configs.insert(
                chain,
                RpcConfig {
                    chain,
                    url: default_config.rpc_url,
                    is_custom: false,
                },
            );
        }
    }
}

impl Default for RpcConfigStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}
