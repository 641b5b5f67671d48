use std::path::Path;
use std::time::Duration;

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::Bytes;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ChainError;
use crate::evm::rpc_client;

/// Compiled contract output as written by hardhat (`artifacts/**/X.json`) or
/// foundry (`out/X.sol/X.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractArtifact {
    #[serde(default, rename = "contractName")]
    pub contract_name: Option<String>,
    #[serde(default)]
    pub abi: serde_json::Value,
    pub bytecode: BytecodeField,
}

/// Hardhat stores bytecode as a hex string; foundry nests it under `object`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BytecodeField {
    Hex(String),
    Object { object: String },
}

impl ContractArtifact {
    pub fn load(path: &Path) -> Result<Self, ChainError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ChainError::Artifact(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ChainError> {
        serde_json::from_str(json).map_err(|e| ChainError::Artifact(e.to_string()))
    }

    pub fn name(&self) -> &str {
        self.contract_name.as_deref().unwrap_or("NFTMarketplace")
    }

    /// Creation bytecode, rejecting empty output (abstract contracts or
    /// interfaces compile to `0x`).
    pub fn creation_code(&self) -> Result<Bytes, ChainError> {
        let hex = match &self.bytecode {
            BytecodeField::Hex(hex) => hex,
            BytecodeField::Object { object } => object,
        };
        let code: Bytes = hex
            .parse()
            .map_err(|_| ChainError::Artifact("bytecode is not valid hex".into()))?;
        if code.is_empty() {
            return Err(ChainError::Artifact(format!(
                "{} has no creation bytecode",
                self.name()
            )));
        }
        Ok(code)
    }
}

/// Result of a successful contract deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployResult {
    pub tx_hash: String,
    pub contract_address: String,
    pub gas_used: u64,
}

/// Deploy the marketplace contract from a compiled artifact.
pub async fn deploy_marketplace(
    rpc_url: url::Url,
    timeout: Duration,
    signer: PrivateKeySigner,
    artifact: &ContractArtifact,
) -> Result<DeployResult, ChainError> {
    let code = artifact.creation_code()?;
    let deployer = signer.address();

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_client(rpc_client(rpc_url, timeout)?);

    info!(contract = artifact.name(), %deployer, "deploying contract");

    let tx = TransactionRequest::default().with_deploy_code(code);
    let receipt = provider
        .send_transaction(tx)
        .await
        .map_err(|e| ChainError::Transport(e.to_string()))?
        .get_receipt()
        .await
        .map_err(|e| ChainError::Transport(e.to_string()))?;

    let tx_hash = receipt.transaction_hash.to_string();
    if !receipt.status() {
        return Err(ChainError::Reverted { tx_hash });
    }
    let address = receipt
        .contract_address
        .ok_or_else(|| ChainError::Artifact("receipt has no contract address".into()))?;

    info!(contract = artifact.name(), %address, "contract deployed");
    Ok(DeployResult {
        tx_hash,
        contract_address: address.to_string(),
        gas_used: receipt.gas_used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardhat_artifact_parses() {
        let artifact = ContractArtifact::from_json(
            r#"{ "contractName": "NFTMarketplace", "abi": [], "bytecode": "0x6080604052" }"#,
        )
        .unwrap();
        assert_eq!(artifact.name(), "NFTMarketplace");
        assert_eq!(artifact.creation_code().unwrap().len(), 5);
    }

    #[test]
    fn foundry_artifact_parses() {
        let artifact = ContractArtifact::from_json(
            r#"{ "abi": [], "bytecode": { "object": "0x60806040" } }"#,
        )
        .unwrap();
        assert_eq!(artifact.name(), "NFTMarketplace");
        assert_eq!(artifact.creation_code().unwrap().len(), 4);
    }

    #[test]
    fn empty_bytecode_is_rejected() {
        let artifact =
            ContractArtifact::from_json(r#"{ "abi": [], "bytecode": "0x" }"#).unwrap();
        assert!(matches!(
            artifact.creation_code(),
            Err(ChainError::Artifact(_))
        ));
    }

    #[test]
    fn non_hex_bytecode_is_rejected() {
        let artifact =
            ContractArtifact::from_json(r#"{ "bytecode": "0xzz" }"#).unwrap();
        assert!(artifact.creation_code().is_err());
    }

    #[test]
    fn missing_bytecode_is_an_artifact_error() {
        assert!(matches!(
            ContractArtifact::from_json(r#"{ "abi": [] }"#),
            Err(ChainError::Artifact(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContractArtifact::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }
}
