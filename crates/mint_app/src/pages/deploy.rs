use std::io::Write;
use std::path::Path;

use anyhow::Result;
use mint_chain::{ContractArtifact, PrivateKeySigner, deploy_marketplace};
use mint_core::{MarketError, MintConfig};
use tracing::info;

use crate::session;

/// Deploy the marketplace and point the config at the new contract.
pub async fn run(
    config: &mut MintConfig,
    signer: PrivateKeySigner,
    artifact_path: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let artifact = ContractArtifact::load(artifact_path).map_err(MarketError::from)?;
    let endpoint = session::rpc_endpoint(config)?;

    let deployed = deploy_marketplace(endpoint, session::request_timeout(config), signer, &artifact)
        .await
        .map_err(MarketError::from)?;
    writeln!(out, "{} deployed to: {}", artifact.name(), deployed.contract_address)?;

    config.market_address = Some(deployed.contract_address.clone());
    config.save()?;
    info!(
        address = %deployed.contract_address,
        tx = %deployed.tx_hash,
        gas_used = deployed.gas_used,
        network = %config.network,
        "marketplace address saved to config"
    );
    Ok(())
}
