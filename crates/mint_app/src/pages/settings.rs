use std::io::Write;

use anyhow::Result;
use mint_chain::{Chain, parse_address};
use mint_core::{MarketError, MintConfig, validate_url};

use crate::cli::ConfigCommand;

/// Apply a setting change in memory. Returns `false` for read-only commands.
fn apply(command: &ConfigCommand, config: &mut MintConfig) -> Result<bool, MarketError> {
    match command {
        ConfigCommand::Show => return Ok(false),
        ConfigCommand::SetNetwork(name) => {
            let chain: Chain = name.parse()?;
            if config.network != chain.key() {
                // A custom endpoint belongs to the previous network.
                config.rpc_url = None;
            }
            config.network = chain.key().to_string();
        }
        ConfigCommand::SetRpc(url) => {
            if !validate_url(url) {
                return Err(MarketError::InvalidInput(format!("invalid RPC URL: {url}")));
            }
            config.rpc_url = Some(url.clone());
        }
        ConfigCommand::SetMarket(address) => {
            config.market_address = Some(parse_address(address)?.to_string());
        }
    }
    Ok(true)
}

fn show(config: &MintConfig, out: &mut impl Write) -> Result<()> {
    let credentials = match (&config.ipfs_project_id, &config.ipfs_project_secret) {
        (Some(_), Some(_)) => "set",
        _ => "not set",
    };
    writeln!(out, "{}", serde_json::to_string_pretty(config)?)?;
    writeln!(out, "IPFS credentials: {credentials}")?;
    Ok(())
}

pub fn run(command: &ConfigCommand, config: &mut MintConfig, out: &mut impl Write) -> Result<()> {
    if apply(command, config)? {
        config.save()?;
    }
    show(config, out)
}
