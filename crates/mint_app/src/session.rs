//! Wiring from config to a live [`NftContext`].

use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use mint_chain::{
    Address, Chain, EvmConnector, PrivateKeySigner, RpcConfigStore, WalletStore, parse_address,
};
use mint_core::{MarketError, MintConfig};
use mint_market::NftContext;
use mint_storage::IpfsClient;
use tracing::debug;

pub const ENV_WALLET_PASSWORD: &str = "MINT_WALLET_PASSWORD";

pub fn chain(config: &MintConfig) -> Result<Chain, MarketError> {
    Ok(config.network.parse::<Chain>()?)
}

/// RPC endpoint for the configured network, honouring a custom `rpc_url`.
pub fn rpc_endpoint(config: &MintConfig) -> Result<url::Url, MarketError> {
    let chain = chain(config)?;
    let mut rpcs = RpcConfigStore::with_defaults();
    if let Some(custom) = &config.rpc_url {
        rpcs.set_custom_rpc(chain, custom.clone())?;
    }
    Ok(rpcs.endpoint(chain)?)
}

pub fn market_address(config: &MintConfig) -> Result<Address, MarketError> {
    let raw = config.market_address.as_deref().ok_or_else(|| {
        MarketError::Config(
            "no marketplace address; run `mint deploy` or `mint config set-market`".into(),
        )
    })?;
    Ok(parse_address(raw)?)
}

/// Timeout applied to every RPC and pinning-service request.
pub fn request_timeout(config: &MintConfig) -> Duration {
    Duration::from_secs(config.request_timeout_secs)
}

pub fn load_wallets() -> Result<WalletStore> {
    WalletStore::load_from_file(&MintConfig::wallets_path()?)
}

pub fn save_wallets(wallets: &WalletStore) -> Result<()> {
    wallets.save_to_file(&MintConfig::wallets_path()?)
}

/// Build the context against the configured chain and pinning service, and
/// restore the remembered account.
pub fn open_context(config: &MintConfig, wallets: WalletStore) -> Result<NftContext> {
    let endpoint = rpc_endpoint(config)?;
    let address = market_address(config)?;
    debug!(%endpoint, %address, network = %config.network, "opening marketplace");

    let connector = EvmConnector::new(endpoint, address, request_timeout(config));
    let store = IpfsClient::from_config(config);
    let mut ctx = NftContext::new(
        Box::new(connector),
        Box::new(store),
        wallets,
        config.currency.clone(),
    );
    ctx.check_if_wallet_is_connected(config.active_wallet.as_deref());
    Ok(ctx)
}

/// The remembered wallet, or an error telling the user to connect one.
pub fn active_wallet(config: &MintConfig) -> Result<&str, MarketError> {
    config
        .active_wallet
        .as_deref()
        .ok_or_else(|| MarketError::Wallet("no wallet connected; run `mint connect <wallet>`".into()))
}

/// Password from `MINT_WALLET_PASSWORD`, otherwise prompted on stderr and
/// read from stdin.
pub fn password(wallet: &str) -> Result<String> {
    if let Ok(pw) = std::env::var(ENV_WALLET_PASSWORD)
        && !pw.is_empty()
    {
        return Ok(pw);
    }
    let stdin = std::io::stdin();
    prompt_password(wallet, &mut stdin.lock(), &mut std::io::stderr())
}

fn prompt_password(wallet: &str, input: &mut impl BufRead, prompt: &mut impl Write) -> Result<String> {
    write!(prompt, "Password for wallet `{wallet}`: ")?;
    prompt.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("failed to read password")?;
    let pw = line.trim_end_matches(['\r', '\n']).to_string();
    if pw.is_empty() {
        anyhow::bail!(MarketError::Wallet("password must not be empty".into()));
    }
    Ok(pw)
}

/// Unlock the remembered wallet on the context.
pub fn unlock_context(ctx: &mut NftContext, config: &MintConfig) -> Result<Address> {
    let wallet = active_wallet(config)?;
    let pw = password(wallet)?;
    Ok(ctx.connect_wallet(wallet, &pw)?)
}

/// Unlock the remembered wallet straight from the keystore, for commands that
/// run before a marketplace exists.
pub fn unlock_signer(wallets: &WalletStore, config: &MintConfig) -> Result<PrivateKeySigner> {
    let wallet = active_wallet(config)?;
    let pw = password(wallet)?;
    Ok(wallets.unlock(wallet, &pw).map_err(MarketError::from)?)
}
