use std::time::Duration;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::Http;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::ChainError;
use crate::marketplace::{MarketItem, Marketplace, MarketplaceConnector, NFTMarketplace, TxOutcome};

/// Parse a hex address, accepting any checksum casing.
pub fn parse_address(raw: &str) -> Result<Address, ChainError> {
    raw.trim()
        .parse()
        .map_err(|_| ChainError::InvalidAddress(raw.to_string()))
}

fn call_error(method: &'static str) -> impl FnOnce(alloy::contract::Error) -> ChainError {
    move |e| ChainError::Call {
        method,
        reason: e.to_string(),
    }
}

/// JSON-RPC client over HTTP whose requests give up after `timeout`.
pub fn rpc_client(rpc_url: url::Url, timeout: Duration) -> Result<RpcClient, ChainError> {
    let http = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ChainError::Transport(format!("failed to build HTTP client: {e}")))?;
    let is_local = matches!(rpc_url.host_str(), Some("localhost" | "127.0.0.1"));
    Ok(RpcClient::new(Http::with_client(http, rpc_url), is_local))
}

// ---------------------------------------------------------------------------
// Connector
// ---------------------------------------------------------------------------

/// Connects to a marketplace over HTTP JSON-RPC.
#[derive(Debug, Clone)]
pub struct EvmConnector {
    rpc_url: url::Url,
    market_address: Address,
    timeout: Duration,
}

impl EvmConnector {
    pub fn new(rpc_url: url::Url, market_address: Address, timeout: Duration) -> Self {
        Self {
            rpc_url,
            market_address,
            timeout,
        }
    }

    pub fn rpc_url(&self) -> &url::Url {
        &self.rpc_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn client(&self) -> Result<RpcClient, ChainError> {
        rpc_client(self.rpc_url.clone(), self.timeout)
    }

    fn view_handle(&self, access: Access) -> Result<Box<dyn Marketplace>, ChainError> {
        let provider = ProviderBuilder::new().connect_client(self.client()?).erased();
        Ok(Box::new(EvmMarketplace::new(provider, self.market_address, access)))
    }
}

#[async_trait]
impl MarketplaceConnector for EvmConnector {
    fn read_only(&self) -> Result<Box<dyn Marketplace>, ChainError> {
        self.view_handle(Access::ReadOnly)
    }

    fn read_as(&self, account: Address) -> Result<Box<dyn Marketplace>, ChainError> {
        self.view_handle(Access::ReadAs(account))
    }

    fn with_signer(&self, signer: PrivateKeySigner) -> Result<Box<dyn Marketplace>, ChainError> {
        let from = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_client(self.client()?)
            .erased();
        Ok(Box::new(EvmMarketplace::new(
            provider,
            self.market_address,
            Access::Signer(from),
        )))
    }

    async fn balance(&self, account: Address) -> Result<U256, ChainError> {
        let provider = ProviderBuilder::new().connect_client(self.client()?);
        provider
            .get_balance(account)
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Marketplace handle
// ---------------------------------------------------------------------------

/// What a handle may do on behalf of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Public views only.
    ReadOnly,
    /// Views evaluated with `from` set to the account; nothing is sent.
    ReadAs(Address),
    /// Views and transactions signed by the wallet for this address.
    Signer(Address),
}

/// A marketplace contract handle backed by an alloy provider.
pub struct EvmMarketplace {
    provider: DynProvider,
    address: Address,
    access: Access,
}

impl EvmMarketplace {
    pub fn new(provider: DynProvider, address: Address, access: Access) -> Self {
        Self {
            provider,
            address,
            access,
        }
    }

    fn contract(&self) -> NFTMarketplace::NFTMarketplaceInstance<DynProvider> {
        NFTMarketplace::new(self.address, self.provider.clone())
    }

    /// Account that `msg.sender`-scoped views run as.
    fn caller(&self) -> Result<Address, ChainError> {
        match self.access {
            Access::ReadAs(account) | Access::Signer(account) => Ok(account),
            Access::ReadOnly => Err(ChainError::NoSigner),
        }
    }

    /// Account that signs transactions.
    fn sender(&self) -> Result<Address, ChainError> {
        match self.access {
            Access::Signer(account) => Ok(account),
            Access::ReadOnly | Access::ReadAs(_) => Err(ChainError::NoSigner),
        }
    }

    async fn confirm(
        &self,
        method: &'static str,
        pending: PendingTransactionBuilder<alloy::network::Ethereum>,
    ) -> Result<TxOutcome, ChainError> {
        let tx_hash = pending.tx_hash().to_string();
        debug!(method, %tx_hash, "transaction submitted, waiting for receipt");

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        if !receipt.status() {
            warn!(method, %tx_hash, "transaction reverted");
            return Err(ChainError::Reverted { tx_hash });
        }

        info!(method, %tx_hash, gas_used = receipt.gas_used, "transaction mined");
        Ok(TxOutcome {
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}

#[async_trait]
impl Marketplace for EvmMarketplace {
    fn address(&self) -> Address {
        self.address
    }

    async fn listing_price(&self) -> Result<U256, ChainError> {
        self.contract()
            .getListingPrice()
            .call()
            .await
            .map_err(call_error("getListingPrice"))
    }

    async fn create_token(
        &self,
        token_uri: &str,
        price: U256,
        value: U256,
    ) -> Result<TxOutcome, ChainError> {
        self.sender()?;
        let pending = self
            .contract()
            .createToken(token_uri.to_string(), price)
            .value(value)
            .send()
            .await
            .map_err(call_error("createToken"))?;
        self.confirm("createToken", pending).await
    }

    async fn resell_token(
        &self,
        token_id: U256,
        price: U256,
        value: U256,
    ) -> Result<TxOutcome, ChainError> {
        self.sender()?;
        let pending = self
            .contract()
            .resellToken(token_id, price)
            .value(value)
            .send()
            .await
            .map_err(call_error("resellToken"))?;
        self.confirm("resellToken", pending).await
    }

    async fn create_market_sale(
        &self,
        token_id: U256,
        value: U256,
    ) -> Result<TxOutcome, ChainError> {
        self.sender()?;
        let pending = self
            .contract()
            .createMarketSale(token_id)
            .value(value)
            .send()
            .await
            .map_err(call_error("createMarketSale"))?;
        self.confirm("createMarketSale", pending).await
    }

    async fn fetch_market_items(&self) -> Result<Vec<MarketItem>, ChainError> {
        let items = self
            .contract()
            .fetchMarketItems()
            .call()
            .await
            .map_err(call_error("fetchMarketItems"))?;
        Ok(items.into_iter().map(MarketItem::from).collect())
    }

    async fn fetch_my_nfts(&self) -> Result<Vec<MarketItem>, ChainError> {
        let items = self
            .contract()
            .fetchMyNFTs()
            .from(self.caller()?)
            .call()
            .await
            .map_err(call_error("fetchMyNFTs"))?;
        Ok(items.into_iter().map(MarketItem::from).collect())
    }

    async fn fetch_items_listed(&self) -> Result<Vec<MarketItem>, ChainError> {
        let items = self
            .contract()
            .fetchItemsListed()
            .from(self.caller()?)
            .call()
            .await
            .map_err(call_error("fetchItemsListed"))?;
        Ok(items.into_iter().map(MarketItem::from).collect())
    }

    async fn token_uri(&self, token_id: U256) -> Result<String, ChainError> {
        self.contract()
            .tokenURI(token_id)
            .call()
            .await
            .map_err(call_error("tokenURI"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKET: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    fn connector() -> EvmConnector {
        EvmConnector::new(
            url::Url::parse("http://127.0.0.1:8545").unwrap(),
            parse_address(MARKET).unwrap(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn connector_carries_configured_timeout() {
        assert_eq!(connector().timeout(), Duration::from_secs(5));
    }

    #[test]
    fn rpc_client_recognizes_local_node() {
        let local = rpc_client(url::Url::parse("http://127.0.0.1:8545").unwrap(), Duration::from_secs(1));
        assert!(local.unwrap().is_local());
        let remote = rpc_client(url::Url::parse("https://rpc.sepolia.org").unwrap(), Duration::from_secs(1));
        assert!(!remote.unwrap().is_local());
    }

    #[test]
    fn parse_address_accepts_lowercase_and_whitespace() {
        let addr = parse_address("  0x5fbdb2315678afecb367f032d93f642f64180aa3 ").unwrap();
        assert_eq!(addr.to_string(), MARKET);
    }

    #[test]
    fn parse_address_rejects_garbage() {
        assert!(matches!(
            parse_address("0x1234"),
            Err(ChainError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn handles_point_at_configured_market() {
        let connector = connector();
        let read = connector.read_only().unwrap();
        assert_eq!(read.address(), parse_address(MARKET).unwrap());
    }

    #[tokio::test]
    async fn read_only_handle_refuses_sender_scoped_views() {
        // Fails before any request is made, so no node is needed.
        let read = connector().read_only().unwrap();
        assert!(matches!(
            read.fetch_my_nfts().await,
            Err(ChainError::NoSigner)
        ));
        assert!(matches!(
            read.create_market_sale(U256::from(1u64), U256::ZERO).await,
            Err(ChainError::NoSigner)
        ));
    }

    #[tokio::test]
    async fn read_as_handle_refuses_transactions() {
        let account = Address::repeat_byte(0x11);
        let view = connector().read_as(account).unwrap();
        assert!(matches!(
            view.create_market_sale(U256::from(1u64), U256::ZERO).await,
            Err(ChainError::NoSigner)
        ));
        assert!(matches!(
            view.resell_token(U256::from(1u64), U256::ZERO, U256::ZERO).await,
            Err(ChainError::NoSigner)
        ));
    }
}
