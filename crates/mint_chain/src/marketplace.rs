//! Marketplace contract surface: ABI bindings and the async seam used by the
//! context layer.

use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChainError;

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract NFTMarketplace {
        struct MarketItem {
            uint256 tokenId;
            address seller;
            address owner;
            uint256 price;
            bool sold;
        }

        function getListingPrice() public view returns (uint256);
        function updateListingPrice(uint256 listingPrice) public payable;
        function createToken(string memory tokenURI, uint256 price) public payable returns (uint256);
        function resellToken(uint256 tokenId, uint256 price) public payable;
        function createMarketSale(uint256 tokenId) public payable;
        function fetchMarketItems() public view returns (MarketItem[] memory);
        function fetchMyNFTs() public view returns (MarketItem[] memory);
        function fetchItemsListed() public view returns (MarketItem[] memory);
        function tokenURI(uint256 tokenId) public view returns (string memory);
    }
}

/// A listing as the contract reports it, before metadata enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketItem {
    pub token_id: U256,
    pub seller: Address,
    pub owner: Address,
    pub price: U256,
    pub sold: bool,
}

impl From<NFTMarketplace::MarketItem> for MarketItem {
    fn from(item: NFTMarketplace::MarketItem) -> Self {
        Self {
            token_id: item.tokenId,
            seller: item.seller,
            owner: item.owner,
            price: item.price,
            sold: item.sold,
        }
    }
}

/// Result of a mined marketplace transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxOutcome {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Calls against one deployed marketplace contract.
///
/// Views that depend on `msg.sender` (`fetch_my_nfts`, `fetch_items_listed`)
/// need a handle bound to an account; state-changing calls need a signer.
#[async_trait]
pub trait Marketplace: Send + Sync {
    fn address(&self) -> Address;

    async fn listing_price(&self) -> Result<U256, ChainError>;

    async fn create_token(
        &self,
        token_uri: &str,
        price: U256,
        value: U256,
    ) -> Result<TxOutcome, ChainError>;

    async fn resell_token(
        &self,
        token_id: U256,
        price: U256,
        value: U256,
    ) -> Result<TxOutcome, ChainError>;

    async fn create_market_sale(&self, token_id: U256, value: U256)
    -> Result<TxOutcome, ChainError>;

    async fn fetch_market_items(&self) -> Result<Vec<MarketItem>, ChainError>;

    async fn fetch_my_nfts(&self) -> Result<Vec<MarketItem>, ChainError>;

    async fn fetch_items_listed(&self) -> Result<Vec<MarketItem>, ChainError>;

    async fn token_uri(&self, token_id: U256) -> Result<String, ChainError>;
}

/// Builds marketplace handles, read-only or bound to a signer.
#[async_trait]
pub trait MarketplaceConnector: Send + Sync {
    fn read_only(&self) -> Result<Box<dyn Marketplace>, ChainError>;

    /// Views run as `account` without a wallet; transactions are refused.
    fn read_as(&self, account: Address) -> Result<Box<dyn Marketplace>, ChainError>;

    fn with_signer(&self, signer: PrivateKeySigner) -> Result<Box<dyn Marketplace>, ChainError>;

    /// Native-currency balance of `account`, in wei.
    async fn balance(&self, account: Address) -> Result<U256, ChainError>;
}
