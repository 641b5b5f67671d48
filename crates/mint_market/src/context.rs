use futures::future::try_join_all;
use mint_chain::{
    Address, ChainError, MarketItem, Marketplace, MarketplaceConnector, PrivateKeySigner,
    TxOutcome, U256, WalletStore, format_price, parse_price,
};
use mint_core::MarketError;
use mint_storage::{ContentStore, NftMetadata};
use tracing::{debug, error, info, warn};

use crate::item::{FetchKind, Minted, NftForm, NftItem};

/// Shared state and actions for every page: the connected account, the
/// currency label, and the calls into the wallet, contract, and storage.
pub struct NftContext {
    connector: Box<dyn MarketplaceConnector>,
    store: Box<dyn ContentStore>,
    wallets: WalletStore,
    current_account: Option<Address>,
    signer: Option<PrivateKeySigner>,
    nft_currency: String,
}

impl NftContext {
    pub fn new(
        connector: Box<dyn MarketplaceConnector>,
        store: Box<dyn ContentStore>,
        wallets: WalletStore,
        nft_currency: impl Into<String>,
    ) -> Self {
        Self {
            connector,
            store,
            wallets,
            current_account: None,
            signer: None,
            nft_currency: nft_currency.into(),
        }
    }

    pub fn nft_currency(&self) -> &str {
        &self.nft_currency
    }

    pub fn current_account(&self) -> Option<Address> {
        self.current_account
    }

    // -- Wallet --------------------------------------------------------------

    /// Restore the remembered account without unlocking it. Reads still work;
    /// anything that signs needs [`connect_wallet`](Self::connect_wallet).
    pub fn check_if_wallet_is_connected(&mut self, remembered: Option<&str>) -> Option<Address> {
        let Some(wallet) = remembered else {
            info!("No accounts found");
            return None;
        };
        let Some(entry) = self.wallets.find(wallet) else {
            warn!(wallet, "remembered wallet is no longer in the keystore");
            return None;
        };
        match entry.address() {
            Ok(address) => {
                self.current_account = Some(address);
                Some(address)
            }
            Err(e) => {
                warn!(wallet, "stored wallet has a bad address: {e}");
                None
            }
        }
    }

    /// Unlock a keystore wallet and make it the signer for later actions.
    pub fn connect_wallet(&mut self, wallet: &str, password: &str) -> Result<Address, MarketError> {
        let signer = self.wallets.unlock(wallet, password)?;
        let address = signer.address();
        self.signer = Some(signer);
        self.current_account = Some(address);
        info!(%address, "wallet connected");
        Ok(address)
    }

    fn signer(&self) -> Result<PrivateKeySigner, MarketError> {
        Ok(self.signer.clone().ok_or(ChainError::NoSigner)?)
    }

    fn signed_market(&self) -> Result<Box<dyn Marketplace>, MarketError> {
        Ok(self.connector.with_signer(self.signer()?)?)
    }

    /// Handle for views scoped to the current account. A restored account is
    /// enough; no unlock is needed for `eth_call`.
    fn account_market(&self) -> Result<Box<dyn Marketplace>, MarketError> {
        if self.signer.is_some() {
            return self.signed_market();
        }
        let account = self.current_account.ok_or(ChainError::NoSigner)?;
        Ok(self.connector.read_as(account)?)
    }

    /// Native balance of the connected account, formatted in ether.
    pub async fn account_balance(&self) -> Result<String, MarketError> {
        let account = self
            .current_account
            .ok_or_else(|| MarketError::Wallet("no wallet connected".into()))?;
        let wei = self.connector.balance(account).await?;
        Ok(format_price(wei))
    }

    // -- Storage -------------------------------------------------------------

    /// Upload a file and return the URL it is served from.
    pub async fn upload_to_ipfs(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, MarketError> {
        match self.store.add_bytes(bytes, file_name).await {
            Ok(url) => Ok(url),
            Err(e) => {
                error!("Error uploading file to IPFS: {e}");
                Err(e.into())
            }
        }
    }

    // -- Minting -------------------------------------------------------------

    /// List a token whose metadata already lives at `url`, paying the
    /// marketplace's listing fee.
    pub async fn create_sale(&self, url: &str, form_price: &str) -> Result<TxOutcome, MarketError> {
        let price = parse_price(form_price)?;
        let market = self.signed_market()?;
        let listing_price = market.listing_price().await?;

        debug!(%price, %listing_price, "creating token");
        let tx = market.create_token(url, price, listing_price).await?;
        Ok(tx)
    }

    /// Upload the metadata document for `form` and list the new token.
    ///
    /// Nothing is uploaded or sent unless the form is complete, the price
    /// parses, and a wallet is unlocked.
    pub async fn create_nft(&self, form: &NftForm, file_url: &str) -> Result<Minted, MarketError> {
        form.ensure_complete(file_url)?;
        parse_price(&form.price)?;
        self.signer()?;

        let metadata = NftMetadata::new(
            form.name.trim(),
            form.description.trim(),
            file_url.trim(),
        );
        let metadata_url = match self.store.add_json(&metadata).await {
            Ok(url) => url,
            Err(e) => {
                error!("Error uploading metadata to IPFS: {e}");
                return Err(e.into());
            }
        };

        let tx = self.create_sale(&metadata_url, &form.price).await?;
        info!(name = %metadata.name, %metadata_url, tx = %tx.tx_hash, "NFT created");
        Ok(Minted { metadata_url, tx })
    }

    // -- Reads ---------------------------------------------------------------

    /// All unsold listings. Uses a read-only handle; no wallet required.
    pub async fn fetch_nfts(&self) -> Result<Vec<NftItem>, MarketError> {
        let market = self.connector.read_only()?;
        let items = market.fetch_market_items().await?;
        self.enrich_all(market.as_ref(), items).await
    }

    /// The connected account's own tokens, or the ones it has listed.
    pub async fn fetch_my_nfts_or_listed_nfts(
        &self,
        kind: FetchKind,
    ) -> Result<Vec<NftItem>, MarketError> {
        let market = self.account_market()?;
        let items = match kind {
            FetchKind::ItemsListed => market.fetch_items_listed().await?,
            FetchKind::MyNfts => market.fetch_my_nfts().await?,
        };
        self.enrich_all(market.as_ref(), items).await
    }

    /// Look one token up among market listings and, when an account is
    /// connected, the account's own and listed tokens.
    pub async fn fetch_nft(&self, token_id: u64) -> Result<Option<NftItem>, MarketError> {
        let wanted = U256::from(token_id);

        let market = self.connector.read_only()?;
        let found = market
            .fetch_market_items()
            .await?
            .into_iter()
            .find(|item| item.token_id == wanted);
        if let Some(item) = found {
            return self.enrich(market.as_ref(), item).await.map(Some);
        }

        if self.current_account.is_none() {
            return Ok(None);
        }
        let market = self.account_market()?;
        for kind in [FetchKind::MyNfts, FetchKind::ItemsListed] {
            let items = match kind {
                FetchKind::MyNfts => market.fetch_my_nfts().await?,
                FetchKind::ItemsListed => market.fetch_items_listed().await?,
            };
            if let Some(item) = items.into_iter().find(|item| item.token_id == wanted) {
                return self.enrich(market.as_ref(), item).await.map(Some);
            }
        }
        Ok(None)
    }

    async fn enrich_all(
        &self,
        market: &dyn Marketplace,
        items: Vec<MarketItem>,
    ) -> Result<Vec<NftItem>, MarketError> {
        debug!(count = items.len(), "fetching token metadata");
        try_join_all(items.into_iter().map(|item| self.enrich(market, item))).await
    }

    async fn enrich(&self, market: &dyn Marketplace, item: MarketItem) -> Result<NftItem, MarketError> {
        let token_id = u64::try_from(item.token_id)
            .map_err(|_| MarketError::Contract(format!("token id {} exceeds u64", item.token_id)))?;
        let token_uri = market.token_uri(item.token_id).await?;
        let metadata = self.store.fetch_metadata(&token_uri).await?;

        Ok(NftItem {
            token_id,
            seller: item.seller.to_string(),
            owner: item.owner.to_string(),
            price: format_price(item.price),
            image: metadata.image,
            name: metadata.name,
            description: metadata.description,
            token_uri,
        })
    }

    // -- Trading -------------------------------------------------------------

    /// Buy a listed token, paying exactly its asking price.
    pub async fn buy_nft(&self, nft: &NftItem) -> Result<TxOutcome, MarketError> {
        let price = parse_price(&nft.price)?;
        let market = self.signed_market()?;

        debug!(token_id = nft.token_id, %price, "buying token");
        let tx = market
            .create_market_sale(U256::from(nft.token_id), price)
            .await?;
        info!(token_id = nft.token_id, tx = %tx.tx_hash, "NFT bought");
        Ok(tx)
    }

    /// Put an owned token back on the market at `form_price`.
    pub async fn resell_nft(&self, token_id: u64, form_price: &str) -> Result<TxOutcome, MarketError> {
        let price = parse_price(form_price)?;
        let market = self.signed_market()?;
        let listing_price = market.listing_price().await?;

        let tx = market
            .resell_token(U256::from(token_id), price, listing_price)
            .await?;
        info!(token_id, tx = %tx.tx_hash, "NFT relisted");
        Ok(tx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use mint_storage::StorageError;
    use parking_lot::Mutex;

    use super::*;

    const HARDHAT_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const HARDHAT_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const MARKET: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    fn ether_milli(milli: u64) -> U256 {
        U256::from(milli) * U256::from(1_000_000_000_000_000u64)
    }

    // -- Chain double ----------------------------------------------------------

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        CreateToken { uri: String, price: U256, value: U256 },
        Resell { token_id: U256, price: U256, value: U256 },
        Sale { token_id: U256, value: U256 },
    }

    #[derive(Default)]
    struct ChainState {
        listing_price: U256,
        market_items: Vec<MarketItem>,
        my_items: Vec<MarketItem>,
        listed_items: Vec<MarketItem>,
        calls: Vec<Call>,
        senders: Vec<Address>,
    }

    #[derive(Clone, Default)]
    struct MockChain(Arc<Mutex<ChainState>>);

    struct MockMarket {
        chain: MockChain,
        from: Option<Address>,
        signs: bool,
    }

    impl MockMarket {
        fn record(&self, call: Call) -> Result<TxOutcome, ChainError> {
            let from = self.from.filter(|_| self.signs).ok_or(ChainError::NoSigner)?;
            let mut state = self.chain.0.lock();
            state.calls.push(call);
            state.senders.push(from);
            Ok(TxOutcome {
                tx_hash: format!("0x{:064x}", state.calls.len()),
                block_number: Some(1),
                gas_used: 21_000,
            })
        }
    }

    #[async_trait]
    impl Marketplace for MockMarket {
        fn address(&self) -> Address {
            MARKET.parse().unwrap()
        }

        async fn listing_price(&self) -> Result<U256, ChainError> {
            Ok(self.chain.0.lock().listing_price)
        }

        async fn create_token(&self, uri: &str, price: U256, value: U256) -> Result<TxOutcome, ChainError> {
            self.record(Call::CreateToken {
                uri: uri.to_string(),
                price,
                value,
            })
        }

        async fn resell_token(&self, token_id: U256, price: U256, value: U256) -> Result<TxOutcome, ChainError> {
            self.record(Call::Resell {
                token_id,
                price,
                value,
            })
        }

        async fn create_market_sale(&self, token_id: U256, value: U256) -> Result<TxOutcome, ChainError> {
            self.record(Call::Sale { token_id, value })
        }

        async fn fetch_market_items(&self) -> Result<Vec<MarketItem>, ChainError> {
            Ok(self.chain.0.lock().market_items.clone())
        }

        async fn fetch_my_nfts(&self) -> Result<Vec<MarketItem>, ChainError> {
            self.from.ok_or(ChainError::NoSigner)?;
            Ok(self.chain.0.lock().my_items.clone())
        }

        async fn fetch_items_listed(&self) -> Result<Vec<MarketItem>, ChainError> {
            self.from.ok_or(ChainError::NoSigner)?;
            Ok(self.chain.0.lock().listed_items.clone())
        }

        async fn token_uri(&self, token_id: U256) -> Result<String, ChainError> {
            Ok(format!("https://gw.test/ipfs/meta-{token_id}"))
        }
    }

    #[async_trait]
    impl MarketplaceConnector for MockChain {
        fn read_only(&self) -> Result<Box<dyn Marketplace>, ChainError> {
            Ok(Box::new(MockMarket {
                chain: self.clone(),
                from: None,
                signs: false,
            }))
        }

        fn read_as(&self, account: Address) -> Result<Box<dyn Marketplace>, ChainError> {
            Ok(Box::new(MockMarket {
                chain: self.clone(),
                from: Some(account),
                signs: false,
            }))
        }

        fn with_signer(&self, signer: PrivateKeySigner) -> Result<Box<dyn Marketplace>, ChainError> {
            Ok(Box::new(MockMarket {
                chain: self.clone(),
                from: Some(signer.address()),
                signs: true,
            }))
        }

        async fn balance(&self, _account: Address) -> Result<U256, ChainError> {
            Ok(ether_milli(2_500))
        }
    }

    // -- Storage double --------------------------------------------------------

    #[derive(Default)]
    struct StoreState {
        files: Vec<(String, Vec<u8>)>,
        documents: Vec<NftMetadata>,
        metadata: HashMap<String, NftMetadata>,
        fail_uploads: bool,
    }

    #[derive(Clone, Default)]
    struct MockStore(Arc<Mutex<StoreState>>);

    #[async_trait]
    impl ContentStore for MockStore {
        async fn add_bytes(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, StorageError> {
            let mut state = self.0.lock();
            if state.fail_uploads {
                return Err(StorageError::Unauthorized);
            }
            state.files.push((file_name.to_string(), bytes));
            Ok(format!("https://gw.test/ipfs/file-{}", state.files.len()))
        }

        async fn add_json(&self, metadata: &NftMetadata) -> Result<String, StorageError> {
            let mut state = self.0.lock();
            if state.fail_uploads {
                return Err(StorageError::Unauthorized);
            }
            state.documents.push(metadata.clone());
            Ok(format!("https://gw.test/ipfs/doc-{}", state.documents.len()))
        }

        async fn fetch_metadata(&self, uri: &str) -> Result<NftMetadata, StorageError> {
            self.0
                .lock()
                .metadata
                .get(uri)
                .cloned()
                .ok_or_else(|| StorageError::Api {
                    status: 404,
                    body: uri.to_string(),
                })
        }
    }

    // -- Fixtures --------------------------------------------------------------

    struct Harness {
        ctx: NftContext,
        chain: MockChain,
        store: MockStore,
    }

    fn item(token_id: u64, price_milli: u64) -> MarketItem {
        MarketItem {
            token_id: U256::from(token_id),
            seller: Address::repeat_byte(0xaa),
            owner: MARKET.parse().unwrap(),
            price: ether_milli(price_milli),
            sold: false,
        }
    }

    fn publish(store: &MockStore, token_id: u64, name: &str) {
        store.0.lock().metadata.insert(
            format!("https://gw.test/ipfs/meta-{token_id}"),
            NftMetadata::new(name, format!("{name} description"), format!("https://gw.test/ipfs/img-{token_id}")),
        );
    }

    fn harness() -> Harness {
        let chain = MockChain::default();
        chain.0.lock().listing_price = ether_milli(25);
        let store = MockStore::default();

        let mut wallets = WalletStore::new();
        wallets.import_wallet("dev", HARDHAT_KEY, "pw").unwrap();

        let ctx = NftContext::new(
            Box::new(chain.clone()),
            Box::new(store.clone()),
            wallets,
            "ETH",
        );
        Harness { ctx, chain, store }
    }

    fn connected() -> Harness {
        let mut h = harness();
        h.ctx.connect_wallet("dev", "pw").unwrap();
        h
    }

    fn form(price: &str) -> NftForm {
        NftForm {
            name: "Ape".into(),
            description: "A fine ape".into(),
            price: price.into(),
        }
    }

    // -- Wallet ----------------------------------------------------------------

    #[test]
    fn currency_label_is_exposed() {
        assert_eq!(harness().ctx.nft_currency(), "ETH");
    }

    #[test]
    fn check_without_remembered_wallet_finds_nothing() {
        let mut h = harness();
        assert!(h.ctx.check_if_wallet_is_connected(None).is_none());
        assert!(h.ctx.check_if_wallet_is_connected(Some("ghost")).is_none());
        assert!(h.ctx.current_account().is_none());
    }

    #[test]
    fn check_restores_remembered_account_without_unlocking() {
        let mut h = harness();
        let account = h.ctx.check_if_wallet_is_connected(Some("dev")).unwrap();
        assert_eq!(account.to_string(), HARDHAT_ADDRESS);
        assert!(h.ctx.signer.is_none());
    }

    #[test]
    fn connect_wallet_sets_current_account() {
        let h = connected();
        assert_eq!(h.ctx.current_account().unwrap().to_string(), HARDHAT_ADDRESS);
    }

    #[test]
    fn connect_wallet_with_wrong_password_fails() {
        let mut h = harness();
        let err = h.ctx.connect_wallet("dev", "nope").unwrap_err();
        assert!(matches!(err, MarketError::Wallet(_)));
        assert!(h.ctx.current_account().is_none());
    }

    #[tokio::test]
    async fn account_balance_formats_ether() {
        let h = connected();
        assert_eq!(h.ctx.account_balance().await.unwrap(), "2.5");
        assert!(harness().ctx.account_balance().await.is_err());
    }

    // -- Upload ----------------------------------------------------------------

    #[tokio::test]
    async fn upload_returns_store_url() {
        let h = harness();
        let url = h.ctx.upload_to_ipfs(b"png".to_vec(), "ape.png").await.unwrap();
        assert_eq!(url, "https://gw.test/ipfs/file-1");
        assert_eq!(h.store.0.lock().files[0].0, "ape.png");
    }

    #[tokio::test]
    async fn upload_failure_is_a_storage_error() {
        let h = harness();
        h.store.0.lock().fail_uploads = true;
        let err = h.ctx.upload_to_ipfs(b"png".to_vec(), "ape.png").await.unwrap_err();
        assert!(matches!(err, MarketError::Storage(_)));
    }

    // -- Create ----------------------------------------------------------------

    #[tokio::test]
    async fn create_nft_uploads_metadata_then_lists_with_fee() {
        let h = connected();
        let minted = h
            .ctx
            .create_nft(&form("1.5"), "https://gw.test/ipfs/file-1")
            .await
            .unwrap();

        assert_eq!(minted.metadata_url, "https://gw.test/ipfs/doc-1");
        let docs = h.store.0.lock().documents.clone();
        assert_eq!(
            docs,
            vec![NftMetadata::new("Ape", "A fine ape", "https://gw.test/ipfs/file-1")]
        );

        let state = h.chain.0.lock();
        assert_eq!(
            state.calls,
            vec![Call::CreateToken {
                uri: "https://gw.test/ipfs/doc-1".into(),
                price: ether_milli(1_500),
                value: ether_milli(25),
            }]
        );
        assert_eq!(state.senders[0].to_string(), HARDHAT_ADDRESS);
    }

    #[tokio::test]
    async fn incomplete_form_has_no_side_effects() {
        let h = connected();
        let mut f = form("1");
        f.name.clear();

        let err = h.ctx.create_nft(&f, "https://gw.test/ipfs/file-1").await.unwrap_err();
        assert!(matches!(err, MarketError::IncompleteForm("name")));

        let err = h.ctx.create_nft(&form("1"), "").await.unwrap_err();
        assert!(matches!(err, MarketError::IncompleteForm("file")));

        assert!(h.store.0.lock().documents.is_empty());
        assert!(h.chain.0.lock().calls.is_empty());
    }

    #[tokio::test]
    async fn bad_price_is_rejected_before_upload() {
        let h = connected();
        let err = h
            .ctx
            .create_nft(&form("one ether"), "https://gw.test/ipfs/file-1")
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::InvalidInput(_)));
        assert!(h.store.0.lock().documents.is_empty());
    }

    #[tokio::test]
    async fn locked_wallet_is_rejected_before_upload() {
        let h = harness();
        let err = h
            .ctx
            .create_nft(&form("1"), "https://gw.test/ipfs/file-1")
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::Wallet(_)));
        assert!(h.store.0.lock().documents.is_empty());
    }

    // -- Fetch -----------------------------------------------------------------

    #[tokio::test]
    async fn fetch_nfts_enriches_in_contract_order() {
        let h = harness();
        h.chain.0.lock().market_items = vec![item(2, 250), item(1, 1_000)];
        publish(&h.store, 1, "First");
        publish(&h.store, 2, "Second");

        let items = h.ctx.fetch_nfts().await.unwrap();
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].token_id, 2);
        assert_eq!(items[0].name, "Second");
        assert_eq!(items[0].price, "0.25");
        assert_eq!(items[0].image, "https://gw.test/ipfs/img-2");
        assert_eq!(items[0].token_uri, "https://gw.test/ipfs/meta-2");
        assert_eq!(items[0].owner, MARKET);

        assert_eq!(items[1].token_id, 1);
        assert_eq!(items[1].price, "1.0");
    }

    #[tokio::test]
    async fn missing_metadata_fails_the_fetch() {
        let h = harness();
        h.chain.0.lock().market_items = vec![item(1, 1_000), item(9, 1_000)];
        publish(&h.store, 1, "First");

        let err = h.ctx.fetch_nfts().await.unwrap_err();
        assert!(matches!(err, MarketError::Storage(_)));
    }

    #[tokio::test]
    async fn fetch_by_kind_reads_the_matching_view() {
        let h = connected();
        {
            let mut state = h.chain.0.lock();
            state.my_items = vec![item(3, 100)];
            state.listed_items = vec![item(4, 200), item(5, 300)];
        }
        for id in 3..=5 {
            publish(&h.store, id, &format!("Token {id}"));
        }

        let mine = h.ctx.fetch_my_nfts_or_listed_nfts(FetchKind::MyNfts).await.unwrap();
        assert_eq!(mine.iter().map(|i| i.token_id).collect::<Vec<_>>(), vec![3]);

        let listed = h
            .ctx
            .fetch_my_nfts_or_listed_nfts(FetchKind::ItemsListed)
            .await
            .unwrap();
        assert_eq!(listed.iter().map(|i| i.token_id).collect::<Vec<_>>(), vec![4, 5]);
    }

    #[tokio::test]
    async fn fetch_by_kind_needs_a_wallet() {
        let h = harness();
        let err = h
            .ctx
            .fetch_my_nfts_or_listed_nfts(FetchKind::MyNfts)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::Wallet(_)));
    }

    #[tokio::test]
    async fn fetch_nft_searches_market_then_owned() {
        let h = connected();
        {
            let mut state = h.chain.0.lock();
            state.market_items = vec![item(1, 100)];
            state.my_items = vec![item(7, 100)];
        }
        publish(&h.store, 1, "Listed");
        publish(&h.store, 7, "Owned");

        assert_eq!(h.ctx.fetch_nft(1).await.unwrap().unwrap().name, "Listed");
        assert_eq!(h.ctx.fetch_nft(7).await.unwrap().unwrap().name, "Owned");
        assert!(h.ctx.fetch_nft(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn restored_account_finds_owned_token_without_unlocking() {
        let mut h = harness();
        h.ctx.check_if_wallet_is_connected(Some("dev"));
        h.chain.0.lock().my_items = vec![item(7, 100)];
        publish(&h.store, 7, "Owned");

        let found = h.ctx.fetch_nft(7).await.unwrap().unwrap();
        assert_eq!(found.name, "Owned");
        assert!(h.ctx.signer.is_none());
    }

    #[tokio::test]
    async fn restored_account_lists_by_kind_but_cannot_trade() {
        let mut h = harness();
        h.ctx.check_if_wallet_is_connected(Some("dev"));
        h.chain.0.lock().listed_items = vec![item(4, 200)];
        publish(&h.store, 4, "Listed");

        let listed = h
            .ctx
            .fetch_my_nfts_or_listed_nfts(FetchKind::ItemsListed)
            .await
            .unwrap();
        assert_eq!(listed[0].token_id, 4);

        assert!(matches!(
            h.ctx.resell_nft(4, "1").await,
            Err(MarketError::Wallet(_))
        ));
        assert!(h.chain.0.lock().calls.is_empty());
    }

    #[tokio::test]
    async fn fetch_nft_without_account_only_searches_market() {
        let h = harness();
        h.chain.0.lock().my_items = vec![item(7, 100)];
        publish(&h.store, 7, "Owned");
        assert!(h.ctx.fetch_nft(7).await.unwrap().is_none());
    }

    // -- Trade -----------------------------------------------------------------

    #[tokio::test]
    async fn buy_pays_the_asking_price() {
        let h = connected();
        h.chain.0.lock().market_items = vec![item(1, 1_500)];
        publish(&h.store, 1, "Ape");

        let nft = h.ctx.fetch_nfts().await.unwrap().remove(0);
        h.ctx.buy_nft(&nft).await.unwrap();

        assert_eq!(
            h.chain.0.lock().calls,
            vec![Call::Sale {
                token_id: U256::from(1u64),
                value: ether_milli(1_500),
            }]
        );
    }

    #[tokio::test]
    async fn buy_without_wallet_fails() {
        let h = harness();
        h.chain.0.lock().market_items = vec![item(1, 1_500)];
        publish(&h.store, 1, "Ape");

        let nft = h.ctx.fetch_nfts().await.unwrap().remove(0);
        assert!(matches!(
            h.ctx.buy_nft(&nft).await,
            Err(MarketError::Wallet(_))
        ));
        assert!(h.chain.0.lock().calls.is_empty());
    }

    #[tokio::test]
    async fn resell_pays_listing_fee_and_sets_new_price() {
        let h = connected();
        h.ctx.resell_nft(7, "2").await.unwrap();

        assert_eq!(
            h.chain.0.lock().calls,
            vec![Call::Resell {
                token_id: U256::from(7u64),
                price: ether_milli(2_000),
                value: ether_milli(25),
            }]
        );
    }
}
