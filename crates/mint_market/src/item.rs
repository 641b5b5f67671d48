use mint_chain::TxOutcome;
use mint_core::MarketError;
use serde::{Deserialize, Serialize};

/// A marketplace listing enriched with its metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftItem {
    pub token_id: u64,
    pub seller: String,
    pub owner: String,
    /// Decimal ether amount, e.g. `"0.025"`.
    pub price: String,
    pub image: String,
    pub name: String,
    pub description: String,
    pub token_uri: String,
}

impl NftItem {
    /// Whether `account` is the seller or the current owner.
    pub fn involves(&self, account: &str) -> bool {
        self.seller.eq_ignore_ascii_case(account) || self.owner.eq_ignore_ascii_case(account)
    }
}

/// What minting produced: the metadata document and the listing transaction.
#[derive(Debug, Clone)]
pub struct Minted {
    pub metadata_url: String,
    pub tx: TxOutcome,
}

/// Which signer-scoped view to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Tokens the signer listed and that are still for sale.
    ItemsListed,
    /// Tokens the signer owns.
    MyNfts,
}

/// User input for minting a new token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NftForm {
    pub name: String,
    pub description: String,
    pub price: String,
}

impl NftForm {
    /// Every field must be filled in, and a file must already be uploaded.
    pub fn ensure_complete(&self, file_url: &str) -> Result<(), MarketError> {
        let fields = [
            ("name", &self.name),
            ("description", &self.description),
            ("price", &self.price),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(MarketError::IncompleteForm(*field));
        }
        if file_url.trim().is_empty() {
            return Err(MarketError::IncompleteForm("file"));
        }
        Ok(())
    }
}
