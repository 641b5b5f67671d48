//! Marketplace context: wallet session, uploads, and contract actions behind
//! one value that command pages share.

pub mod context;
pub mod item;
pub mod listing;

pub use context::NftContext;
pub use item::{FetchKind, Minted, NftForm, NftItem};
pub use listing::{ListingQuery, SortOrder};
