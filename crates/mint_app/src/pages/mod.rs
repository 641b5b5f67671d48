//! Command handlers. Each page calls into the context and renders plain text
//! (or JSON) to the given writer.

pub mod account;
pub mod create_nft;
pub mod deploy;
pub mod home;
pub mod my_nfts;
pub mod nft_details;
pub mod render;
pub mod resell;
pub mod settings;
pub mod wallet;
