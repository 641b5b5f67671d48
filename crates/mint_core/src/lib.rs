pub mod config;
pub mod error;
pub mod logging;

pub use config::{MintConfig, validate_url};
pub use error::{ErrorCategory, MarketError};
