//! Conversion between human-entered ether amounts and on-chain wei.

use alloy::primitives::U256;
use alloy::primitives::utils::parse_ether;

use crate::error::ChainError;

/// Number of decimals in one ether.
pub const ETHER_DECIMALS: usize = 18;

/// Parse a decimal ether amount (`"0.025"`) into wei.
pub fn parse_price(input: &str) -> Result<U256, ChainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.starts_with('-') || trimmed.starts_with('+') {
        return Err(ChainError::InvalidPrice(input.to_string()));
    }
    // Sub-wei precision cannot be represented; reject rather than truncate.
    if let Some((_, fraction)) = trimmed.split_once('.')
        && fraction.len() > ETHER_DECIMALS
    {
        return Err(ChainError::InvalidPrice(input.to_string()));
    }
    parse_ether(trimmed).map_err(|_| ChainError::InvalidPrice(input.to_string()))
}

/// Format wei as a decimal ether string, keeping at least one fractional
/// digit: 1 ether is `"1.0"`, 0.025 ether is `"0.025"`.
pub fn format_price(wei: U256) -> String {
    let unit = U256::from(10u64).pow(U256::from(ETHER_DECIMALS));
    let whole = wei / unit;
    let fraction = (wei % unit).to_string();

    let padded = format!("{fraction:0>width$}", width = ETHER_DECIMALS);
    let trimmed = padded.trim_end_matches('0');
    let fraction = if trimmed.is_empty() { "0" } else { trimmed };

    format!("{whole}.{fraction}")
}
