use std::io::Write;

use anyhow::Result;
use mint_chain::WalletStore;
use mint_core::MarketError;

pub fn new_wallet(wallets: &mut WalletStore, name: &str, password: &str, out: &mut impl Write) -> Result<()> {
    let id = wallets.create_wallet(name, password).map_err(MarketError::from)?;
    report_added(wallets, &id, out)
}

pub fn import_wallet(
    wallets: &mut WalletStore,
    name: &str,
    key: &str,
    password: &str,
    out: &mut impl Write,
) -> Result<()> {
    let id = wallets
        .import_wallet(name, key, password)
        .map_err(MarketError::from)?;
    report_added(wallets, &id, out)
}

fn report_added(wallets: &WalletStore, id: &str, out: &mut impl Write) -> Result<()> {
    if let Some(entry) = wallets.find(id) {
        writeln!(out, "Wallet `{}` added: {}", entry.name, entry.address)?;
    }
    Ok(())
}

pub fn list(wallets: &WalletStore, active: Option<&str>, out: &mut impl Write) -> Result<()> {
    if wallets.is_empty() {
        writeln!(out, "No wallets yet. Create one with `mint wallet new <name>`.")?;
        return Ok(());
    }
    for entry in wallets.list_wallets() {
        let marker = if active == Some(entry.name.as_str()) { "*" } else { " " };
        writeln!(
            out,
            "{marker} {:<16} {}  created {}",
            entry.name,
            entry.address,
            entry.created_at.format("%Y-%m-%d")
        )?;
    }
    Ok(())
}

pub fn remove(wallets: &mut WalletStore, name: &str, out: &mut impl Write) -> Result<()> {
    let entry = wallets
        .remove_wallet(name)
        .ok_or_else(|| MarketError::Wallet(format!("no wallet named `{name}`")))?;
    writeln!(out, "Removed wallet `{}` ({})", entry.name, entry.address)?;
    Ok(())
}
