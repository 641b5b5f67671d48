use std::io::Write;

use anyhow::Result;
use mint_market::NftItem;

/// `0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266` → `0xf39...2266`.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 9 {
        return address.to_string();
    }
    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// One-line summary used by the listing pages.
pub fn card(out: &mut impl Write, item: &NftItem, currency: &str) -> Result<()> {
    writeln!(
        out,
        "#{:<4} {:<28} {:>12} {currency}  seller {}",
        item.token_id,
        item.name,
        item.price,
        shorten_address(&item.seller),
    )?;
    Ok(())
}

pub fn cards(out: &mut impl Write, items: &[NftItem], currency: &str, empty: &str) -> Result<()> {
    if items.is_empty() {
        writeln!(out, "{empty}")?;
        return Ok(());
    }
    for item in items {
        card(out, item, currency)?;
    }
    Ok(())
}

pub fn json(out: &mut impl Write, items: &[NftItem]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, items)?;
    writeln!(out)?;
    Ok(())
}

/// Full view of a single token.
pub fn details(out: &mut impl Write, item: &NftItem, currency: &str) -> Result<()> {
    writeln!(out, "{} (#{})", item.name, item.token_id)?;
    writeln!(out)?;
    writeln!(out, "  Price        {} {currency}", item.price)?;
    writeln!(out, "  Seller       {}", shorten_address(&item.seller))?;
    writeln!(out, "  Owner        {}", shorten_address(&item.owner))?;
    writeln!(out, "  Image        {}", item.image)?;
    writeln!(out, "  Metadata     {}", item.token_uri)?;
    writeln!(out)?;
    writeln!(out, "{}", item.description)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn sample(token_id: u64, name: &str, price: &str) -> NftItem {
    NftItem {
        token_id,
        seller: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".into(),
        owner: "0x5FbDB2315678afecb367f032d93F642f64180aa3".into(),
        price: price.into(),
        image: format!("https://ipfs.io/ipfs/img-{token_id}"),
        name: name.into(),
        description: format!("{name} description"),
        token_uri: format!("https://ipfs.io/ipfs/meta-{token_id}"),
    }
}
