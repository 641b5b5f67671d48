use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use mint_core::MarketError;
use mint_market::{NftContext, NftForm};

fn file_name(path: &Path) -> Result<&str, MarketError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .ok_or(MarketError::IncompleteForm("file"))
}

/// Validate the text fields, price included, before the file is read or uploaded.
fn check_form(form: &NftForm, name: &str) -> Result<(), MarketError> {
    form.ensure_complete(name)?;
    mint_chain::parse_price(&form.price)?;
    Ok(())
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if bytes.is_empty() {
        anyhow::bail!(MarketError::InvalidInput(format!("{} is empty", path.display())));
    }
    Ok(bytes)
}

/// Upload a file on its own and print where it is served from.
pub async fn upload(ctx: &NftContext, path: &Path, out: &mut impl Write) -> Result<()> {
    let name = file_name(path)?;
    let bytes = read_file(path).await?;
    let url = ctx.upload_to_ipfs(bytes, name).await?;
    writeln!(out, "{url}")?;
    Ok(())
}

/// Upload the asset, then mint and list it using the form.
pub async fn run(ctx: &NftContext, form: &NftForm, path: &Path, out: &mut impl Write) -> Result<()> {
    let name = file_name(path)?;
    check_form(form, name)?;
    let bytes = read_file(path).await?;

    let file_url = ctx.upload_to_ipfs(bytes, name).await?;
    writeln!(out, "Uploaded {name} to {file_url}")?;

    let minted = ctx.create_nft(form, &file_url).await?;
    writeln!(out, "Metadata  {}", minted.metadata_url)?;
    writeln!(
        out,
        "Created {} and listed it for {} {} (tx {})",
        form.name.trim(),
        form.price.trim(),
        ctx.nft_currency(),
        minted.tx.tx_hash
    )?;
    Ok(())
}
