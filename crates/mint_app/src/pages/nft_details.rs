use std::io::Write;

use anyhow::Result;
use mint_chain::Address;
use mint_core::MarketError;
use mint_market::{NftContext, NftItem};
use tracing::info;

use super::render;

async fn load(ctx: &NftContext, token_id: u64) -> Result<NftItem, MarketError> {
    ctx.fetch_nft(token_id)
        .await?
        .ok_or_else(|| MarketError::InvalidInput(format!("NFT #{token_id} was not found")))
}

/// Sellers and owners cannot buy their own token.
fn ensure_buyable(item: &NftItem, account: Option<Address>) -> Result<(), MarketError> {
    if let Some(account) = account
        && item.involves(&account.to_string())
    {
        return Err(MarketError::InvalidInput(
            "You cannot buy your own NFT. Use `mint resell` to list it instead.".into(),
        ));
    }
    Ok(())
}

pub async fn show(ctx: &NftContext, token_id: u64, out: &mut impl Write) -> Result<()> {
    let item = load(ctx, token_id).await?;
    render::details(out, &item, ctx.nft_currency())?;

    if ensure_buyable(&item, ctx.current_account()).is_ok() {
        writeln!(out)?;
        writeln!(out, "Buy it with `mint buy {token_id}`.")?;
    }
    Ok(())
}

pub async fn buy(ctx: &NftContext, token_id: u64, out: &mut impl Write) -> Result<()> {
    let item = load(ctx, token_id).await?;
    ensure_buyable(&item, ctx.current_account())?;

    let tx = ctx.buy_nft(&item).await?;
    info!(token_id, tx = %tx.tx_hash, "purchase confirmed");
    writeln!(
        out,
        "Bought {} for {} {} (tx {})",
        item.name,
        item.price,
        ctx.nft_currency(),
        tx.tx_hash
    )?;
    Ok(())
}
