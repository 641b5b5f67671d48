use std::io::Write;

use anyhow::Result;
use mint_market::{FetchKind, NftContext};

use super::render;

fn heading(kind: FetchKind) -> (&'static str, &'static str) {
    match kind {
        FetchKind::MyNfts => ("My NFTs", "No NFTs owned."),
        FetchKind::ItemsListed => ("NFTs listed for sale", "No NFTs listed for sale."),
    }
}

/// Tokens owned by, or listed by, the connected account.
pub async fn show(ctx: &NftContext, kind: FetchKind, json: bool, out: &mut impl Write) -> Result<()> {
    let items = ctx.fetch_my_nfts_or_listed_nfts(kind).await?;
    if json {
        return render::json(out, &items);
    }

    let (title, empty) = heading(kind);
    writeln!(out, "{title}")?;
    writeln!(out)?;
    render::cards(out, &items, ctx.nft_currency(), empty)
}
