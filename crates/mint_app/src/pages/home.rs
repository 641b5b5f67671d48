use std::io::Write;

use anyhow::Result;
use mint_market::{ListingQuery, NftContext};
use tracing::debug;

use super::render;

const BANNER: &str = "Discover, collect, and sell extraordinary NFTs";

pub async fn show(
    ctx: &NftContext,
    query: &ListingQuery,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let items = ctx.fetch_nfts().await?;
    let total = items.len();
    let items = query.apply(items);
    debug!(total, shown = items.len(), sort = ?query.sort, "market listing");

    if json {
        return render::json(out, &items);
    }

    writeln!(out, "{BANNER}")?;
    writeln!(out)?;
    let empty = if total == 0 {
        "No NFTs listed for sale."
    } else {
        "No NFTs match your search."
    };
    render::cards(out, &items, ctx.nft_currency(), empty)
}
