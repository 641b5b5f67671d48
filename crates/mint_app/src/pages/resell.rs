use std::io::Write;

use anyhow::Result;
use mint_market::NftContext;

pub async fn run(ctx: &NftContext, token_id: u64, price: &str, out: &mut impl Write) -> Result<()> {
    let tx = ctx.resell_nft(token_id, price).await?;
    writeln!(
        out,
        "NFT #{token_id} listed for {} {} (tx {})",
        price.trim(),
        ctx.nft_currency(),
        tx.tx_hash
    )?;
    Ok(())
}
