use std::io::Write;

use anyhow::Result;
use mint_market::NftContext;

pub async fn show(ctx: &NftContext, out: &mut impl Write) -> Result<()> {
    let Some(account) = ctx.current_account() else {
        writeln!(out, "No accounts found. Run `mint connect <wallet>`.")?;
        return Ok(());
    };
    let balance = ctx.account_balance().await?;
    writeln!(out, "Account  {account}")?;
    writeln!(out, "Balance  {balance} {}", ctx.nft_currency())?;
    Ok(())
}
