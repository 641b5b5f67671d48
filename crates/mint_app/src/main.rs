mod cli;
mod pages;
mod session;

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use mint_core::{MarketError, MintConfig, logging};
use mint_market::FetchKind;
use tracing::{error, info};

use cli::{Command, WalletCommand};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefer the classified message when the failure came from the marketplace
/// layers; fall back to the full context chain otherwise.
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<MarketError>() {
        Some(market) => market.user_message(),
        None => format!("{err:#}"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let command = match cli::parse(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e.user_message(), cli::USAGE);
            return ExitCode::FAILURE;
        }
    };
    if command == Command::Help {
        println!("{}", cli::USAGE);
        return ExitCode::SUCCESS;
    }

    let config = match MintConfig::load().context("Failed to load config") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", describe(&e));
            return ExitCode::FAILURE;
        }
    };
    // Held until main returns so the exit error below is flushed to the file.
    let _log_guard = match logging::init_logging(&config.log_level) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", describe(&e));
            return ExitCode::FAILURE;
        }
    };

    match run(command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(target: logging::EXIT_TARGET, "{e:#}");
            eprintln!("{}", describe(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, mut config: MintConfig) -> Result<()> {
    info!("Starting mint v{VERSION}");
    config.validate().map_err(|e| MarketError::Config(e.to_string()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Help => {
            writeln!(out, "{}", cli::USAGE)?;
            Ok(())
        }
        Command::Config(sub) => pages::settings::run(&sub, &mut config, &mut out),
        Command::Wallet(sub) => run_wallet(sub, &mut config, &mut out),
        Command::Deploy { artifact } => {
            let wallets = session::load_wallets()?;
            let signer = session::unlock_signer(&wallets, &config)?;
            pages::deploy::run(&mut config, signer, &artifact, &mut out).await
        }
        Command::Connect { wallet } => {
            let wallets = session::load_wallets()?;
            let pw = session::password(&wallet)?;
            let signer = wallets.unlock(&wallet, &pw).map_err(MarketError::from)?;
            config.active_wallet = wallets.find(&wallet).map(|w| w.name.clone());
            config.save()?;
            writeln!(out, "Connected {}", signer.address())?;
            Ok(())
        }
        command => {
            let mut ctx = session::open_context(&config, session::load_wallets()?)?;
            if command.needs_signer() {
                session::unlock_context(&mut ctx, &config)?;
            }
            match command {
                Command::Account => pages::account::show(&ctx, &mut out).await,
                Command::Market { query, json } => {
                    pages::home::show(&ctx, &query, json, &mut out).await
                }
                Command::Details { token_id } => {
                    pages::nft_details::show(&ctx, token_id, &mut out).await
                }
                Command::Buy { token_id } => pages::nft_details::buy(&ctx, token_id, &mut out).await,
                Command::Create { form, file } => {
                    pages::create_nft::run(&ctx, &form, &file, &mut out).await
                }
                Command::Upload { file } => pages::create_nft::upload(&ctx, &file, &mut out).await,
                Command::Mine { json } => {
                    pages::my_nfts::show(&ctx, FetchKind::MyNfts, json, &mut out).await
                }
                Command::Listed { json } => {
                    pages::my_nfts::show(&ctx, FetchKind::ItemsListed, json, &mut out).await
                }
                Command::Resell { token_id, price } => {
                    pages::resell::run(&ctx, token_id, &price, &mut out).await
                }
                other => anyhow::bail!("`{other:?}` cannot run against the marketplace"),
            }
        }
    }
}

fn run_wallet(
    command: WalletCommand,
    config: &mut MintConfig,
    out: &mut impl Write,
) -> Result<()> {
    let mut wallets = session::load_wallets()?;
    match command {
        WalletCommand::List => {
            return pages::wallet::list(&wallets, config.active_wallet.as_deref(), out);
        }
        WalletCommand::New { name } => {
            let pw = session::password(&name)?;
            pages::wallet::new_wallet(&mut wallets, &name, &pw, out)?;
        }
        WalletCommand::Import { name, key } => {
            let pw = session::password(&name)?;
            pages::wallet::import_wallet(&mut wallets, &name, &key, &pw, out)?;
        }
        WalletCommand::Remove { name } => {
            pages::wallet::remove(&mut wallets, &name, out)?;
            if config.active_wallet.as_deref() == Some(name.as_str()) {
                config.active_wallet = None;
                config.save()?;
            }
        }
    }
    session::save_wallets(&wallets)
}
