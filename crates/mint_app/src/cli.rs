use std::path::PathBuf;

use mint_core::MarketError;
use mint_market::{ListingQuery, NftForm};

pub const USAGE: &str = "\
Usage: mint <command> [args]

Wallet:
  connect <wallet>                 unlock a keystore wallet and remember it
  account                          show the connected account and balance
  wallet new <name>                generate a new key
  wallet import <name> <hex-key>   import an existing private key
  wallet list                      list keystore wallets
  wallet remove <name>             delete a wallet from the keystore

Marketplace:
  market [--search <text>] [--sort recent|price-low|price-high] [--json]
  details <token-id>               show one NFT
  buy <token-id>                   buy a listed NFT at its asking price
  create --name <n> --description <d> --price <eth> --file <path>
  upload <path>                    upload a file and print its URL
  mine [--json]                    NFTs owned by the connected account
  listed [--json]                  NFTs the connected account has listed
  resell <token-id> <price>        list an owned NFT again

Setup:
  deploy <artifact.json>           deploy the marketplace contract
  config show
  config set-network <hardhat|sepolia|ethereum>
  config set-rpc <url>
  config set-market <address>

Environment:
  MINT_HOME                  base directory (default ~/.mint)
  MINT_WALLET_PASSWORD       wallet password (prompted when unset)
  MINT_IPFS_PROJECT_ID       pinning service project id
  MINT_IPFS_PROJECT_SECRET   pinning service project secret
  MINT_IPFS_GATEWAY          gateway used to build content URLs";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Connect { wallet: String },
    Account,
    Wallet(WalletCommand),
    Market { query: ListingQuery, json: bool },
    Details { token_id: u64 },
    Buy { token_id: u64 },
    Create { form: NftForm, file: PathBuf },
    Upload { file: PathBuf },
    Mine { json: bool },
    Listed { json: bool },
    Resell { token_id: u64, price: String },
    Deploy { artifact: PathBuf },
    Config(ConfigCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletCommand {
    New { name: String },
    Import { name: String, key: String },
    List,
    Remove { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    Show,
    SetNetwork(String),
    SetRpc(String),
    SetMarket(String),
}

impl Command {
    /// Whether the command sends a transaction and so needs an unlocked wallet.
    pub fn needs_signer(&self) -> bool {
        matches!(
            self,
            Command::Buy { .. }
                | Command::Create { .. }
                | Command::Resell { .. }
                | Command::Deploy { .. }
        )
    }
}

fn usage_error(msg: impl Into<String>) -> MarketError {
    MarketError::InvalidInput(msg.into())
}

fn token_id(raw: Option<String>) -> Result<u64, MarketError> {
    let raw = raw.ok_or_else(|| usage_error("missing token id"))?;
    raw.parse()
        .map_err(|_| usage_error(format!("`{raw}` is not a token id")))
}

fn required(raw: Option<String>, what: &str) -> Result<String, MarketError> {
    raw.ok_or_else(|| usage_error(format!("missing {what}")))
}

/// Parse the arguments following the program name.
pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Command, MarketError> {
    let mut args = args.into_iter();
    let Some(command) = args.next() else {
        return Ok(Command::Help);
    };

    let command = match command.as_str() {
        "help" | "-h" | "--help" => Command::Help,
        "connect" => Command::Connect {
            wallet: required(args.next(), "wallet name")?,
        },
        "account" => Command::Account,
        "wallet" => Command::Wallet(parse_wallet(&mut args)?),
        "market" | "home" => {
            let mut query = ListingQuery::default();
            let mut json = false;
            while let Some(flag) = args.next() {
                match flag.as_str() {
                    "--search" => query.search = Some(required(args.next(), "search text")?),
                    "--sort" => query.sort = required(args.next(), "sort order")?.parse()?,
                    "--json" => json = true,
                    other => return Err(usage_error(format!("unknown flag `{other}`"))),
                }
            }
            Command::Market { query, json }
        }
        "details" => Command::Details {
            token_id: token_id(args.next())?,
        },
        "buy" => Command::Buy {
            token_id: token_id(args.next())?,
        },
        "create" => {
            let mut form = NftForm::default();
            let mut file = None;
            while let Some(flag) = args.next() {
                match flag.as_str() {
                    "--name" => form.name = required(args.next(), "name")?,
                    "--description" => form.description = required(args.next(), "description")?,
                    "--price" => form.price = required(args.next(), "price")?,
                    "--file" => file = Some(PathBuf::from(required(args.next(), "file")?)),
                    other => return Err(usage_error(format!("unknown flag `{other}`"))),
                }
            }
            Command::Create {
                form,
                file: file.ok_or(MarketError::IncompleteForm("file"))?,
            }
        }
        "upload" => Command::Upload {
            file: PathBuf::from(required(args.next(), "file path")?),
        },
        "mine" | "listed" => {
            let json = match args.next().as_deref() {
                None => false,
                Some("--json") => true,
                Some(other) => return Err(usage_error(format!("unknown flag `{other}`"))),
            };
            if command == "mine" {
                Command::Mine { json }
            } else {
                Command::Listed { json }
            }
        }
        "resell" => Command::Resell {
            token_id: token_id(args.next())?,
            price: required(args.next(), "price")?,
        },
        "deploy" => Command::Deploy {
            artifact: PathBuf::from(required(args.next(), "artifact path")?),
        },
        "config" => Command::Config(parse_config(&mut args)?),
        other => return Err(usage_error(format!("unknown command `{other}`"))),
    };

    if let Some(extra) = args.next() {
        return Err(usage_error(format!("unexpected argument `{extra}`")));
    }
    Ok(command)
}

fn parse_wallet(args: &mut impl Iterator<Item = String>) -> Result<WalletCommand, MarketError> {
    let sub = required(args.next(), "wallet subcommand")?;
    Ok(match sub.as_str() {
        "new" => WalletCommand::New {
            name: required(args.next(), "wallet name")?,
        },
        "import" => WalletCommand::Import {
            name: required(args.next(), "wallet name")?,
            key: required(args.next(), "private key")?,
        },
        "list" => WalletCommand::List,
        "remove" => WalletCommand::Remove {
            name: required(args.next(), "wallet name")?,
        },
        other => return Err(usage_error(format!("unknown wallet subcommand `{other}`"))),
    })
}

fn parse_config(args: &mut impl Iterator<Item = String>) -> Result<ConfigCommand, MarketError> {
    let sub = args.next().unwrap_or_else(|| "show".into());
    Ok(match sub.as_str() {
        "show" => ConfigCommand::Show,
        "set-network" => ConfigCommand::SetNetwork(required(args.next(), "network")?),
        "set-rpc" => ConfigCommand::SetRpc(required(args.next(), "RPC URL")?),
        "set-market" => ConfigCommand::SetMarket(required(args.next(), "contract address")?),
        other => return Err(usage_error(format!("unknown config subcommand `{other}`"))),
    })
}
