use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variables holding pinning-service credentials. These are never
/// persisted to `config.json`.
pub const ENV_IPFS_PROJECT_ID: &str = "MINT_IPFS_PROJECT_ID";
pub const ENV_IPFS_PROJECT_SECRET: &str = "MINT_IPFS_PROJECT_SECRET";
/// Optional override for the dedicated gateway used to build content URLs.
pub const ENV_IPFS_GATEWAY: &str = "MINT_IPFS_GATEWAY";
/// Overrides the base directory (`~/.mint/`).
pub const ENV_MINT_HOME: &str = "MINT_HOME";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// MintConfig
// ---------------------------------------------------------------------------

/// Application configuration stored at `~/.mint/config.json`.
///
/// Pinning-service credentials are **never** written to the JSON file. They
/// are read from the environment by [`MintConfig::apply_env`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MintConfig {
    #[serde(skip)]
    pub ipfs_project_id: Option<String>,
    #[serde(skip)]
    pub ipfs_project_secret: Option<String>,

    // Chain
    pub network: String,
    pub rpc_url: Option<String>,
    pub market_address: Option<String>,

    // Content storage
    pub ipfs_api_url: String,
    pub ipfs_gateway_url: String,

    // Wallet
    pub active_wallet: Option<String>,

    // General
    pub currency: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            ipfs_project_id: None,
            ipfs_project_secret: None,
            network: "hardhat".into(),
            rpc_url: None,
            market_address: None,
            ipfs_api_url: "https://ipfs.infura.io:5001".into(),
            ipfs_gateway_url: "https://ipfs.io".into(),
            active_wallet: None,
            currency: "ETH".into(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: "info".into(),
        }
    }
}

impl MintConfig {
    /// Returns the base config directory: `~/.mint/` (or `$MINT_HOME`).
    pub fn base_dir() -> Result<PathBuf> {
        if let Ok(home) = std::env::var(ENV_MINT_HOME)
            && !home.is_empty()
        {
            return Ok(PathBuf::from(home));
        }
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".mint"))
    }

    /// Returns the config file path: `~/.mint/config.json`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    /// Returns the logs directory: `~/.mint/logs/`
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("logs"))
    }

    /// Returns the wallet keystore path: `~/.mint/wallets.json`
    pub fn wallets_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("wallets.json"))
    }

    /// Ensures all required directories exist.
    pub fn ensure_dirs() -> Result<()> {
        for dir in [Self::base_dir()?, Self::logs_dir()?] {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            }
        }
        Ok(())
    }

    /// Loads config from disk (creating a default file if missing) and layers
    /// environment credentials on top.
    pub fn load() -> Result<Self> {
        Self::ensure_dirs()?;
        let path = Self::config_path()?;
        let mut config = Self::load_from_path(&path)?;
        config.apply_env();
        Ok(config)
    }

    /// Load config from a specific file path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Self = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to_path(path)?;
            info!("Created default config at {}", path.display());
            Ok(config)
        }
    }

    /// Saves config to disk (credentials are excluded via `#[serde(skip)]`).
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to_path(&path)
    }

    /// Save config to a specific file path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Populate credentials and overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Same as [`apply_env`](Self::apply_env) with an injectable lookup.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(id) = non_empty(ENV_IPFS_PROJECT_ID) {
            self.ipfs_project_id = Some(id);
        }
        if let Some(secret) = non_empty(ENV_IPFS_PROJECT_SECRET) {
            self.ipfs_project_secret = Some(secret);
        }
        if let Some(gateway) = non_empty(ENV_IPFS_GATEWAY) {
            self.ipfs_gateway_url = gateway;
        }
    }

    /// Check the URL-shaped fields before any network client is built.
    pub fn validate(&self) -> Result<()> {
        if let Some(rpc) = &self.rpc_url
            && !validate_url(rpc)
        {
            anyhow::bail!("invalid RPC URL: {rpc}");
        }
        if !validate_url(&self.ipfs_api_url) {
            anyhow::bail!("invalid IPFS API URL: {}", self.ipfs_api_url);
        }
        if !validate_url(&self.ipfs_gateway_url) {
            anyhow::bail!("invalid IPFS gateway URL: {}", self.ipfs_gateway_url);
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

/// Validate that a URL is well-formed and uses HTTP or HTTPS.
pub fn validate_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            (scheme == "http" || scheme == "https") && parsed.host().is_some()
        }
        Err(_) => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
