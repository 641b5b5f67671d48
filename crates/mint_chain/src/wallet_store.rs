use std::collections::HashMap;
use std::path::Path;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ChainError;

const AES_NONCE_LEN: usize = 12;
const SALT_LEN: usize = 16;

/// A stored wallet entry with encrypted private key material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletEntry {
    pub id: String,
    pub name: String,
    pub address: String,
    pub encrypted_key: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl WalletEntry {
    pub fn address(&self) -> Result<Address, ChainError> {
        self.address
            .parse()
            .map_err(|_| ChainError::InvalidAddress(self.address.clone()))
    }
}

/// Local keystore standing in for a browser wallet extension.
///
/// Wallets are indexed by their UUID and addressable by name. The store is
/// persisted as JSON; private keys only ever touch disk encrypted.
#[derive(Debug, Serialize, Deserialize)]
pub struct WalletStore {
    wallets: HashMap<String, WalletEntry>,
}

impl WalletStore {
    pub fn new() -> Self {
        Self {
            wallets: HashMap::new(),
        }
    }

    /// Generate a fresh key, encrypt it under `password`, and store it.
    /// Returns the new wallet's ID.
    pub fn create_wallet(&mut self, name: &str, password: &str) -> Result<String, ChainError> {
        let signer = loop {
            let bytes: [u8; 32] = rand::random();
            // Out-of-range scalars are astronomically rare; draw again.
            if let Ok(signer) = PrivateKeySigner::from_slice(&bytes) {
                break signer;
            }
        };
        self.insert_signer(name, &signer, password)
    }

    /// Import an existing hex-encoded private key (with or without `0x`).
    pub fn import_wallet(
        &mut self,
        name: &str,
        private_key_hex: &str,
        password: &str,
    ) -> Result<String, ChainError> {
        let signer: PrivateKeySigner = private_key_hex
            .trim()
            .parse()
            .map_err(|_| ChainError::Keystore("private key is not valid hex".into()))?;
        self.insert_signer(name, &signer, password)
    }

    fn insert_signer(
        &mut self,
        name: &str,
        signer: &PrivateKeySigner,
        password: &str,
    ) -> Result<String, ChainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChainError::Keystore("wallet name must not be empty".into()));
        }
        if self.wallets.values().any(|w| w.name == name) {
            return Err(ChainError::Keystore(format!("a wallet named `{name}` already exists")));
        }

        let encrypted_key = encrypt_key(signer.to_bytes().as_slice(), password)
            .map_err(|e| ChainError::Keystore(e.to_string()))?;
        let id = uuid::Uuid::new_v4().to_string();
        let entry = WalletEntry {
            id: id.clone(),
            name: name.to_string(),
            address: signer.address().to_string(),
            encrypted_key,
            created_at: Utc::now(),
        };
        info!(wallet_id = %id, address = %entry.address, "wallet added to store");
        self.wallets.insert(id.clone(), entry);
        Ok(id)
    }

    /// Look a wallet up by ID or by name.
    pub fn find(&self, id_or_name: &str) -> Option<&WalletEntry> {
        self.wallets
            .get(id_or_name)
            .or_else(|| self.wallets.values().find(|w| w.name == id_or_name))
    }

    /// Decrypt a wallet's key into a signer.
    pub fn unlock(&self, id_or_name: &str, password: &str) -> Result<PrivateKeySigner, ChainError> {
        let entry = self
            .find(id_or_name)
            .ok_or_else(|| ChainError::Keystore(format!("no wallet named `{id_or_name}`")))?;
        let key = decrypt_key(&entry.encrypted_key, password)
            .map_err(|_| ChainError::Keystore("wrong password or corrupted key".into()))?;
        let signer = PrivateKeySigner::from_slice(&key)
            .map_err(|e| ChainError::Keystore(format!("stored key is invalid: {e}")))?;
        debug!(wallet_id = %entry.id, "wallet unlocked");
        Ok(signer)
    }

    /// Remove a wallet by ID or name. Returns the removed entry if it existed.
    pub fn remove_wallet(&mut self, id_or_name: &str) -> Option<WalletEntry> {
        let id = self.find(id_or_name)?.id.clone();
        let removed = self.wallets.remove(&id);
        if removed.is_some() {
            info!(wallet_id = %id, "wallet removed from store");
        }
        removed
    }

    /// List all wallets, oldest first.
    pub fn list_wallets(&self) -> Vec<&WalletEntry> {
        let mut wallets: Vec<_> = self.wallets.values().collect();
        wallets.sort_by_key(|w| w.created_at);
        wallets
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// Persist the wallet store to a JSON file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("failed to serialize wallet store")?;
        std::fs::write(path, json).context("failed to write wallet store file")?;

        // Owner-only on Unix (0o600 = rw-------).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .context("failed to set wallet store file permissions")?;
        }

        info!(path = %path.display(), count = self.wallets.len(), "wallet store saved");
        Ok(())
    }

    /// Load a wallet store from a JSON file. Returns an empty store if the file
    /// does not exist.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "wallet store file not found, starting empty");
            return Ok(Self::new());
        }
        let json = std::fs::read_to_string(path).context("failed to read wallet store file")?;
        let store: Self =
            serde_json::from_str(&json).context("failed to deserialize wallet store")?;
        info!(path = %path.display(), count = store.wallets.len(), "wallet store loaded");
        Ok(store)
    }
}

impl Default for WalletStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Encryption helpers
// ---------------------------------------------------------------------------

/// Derive a 256-bit AES key from a password and salt using Argon2id
/// (m=19456 KiB, t=2, p=1).
fn derive_key_from_password(password: &str, salt: &[u8]) -> Result<[u8; 32]> {
    use argon2::{Algorithm, Argon2, Params, Version};

    let params = Params::new(19_456, 2, 1, Some(32))
        .map_err(|e| anyhow::anyhow!("invalid argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let mut key = [0u8; 32];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| anyhow::anyhow!("key derivation failed: {e}"))?;
    Ok(key)
}

/// Encrypt `plaintext` using AES-256-GCM with a key derived from `password`.
///
/// Layout: `salt (16) || nonce (12) || ciphertext+tag`.
pub fn encrypt_key(plaintext: &[u8], password: &str) -> Result<Vec<u8>> {
    let salt: [u8; SALT_LEN] = rand::random();
    let key_bytes = derive_key_from_password(password, &salt)?;
    let key = Key::<Aes256Gcm>::from_slice(&key_bytes);
    let cipher = Aes256Gcm::new(key);

    let nonce_bytes: [u8; AES_NONCE_LEN] = rand::random();
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| anyhow::anyhow!("encryption failed: {e}"))?;

    let mut result = Vec::with_capacity(SALT_LEN + AES_NONCE_LEN + ciphertext.len());
    result.extend_from_slice(&salt);
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

/// Decrypt data produced by [`encrypt_key`].
pub fn decrypt_key(ciphertext: &[u8], password: &str) -> Result<Vec<u8>> {
    if ciphertext.len() < SALT_LEN + AES_NONCE_LEN {
        anyhow::bail!(
            "ciphertext too short (expected at least {} bytes for salt and nonce)",
            SALT_LEN + AES_NONCE_LEN
        );
    }

    let (salt, rest) = ciphertext.split_at(SALT_LEN);
    let (nonce_bytes, encrypted) = rest.split_at(AES_NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let key_bytes = derive_key_from_password(password, salt)?;
    let key = Key::<Aes256Gcm>::from_slice(&key_bytes);
    let cipher = Aes256Gcm::new(key);

    cipher
        .decrypt(nonce, encrypted)
        .map_err(|e| anyhow::anyhow!("decryption failed: {e}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
