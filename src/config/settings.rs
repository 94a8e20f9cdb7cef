use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::KdfParams;
use crate::errors::{Result, VaultError};

/// Name of the directory under `$HOME` that holds the vault by default.
const DEFAULT_DIR_NAME: &str = ".digital_safe";

/// Vault-level configuration, loaded from `<vault_dir>/digisafe.toml`.
///
/// Every field has a sensible default so digisafe works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// scrypt cost exponent, N = 2^log_n (default: 14).
    #[serde(default = "default_scrypt_log_n")]
    pub scrypt_log_n: u8,

    /// scrypt block size (default: 8).
    #[serde(default = "default_scrypt_r")]
    pub scrypt_r: u32,

    /// scrypt parallelism (default: 1).
    #[serde(default = "default_scrypt_p")]
    pub scrypt_p: u32,

    /// PBKDF2-HMAC-SHA256 iteration count (default: 100 000).
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    /// Length of generated passwords (default: 16).
    #[serde(default = "default_password_length")]
    pub password_length: usize,

    /// Whether generated passwords include symbols (default: true).
    #[serde(default = "default_password_symbols")]
    pub password_symbols: bool,

    /// Seconds before a copied password is cleared from the clipboard
    /// (default: 30, 0 = never).
    #[serde(default = "default_clipboard_clear_secs")]
    pub clipboard_clear_secs: u64,

    /// Log filter used when `DIGISAFE_LOG` is unset (e.g. "info").
    #[serde(default)]
    pub log_level: Option<String>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_scrypt_log_n() -> u8 {
    14 // N = 16 384
}

fn default_scrypt_r() -> u32 {
    8
}

fn default_scrypt_p() -> u32 {
    1
}

fn default_pbkdf2_iterations() -> u32 {
    100_000
}

fn default_password_length() -> usize {
    16
}

fn default_password_symbols() -> bool {
    true
}

fn default_clipboard_clear_secs() -> u64 {
    30
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            scrypt_log_n: default_scrypt_log_n(),
            scrypt_r: default_scrypt_r(),
            scrypt_p: default_scrypt_p(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            password_length: default_password_length(),
            password_symbols: default_password_symbols(),
            clipboard_clear_secs: default_clipboard_clear_secs(),
            log_level: None,
        }
    }
}

impl Settings {
    /// Name of the settings file inside the vault directory.
    pub const FILE_NAME: &'static str = "digisafe.toml";

    /// Load settings from `<vault_dir>/digisafe.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(vault_dir: &Path) -> Result<Self> {
        let config_path = vault_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Convert the KDF settings into crypto-layer params, rejecting
    /// values below the enforced minimums.
    pub fn kdf_params(&self) -> Result<KdfParams> {
        let params = KdfParams {
            scrypt_log_n: self.scrypt_log_n,
            scrypt_r: self.scrypt_r,
            scrypt_p: self.scrypt_p,
            pbkdf2_iterations: self.pbkdf2_iterations,
        };
        params.validate()?;
        Ok(params)
    }
}

/// `~/.digital_safe`, or `./.digital_safe` when no home directory is known.
pub fn default_vault_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

// ── Tests ────────────────────────────────────────────────────────────
