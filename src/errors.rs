use thiserror::Error;

/// All errors that can occur in digisafe.
///
/// The first five variants are the vault's core taxonomy; the rest cover
/// configuration and the command-line surface.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Session errors ---
    #[error("Vault is locked — unlock it first")]
    NotUnlocked,

    #[error("No vault exists yet — run `digisafe init` first")]
    NotInitialized,

    #[error("A vault already exists in this directory")]
    AlreadyInitialized,

    // --- Crypto errors ---
    /// Wrong passphrase or failed tag verification. One message for both.
    #[error("Authentication failed — wrong password or tampered data")]
    AuthFailure,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // --- Store errors ---
    #[error("Vault data is corrupt: {0}")]
    CorruptStore(String),

    #[error("Entry '{0}' not found")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for digisafe results.
pub type Result<T> = std::result::Result<T, VaultError>;
