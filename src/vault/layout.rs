//! On-disk layout of a vault directory.
//!
//! ```text
//! <vault_dir>/
//!   config.enc      48 bytes, plaintext: [salt: 16][verifier: 32]
//!   data.enc        one sealed frame holding the entry database (may be absent)
//!   files/<id>.enc  one sealed frame per file entry
//!   digisafe.toml   optional settings
//! ```
//!
//! The presence of `config.enc` is the only thing that distinguishes an
//! uninitialized vault from a locked one.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::crypto::keys::{PasswordVerifier, Salt, SALT_LEN, VERIFIER_LEN};
use crate::errors::{VaultError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const CONFIG_FILE: &str = "config.enc";
const DATA_FILE: &str = "data.enc";
const FILES_DIR: &str = "files";

/// Exact size of the Config record.
pub const CONFIG_LEN: usize = SALT_LEN + VERIFIER_LEN;

// ---------------------------------------------------------------------------
// VaultPaths
// ---------------------------------------------------------------------------

/// Resolved paths for every file the vault owns.
#[derive(Debug, Clone)]
pub struct VaultPaths {
    root: PathBuf,
}

impl VaultPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn data_file(&self) -> PathBuf {
        self.root.join(DATA_FILE)
    }

    pub fn files_dir(&self) -> PathBuf {
        self.root.join(FILES_DIR)
    }

    /// Create the vault directory and its sidecar directory.
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(self.files_dir())?;
        restrict_permissions(&self.root, 0o700);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ConfigRecord
// ---------------------------------------------------------------------------

/// The persisted `(Salt, PasswordVerifier)` pair.
#[derive(Debug, Clone)]
pub struct ConfigRecord {
    pub salt: Salt,
    pub verifier: PasswordVerifier,
}

impl ConfigRecord {
    pub fn to_bytes(&self) -> [u8; CONFIG_LEN] {
        let mut buf = [0u8; CONFIG_LEN];
        buf[..SALT_LEN].copy_from_slice(self.salt.as_bytes());
        buf[SALT_LEN..].copy_from_slice(self.verifier.as_bytes());
        buf
    }

    /// Parse a record. Anything other than exactly 48 bytes is rejected.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != CONFIG_LEN {
            return Err(VaultError::CorruptStore(format!(
                "config record must be {CONFIG_LEN} bytes, got {}",
                data.len()
            )));
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&data[..SALT_LEN]);
        let mut verifier = [0u8; VERIFIER_LEN];
        verifier.copy_from_slice(&data[SALT_LEN..]);

        Ok(Self {
            salt: Salt::from_bytes(salt),
            verifier: PasswordVerifier::from_bytes(verifier),
        })
    }

    /// Read the record if the config file exists.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read(path)?;
        Self::from_bytes(&data).map(Some)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.to_bytes())
    }
}

/// What an existing config file holds.
///
/// The file's presence alone decides whether a vault exists. A file that
/// does not parse still counts, so the vault can be reset.
#[derive(Debug, Clone)]
pub enum StoredConfig {
    Valid(ConfigRecord),
    Malformed(String),
}

impl StoredConfig {
    /// Read the config file, or `None` if there is none.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read(path)?;
        let stored = match ConfigRecord::from_bytes(&data) {
            Ok(record) => Self::Valid(record),
            Err(e) => Self::Malformed(e.to_string()),
        };
        Ok(Some(stored))
    }
}

// ---------------------------------------------------------------------------
// Atomic writes
// ---------------------------------------------------------------------------

/// Write `data` to `path` **atomically**.
///
/// 1. Write to a temp file in the same directory.
/// 2. fsync it so the bytes are durable.
/// 3. Rename it over the target path.
///
/// A crash at any point leaves either the old file or the new one, never
/// a truncated mix.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let result = (|| -> Result<()> {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);
        restrict_permissions(&tmp_path, 0o600);
        fs::rename(&tmp_path, path)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

/// On Unix, restrict permissions to owner-only. Best effort elsewhere.
fn restrict_permissions(path: &Path, mode: u32) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(mode));
    }

    #[cfg(not(unix))]
    let _ = (path, mode);
}
