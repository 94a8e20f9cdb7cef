//! The vault session: unlock state machine and caller-facing operations.
//!
//! ```text
//!   Uninitialized --enroll--> Unlocked <--authenticate-- Locked
//!                                 |                        ^
//!                                 +--------- lock ---------+
//!   Locked | Unlocked --reset--> Uninitialized
//! ```
//!
//! A `VaultSession` is an ordinary value owned by whoever drives the
//! application. The encryption key and the decrypted entry map exist only
//! inside the `Unlocked` state and are wiped when it is left.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::entry::{Entry, EntrySummary, FileEntry, PasswordEntry, VaultSummary};
use super::files::FileVault;
use super::layout::{ConfigRecord, StoredConfig, VaultPaths};
use super::store::{EntryStore, LoadOutcome};
use crate::crypto::kdf::{self, KdfParams};
use crate::crypto::keys::EncryptionKey;
use crate::errors::{VaultError, Result};

/// Externally visible session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    /// No config file on disk.
    Uninitialized,
    /// Config exists, no key in memory.
    Locked,
    /// Key in memory, entry database loaded.
    Unlocked,
}

/// Key and database, alive only while unlocked.
struct UnlockedVault {
    key: EncryptionKey,
    store: EntryStore,
}

/// One vault directory and its unlock state.
pub struct VaultSession {
    paths: VaultPaths,
    params: KdfParams,
    config: Option<StoredConfig>,
    unlocked: Option<UnlockedVault>,
    files: FileVault,
}

impl VaultSession {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open the vault directory at `root`.
    ///
    /// The session starts `Locked` when a config file exists, even one
    /// that does not parse, and `Uninitialized` otherwise. Nothing is
    /// created on disk until `enroll`.
    pub fn open(root: impl Into<PathBuf>, params: KdfParams) -> Result<Self> {
        params.validate()?;
        let paths = VaultPaths::new(root);
        let config = StoredConfig::read(&paths.config_file())?;
        let files = FileVault::new(&paths.files_dir());

        debug!(
            root = %paths.root().display(),
            initialized = config.is_some(),
            "vault session opened"
        );

        Ok(Self {
            paths,
            params,
            config,
            unlocked: None,
            files,
        })
    }

    pub fn state(&self) -> VaultState {
        match (&self.config, &self.unlocked) {
            (None, _) => VaultState::Uninitialized,
            (Some(_), None) => VaultState::Locked,
            (Some(_), Some(_)) => VaultState::Unlocked,
        }
    }

    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Create a new vault protected by `passphrase` and unlock it.
    ///
    /// Only valid from `Uninitialized`. Any data or sidecar files left
    /// over from an earlier vault in the same directory are discarded,
    /// since they could never be opened with the new key.
    pub fn enroll(&mut self, passphrase: &str) -> Result<()> {
        if self.config.is_some() {
            return Err(VaultError::AlreadyInitialized);
        }
        require_passphrase(passphrase)?;

        self.purge_contents()?;
        self.paths.ensure_dirs()?;

        let enrollment = kdf::enroll(passphrase.as_bytes(), &self.params)?;
        let record = ConfigRecord {
            salt: enrollment.salt,
            verifier: enrollment.verifier,
        };
        record.save(&self.paths.config_file())?;

        self.config = Some(StoredConfig::Valid(record));
        self.unlocked = Some(UnlockedVault {
            key: enrollment.key,
            store: EntryStore::empty(&self.paths.data_file()),
        });

        info!("vault enrolled and unlocked");
        Ok(())
    }

    /// Unlock with `passphrase`.
    ///
    /// A wrong passphrase is `AuthFailure` and the session stays as it
    /// was. So is an unreadable config record, or no vault at all. On
    /// success the entry database is loaded; if it cannot be opened the
    /// session still unlocks with an empty database and the returned
    /// `LoadOutcome::Corrupt` carries the error.
    pub fn authenticate(&mut self, passphrase: &str) -> Result<LoadOutcome> {
        require_passphrase(passphrase)?;

        let config = match &self.config {
            Some(StoredConfig::Valid(record)) => record,
            Some(StoredConfig::Malformed(reason)) => {
                warn!(%reason, "config record is unreadable");
                return Err(VaultError::AuthFailure);
            }
            None => {
                warn!("authentication attempted with no vault present");
                return Err(VaultError::AuthFailure);
            }
        };

        let key = match kdf::authenticate(
            passphrase.as_bytes(),
            &config.salt,
            &config.verifier,
            &self.params,
        ) {
            Ok(key) => key,
            Err(e) => {
                warn!("authentication failed");
                return Err(e);
            }
        };

        let (store, outcome) = EntryStore::load(&self.paths.data_file(), &key)?;
        self.unlocked = Some(UnlockedVault { key, store });

        info!(corrupt = outcome.is_corrupt(), "vault unlocked");
        Ok(outcome)
    }

    /// Drop the key and the decrypted database.
    pub fn lock(&mut self) {
        if self.unlocked.take().is_some() {
            info!("vault locked");
        }
    }

    /// Delete every file the vault owns and return to `Uninitialized`.
    ///
    /// Irreversible. Asking the user for confirmation is the caller's job.
    pub fn reset(&mut self) -> Result<()> {
        self.lock();
        self.purge_contents()?;
        self.config = None;
        info!("vault reset");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Entry operations (all require Unlocked)
    // ------------------------------------------------------------------

    /// Summaries of every entry, sorted by name.
    pub fn list_entries(&self) -> Result<Vec<EntrySummary>> {
        Ok(self.unlocked()?.store.summaries())
    }

    /// Entries whose name or username/filename contains `query`.
    pub fn search(&self, query: &str) -> Result<Vec<EntrySummary>> {
        Ok(self.unlocked()?.store.search(query))
    }

    /// Counts of password and file entries.
    pub fn summary(&self) -> Result<VaultSummary> {
        Ok(self.unlocked()?.store.summary())
    }

    pub fn get_entry(&self, name: &str) -> Result<&Entry> {
        self.unlocked()?.store.get(name)
    }

    /// Store a credential under `name`, replacing whatever was there.
    pub fn put_password(
        &mut self,
        name: &str,
        username: &str,
        secret: &str,
        notes: &str,
    ) -> Result<()> {
        let vault = self.unlocked.as_mut().ok_or(VaultError::NotUnlocked)?;

        let replaced_sidecar = vault
            .store
            .get(name)
            .ok()
            .and_then(Entry::as_file)
            .map(|f| f.sidecar_path.clone());

        let entry = Entry::Password(PasswordEntry {
            username: username.to_string(),
            secret: secret.to_string(),
            notes: notes.to_string(),
        });
        vault.store.put(&vault.key, name, entry)?;

        if let Some(old) = replaced_sidecar {
            self.files.discard_sidecar(&old);
        }
        Ok(())
    }

    /// Read the file at `source` and store it under `name`.
    pub fn put_file(&mut self, name: &str, source: &Path, notes: &str) -> Result<FileEntry> {
        // Fail before reading the file if the session is locked.
        self.unlocked()?;

        let bytes = Zeroizing::new(fs::read(source)?);
        let filename = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.put_file_bytes(name, &filename, &bytes, notes)
    }

    /// Store in-memory `bytes` as a file entry named `name`.
    pub fn put_file_bytes(
        &mut self,
        name: &str,
        original_filename: &str,
        bytes: &[u8],
        notes: &str,
    ) -> Result<FileEntry> {
        let vault = self.unlocked.as_mut().ok_or(VaultError::NotUnlocked)?;
        self.files.store(
            &vault.key,
            &mut vault.store,
            name,
            original_filename,
            bytes,
            notes,
        )
    }

    /// Decrypt the file stored under `name`.
    pub fn retrieve_file(&self, name: &str) -> Result<Zeroizing<Vec<u8>>> {
        let vault = self.unlocked()?;
        self.files.retrieve(&vault.key, &vault.store, name)
    }

    /// Decrypt the file stored under `name` and write it to `destination`.
    ///
    /// If `destination` is an existing directory, the file is written
    /// inside it under its original filename. Returns the written path.
    pub fn export_file(&self, name: &str, destination: &Path) -> Result<PathBuf> {
        let bytes = self.retrieve_file(name)?;

        let target = if destination.is_dir() {
            let original = self
                .get_entry(name)?
                .as_file()
                .map(|f| f.original_filename.clone())
                .ok_or_else(|| VaultError::NotFound(name.to_string()))?;
            destination.join(original)
        } else {
            destination.to_path_buf()
        };

        fs::write(&target, bytes.as_slice())?;
        debug!(entry = name, "file exported");
        Ok(target)
    }

    /// Remove `name`, including its sidecar for file entries.
    pub fn delete_entry(&mut self, name: &str) -> Result<Entry> {
        let vault = self.unlocked.as_mut().ok_or(VaultError::NotUnlocked)?;
        self.files.remove(&vault.key, &mut vault.store, name)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn unlocked(&self) -> Result<&UnlockedVault> {
        self.unlocked.as_ref().ok_or(VaultError::NotUnlocked)
    }

    /// Remove config, data file, and all sidecars. Leaves settings alone.
    fn purge_contents(&self) -> Result<()> {
        remove_if_exists(&self.paths.config_file())?;
        remove_if_exists(&self.paths.data_file())?;

        match fs::remove_dir_all(self.paths.files_dir()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for VaultSession {
    fn drop(&mut self) {
        self.lock();
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn require_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.is_empty() {
        return Err(VaultError::InvalidInput("passphrase cannot be empty".into()));
    }
    Ok(())
}
