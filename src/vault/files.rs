//! Encrypted file storage.
//!
//! Each stored file becomes one sidecar frame under `files/`, named by a
//! random UUID so no user-supplied text ever reaches the filesystem. The
//! sidecar's own file name is bound into the frame as associated data,
//! so swapping two sidecars on disk makes both fail authentication.
//!
//! File bytes are sealed as-is; there is no intermediate text encoding.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::entry::{Entry, FileEntry};
use super::layout::write_atomic;
use super::store::EntryStore;
use crate::crypto::aead::{open_with_aad, seal_with_aad};
use crate::crypto::keys::EncryptionKey;
use crate::errors::{VaultError, Result};

/// Extension of every sidecar file.
const SIDECAR_EXT: &str = "enc";

/// Sidecar manager for one vault's `files/` directory.
#[derive(Debug, Clone)]
pub struct FileVault {
    files_dir: PathBuf,
}

impl FileVault {
    pub fn new(files_dir: &Path) -> Self {
        Self {
            files_dir: files_dir.to_path_buf(),
        }
    }

    pub fn files_dir(&self) -> &Path {
        &self.files_dir
    }

    /// Seal `bytes` into a new sidecar and register it under `name`.
    ///
    /// If registering the entry fails, the freshly written sidecar is
    /// removed again. If `name` previously held a file, that file's old
    /// sidecar is removed once the new entry is persisted.
    pub fn store(
        &self,
        key: &EncryptionKey,
        store: &mut EntryStore,
        name: &str,
        original_filename: &str,
        bytes: &[u8],
        notes: &str,
    ) -> Result<FileEntry> {
        let replaced_sidecar = store
            .get(name)
            .ok()
            .and_then(Entry::as_file)
            .map(|f| f.sidecar_path.clone());

        fs::create_dir_all(&self.files_dir)?;

        let sidecar_name = format!("{}.{SIDECAR_EXT}", Uuid::new_v4());
        let sidecar_path = self.files_dir.join(&sidecar_name);

        let frame = seal_with_aad(key, bytes, sidecar_name.as_bytes())?;
        write_atomic(&sidecar_path, &frame)?;

        let entry = FileEntry {
            original_filename: display_name(original_filename),
            sidecar_path: sidecar_path.to_string_lossy().into_owned(),
            size: bytes.len() as u64,
            notes: notes.to_string(),
        };

        if let Err(e) = store.put(key, name, Entry::File(entry.clone())) {
            if let Err(cleanup) = fs::remove_file(&sidecar_path) {
                warn!("could not remove orphaned sidecar {}: {cleanup}", sidecar_path.display());
            }
            return Err(e);
        }

        if let Some(old) = replaced_sidecar {
            self.discard_sidecar(&old);
        }

        debug!(entry = name, size = entry.size, "file stored");
        Ok(entry)
    }

    /// Decrypt and return the bytes of the file stored under `name`.
    ///
    /// `NotFound` if there is no such entry or it is not a file.
    pub fn retrieve(
        &self,
        key: &EncryptionKey,
        store: &EntryStore,
        name: &str,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let entry = store
            .get(name)?
            .as_file()
            .ok_or_else(|| VaultError::NotFound(name.to_string()))?;

        let (path, sidecar_name) = self.resolve(&entry.sidecar_path)?;
        let frame = fs::read(&path)?;
        let plaintext = open_with_aad(key, &frame, sidecar_name.as_bytes())?;

        debug!(entry = name, size = plaintext.len(), "file retrieved");
        Ok(Zeroizing::new(plaintext))
    }

    /// Delete the sidecar (if any) and then the entry itself.
    ///
    /// A missing or undeletable sidecar is logged, not fatal.
    pub fn remove(&self, key: &EncryptionKey, store: &mut EntryStore, name: &str) -> Result<Entry> {
        if let Some(file) = store.get(name)?.as_file() {
            let sidecar = file.sidecar_path.clone();
            self.discard_sidecar(&sidecar);
        }
        store.delete(key, name)
    }

    /// Best-effort removal of a sidecar recorded in an entry.
    pub(crate) fn discard_sidecar(&self, recorded: &str) {
        let path = match self.resolve(recorded) {
            Ok((path, _)) => path,
            Err(e) => {
                warn!("skipping sidecar removal: {e}");
                return;
            }
        };

        match fs::remove_file(&path) {
            Ok(()) => debug!("removed sidecar {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("sidecar {} was already missing", path.display());
            }
            Err(e) => warn!("could not remove sidecar {}: {e}", path.display()),
        }
    }

    /// Map a recorded sidecar path to its location in this vault.
    ///
    /// Only the final path component is trusted, so a vault directory
    /// that has been moved still finds its sidecars, and a recorded path
    /// can never point outside `files/`.
    fn resolve(&self, recorded: &str) -> Result<(PathBuf, String)> {
        let file_name = Path::new(recorded)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                VaultError::CorruptStore(format!("invalid sidecar path '{recorded}'"))
            })?;
        Ok((self.files_dir.join(file_name), file_name.to_string()))
    }
}

/// Reduce a user-supplied filename to its final component.
fn display_name(original: &str) -> String {
    Path::new(original)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "file".to_string())
}
