//! The entry database and its persistence.
//!
//! `EntryStore` keeps every entry in memory and writes the whole map to
//! `data.enc` after each mutation. The map is the single unit of at-rest
//! encryption: serialized to JSON, sealed as one frame, and replaced
//! atomically. There is no per-entry encryption and no deferred flush.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::entry::{Entry, EntrySummary, VaultSummary};
use super::layout::write_atomic;
use crate::crypto::aead::{open, seal};
use crate::crypto::keys::EncryptionKey;
use crate::errors::{VaultError, Result};

/// Longest accepted entry name, in bytes.
const MAX_NAME_LEN: usize = 256;

/// What happened when the database was loaded on unlock.
#[derive(Debug)]
#[must_use]
pub enum LoadOutcome {
    /// No data file (or an empty one): a fresh, empty database.
    Fresh,
    /// The data file opened and decoded; holds this many entries.
    Loaded(usize),
    /// The data file exists but could not be opened or decoded. The
    /// database starts empty; the error is handed back for reporting.
    Corrupt(VaultError),
}

impl LoadOutcome {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, LoadOutcome::Corrupt(_))
    }
}

/// In-memory map of name -> entry, bound to one data file.
pub struct EntryStore {
    /// Path to `data.enc`.
    data_path: PathBuf,

    /// Entries sorted by name so the serialized form is deterministic.
    entries: BTreeMap<String, Entry>,
}

impl EntryStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// An empty store that will persist to `data_path`.
    pub fn empty(data_path: &Path) -> Self {
        Self {
            data_path: data_path.to_path_buf(),
            entries: BTreeMap::new(),
        }
    }

    /// Load the database from `data_path` with `key`.
    ///
    /// A missing or empty file is a fresh database. A file that fails
    /// authentication or does not decode to an entry map is reported as
    /// `LoadOutcome::Corrupt`, and the store starts empty. Only I/O
    /// errors while reading are returned as `Err`.
    pub fn load(data_path: &Path, key: &EncryptionKey) -> Result<(Self, LoadOutcome)> {
        let mut store = Self::empty(data_path);

        if !data_path.exists() {
            debug!("no data file, starting with an empty database");
            return Ok((store, LoadOutcome::Fresh));
        }

        let frame = fs::read(data_path)?;
        if frame.is_empty() {
            debug!("data file is empty, starting with an empty database");
            return Ok((store, LoadOutcome::Fresh));
        }

        let outcome = match open(key, &frame)
            .map(Zeroizing::new)
            .and_then(|plain| decode(&plain))
        {
            Ok(entries) => {
                let count = entries.len();
                store.entries = entries;
                debug!(entries = count, "entry database loaded");
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                warn!("entry database could not be opened, starting empty: {e}");
                LoadOutcome::Corrupt(VaultError::CorruptStore(match e {
                    VaultError::AuthFailure => {
                        "data file failed authentication (truncated or tampered)".to_string()
                    }
                    VaultError::CorruptStore(msg) => msg,
                    other => other.to_string(),
                }))
            }
        };

        Ok((store, outcome))
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Insert or overwrite `name`, then persist the whole database.
    ///
    /// If the write fails the in-memory map is rolled back, so memory and
    /// disk never disagree.
    pub fn put(&mut self, key: &EncryptionKey, name: &str, entry: Entry) -> Result<()> {
        validate_entry_name(name)?;

        let previous = self.entries.insert(name.to_string(), entry);
        if let Err(e) = self.persist(key) {
            match previous {
                Some(old) => self.entries.insert(name.to_string(), old),
                None => self.entries.remove(name),
            };
            return Err(e);
        }

        debug!(entry = name, replaced = previous.is_some(), "entry stored");
        Ok(())
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Result<&Entry> {
        self.entries
            .get(name)
            .ok_or_else(|| VaultError::NotFound(name.to_string()))
    }

    /// Read-only view of every entry, sorted by name.
    pub fn list(&self) -> &BTreeMap<String, Entry> {
        &self.entries
    }

    /// Remove `name` and persist. Returns the removed entry.
    ///
    /// An unknown name is `NotFound` and leaves the data file untouched.
    /// Sidecar cleanup for file entries is the caller's job.
    pub fn delete(&mut self, key: &EncryptionKey, name: &str) -> Result<Entry> {
        let removed = self
            .entries
            .remove(name)
            .ok_or_else(|| VaultError::NotFound(name.to_string()))?;

        if let Err(e) = self.persist(key) {
            self.entries.insert(name.to_string(), removed);
            return Err(e);
        }

        debug!(entry = name, "entry deleted");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Summaries of every entry, sorted by name.
    pub fn summaries(&self) -> Vec<EntrySummary> {
        self.entries
            .iter()
            .map(|(name, entry)| EntrySummary::from_entry(name, entry))
            .collect()
    }

    /// Entries whose name or username/filename contains `query`,
    /// ignoring case. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<EntrySummary> {
        let needle = query.to_lowercase();
        self.summaries()
            .into_iter()
            .filter(|s| {
                s.name.to_lowercase().contains(&needle) || s.label.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Count of password and file entries.
    pub fn summary(&self) -> VaultSummary {
        self.entries
            .values()
            .fold(VaultSummary::default(), |mut acc, entry| {
                match entry {
                    Entry::Password(_) => acc.passwords += 1,
                    Entry::File(_) => acc.files += 1,
                }
                acc
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Serialize, seal, and atomically replace the data file.
    fn persist(&self, key: &EncryptionKey) -> Result<()> {
        let plaintext = Zeroizing::new(
            serde_json::to_vec(&self.entries)
                .map_err(|e| VaultError::SerializationError(format!("entries: {e}")))?,
        );
        let frame = seal(key, &plaintext)?;
        write_atomic(&self.data_path, &frame)?;
        debug!(entries = self.entries.len(), "entry database persisted");
        Ok(())
    }
}

/// Decode an opened data frame into the entry map.
fn decode(plaintext: &[u8]) -> Result<BTreeMap<String, Entry>> {
    serde_json::from_slice(plaintext)
        .map_err(|e| VaultError::CorruptStore(format!("entry database does not decode: {e}")))
}

/// Validate that an entry name is usable as a map key.
///
/// Must be non-blank, at most 256 bytes, and free of control characters.
fn validate_entry_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(VaultError::InvalidInput("entry name cannot be empty".into()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(VaultError::InvalidInput(format!(
            "entry name cannot exceed {MAX_NAME_LEN} bytes"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(VaultError::InvalidInput(
            "entry name cannot contain control characters".into(),
        ));
    }
    Ok(())
}
