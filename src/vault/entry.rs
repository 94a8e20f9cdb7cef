//! Entry types stored inside the encrypted database.
//!
//! The database serializes as a JSON object keyed by entry name, each
//! value tagged with a `"type"` of `"password"` or `"file"`:
//!
//! ```json
//! {"bank": {"type": "password", "username": "alice", "password": "s3cret", "notes": ""}}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A stored credential. Wiped when dropped, wherever it ends up.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct PasswordEntry {
    pub username: String,
    /// The secret itself. Stored under the `password` key.
    #[serde(rename = "password")]
    pub secret: String,
    #[serde(default)]
    pub notes: String,
}

impl fmt::Debug for PasswordEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordEntry")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .field("notes", &self.notes)
            .finish()
    }
}

/// Metadata for a file whose contents live in an encrypted sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Basename of the file as it was added.
    #[serde(rename = "original_name")]
    pub original_filename: String,
    /// Path of the sidecar frame on disk.
    #[serde(rename = "encrypted_path")]
    pub sidecar_path: String,
    /// Plaintext length in bytes.
    pub size: u64,
    #[serde(default)]
    pub notes: String,
}

/// One named item in the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    Password(PasswordEntry),
    File(FileEntry),
}

impl Entry {
    pub fn notes(&self) -> &str {
        match self {
            Entry::Password(p) => &p.notes,
            Entry::File(f) => &f.notes,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Password(_) => EntryKind::Password,
            Entry::File(_) => EntryKind::File,
        }
    }

    pub fn as_file(&self) -> Option<&FileEntry> {
        match self {
            Entry::File(f) => Some(f),
            Entry::Password(_) => None,
        }
    }
}

/// Discriminant of an `Entry`, for listings that never touch secrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Password,
    File,
}

/// Lightweight listing row: no secret, no sidecar path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub name: String,
    pub kind: EntryKind,
    /// Username for passwords, original filename for files.
    pub label: String,
    /// File size in bytes; `None` for passwords.
    pub size: Option<u64>,
}

impl EntrySummary {
    pub fn from_entry(name: &str, entry: &Entry) -> Self {
        match entry {
            Entry::Password(p) => Self {
                name: name.to_string(),
                kind: EntryKind::Password,
                label: p.username.clone(),
                size: None,
            },
            Entry::File(f) => Self {
                name: name.to_string(),
                kind: EntryKind::File,
                label: f.original_filename.clone(),
                size: Some(f.size),
            },
        }
    }
}

/// Number of entries of each kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VaultSummary {
    pub passwords: usize,
    pub files: usize,
}
