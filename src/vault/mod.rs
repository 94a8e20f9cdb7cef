//! Vault module: the encrypted store and its session.
//!
//! This module provides:
//! - On-disk paths, the 48-byte config record and atomic writes (`layout`)
//! - `Entry` and its password/file variants (`entry`)
//! - The encrypted entry database (`store`)
//! - Encrypted sidecar files (`files`)
//! - The lock/unlock state machine that ties them together (`session`)

pub mod entry;
pub mod files;
pub mod layout;
pub mod session;
pub mod store;

// Re-export the most commonly used items.
pub use entry::{Entry, EntryKind, EntrySummary, FileEntry, PasswordEntry, VaultSummary};
pub use files::FileVault;
pub use layout::{ConfigRecord, StoredConfig, VaultPaths};
pub use session::{VaultSession, VaultState};
pub use store::{EntryStore, LoadOutcome};
