//! Configuration: settings file and vault directory resolution.

pub mod settings;

pub use settings::{default_vault_dir, Settings};
