//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod clipboard;
pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::{default_vault_dir, Settings};
use crate::errors::{Result, VaultError};
use crate::vault::{LoadOutcome, VaultSession, VaultState};

/// Environment variable checked for the master password before prompting.
pub const PASSWORD_ENV: &str = "DIGISAFE_PASSWORD";

/// digisafe CLI: local encrypted vault for passwords and files.
#[derive(Parser)]
#[command(
    name = "digisafe",
    about = "Local encrypted vault for passwords and files",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: ~/.digital_safe)
    #[arg(long, global = true, env = "DIGISAFE_DIR")]
    pub vault_dir: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault protected by a master password
    Init,

    /// Show where the vault lives and what it holds
    Status,

    /// List entries
    List {
        /// Only show entries whose name or username/filename contains this
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Add or replace a password entry
    Add {
        /// Entry name (e.g. "GitHub")
        name: String,
        /// Username for the account
        #[arg(short, long, default_value = "")]
        username: String,
        /// Free-form notes
        #[arg(short, long, default_value = "")]
        notes: String,
        /// Generate a random password instead of prompting
        #[arg(short, long)]
        generate: bool,
    },

    /// Encrypt a file into the vault
    AddFile {
        /// Entry name
        name: String,
        /// File to encrypt
        path: PathBuf,
        /// Free-form notes
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// Show an entry
    Get {
        /// Entry name
        name: String,
        /// Print the password in clear text
        #[arg(long, conflicts_with = "copy")]
        show: bool,
        /// Copy the password to the clipboard and clear it after a delay
        #[arg(short, long)]
        copy: bool,
    },

    /// Decrypt a stored file to disk
    Export {
        /// Entry name
        name: String,
        /// Destination file, or a directory to write the original filename into
        dest: PathBuf,
    },

    /// Delete an entry (and its encrypted file, if any)
    Delete {
        /// Entry name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Print a random password
    Generate {
        /// Number of characters (default from settings: 16)
        #[arg(short, long)]
        length: Option<usize>,
        /// Letters and digits only
        #[arg(long)]
        no_symbols: bool,
    },

    /// Permanently delete the vault and everything in it
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// The vault directory from `--vault-dir` / `DIGISAFE_DIR`, or the default.
pub fn vault_dir(cli: &Cli) -> PathBuf {
    cli.vault_dir.clone().unwrap_or_else(default_vault_dir)
}

/// Load `digisafe.toml` from the vault directory.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    Settings::load(&vault_dir(cli))
}

/// Open the vault session without unlocking it.
pub fn open_session(cli: &Cli) -> Result<VaultSession> {
    let settings = load_settings(cli)?;
    VaultSession::open(vault_dir(cli), settings.kdf_params()?)
}

/// Open the vault and unlock it with the master password.
///
/// A data file that fails to open is reported as a warning; the session
/// is still returned, unlocked with an empty database.
pub fn unlock_session(cli: &Cli) -> Result<VaultSession> {
    let mut session = open_session(cli)?;

    if session.state() == VaultState::Uninitialized {
        output::tip("Run `digisafe init` to create a vault.");
        return Err(VaultError::NotInitialized);
    }

    let password = prompt_password()?;
    if let LoadOutcome::Corrupt(e) = session.authenticate(&password)? {
        output::warning(&format!("{e}"));
        output::warning("Continuing with an empty vault. Saving will overwrite the old data.");
    }

    Ok(session)
}

/// Get the vault password, trying in order:
/// 1. `DIGISAFE_PASSWORD` env var (scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (used during `init`).
///
/// Also respects `DIGISAFE_PASSWORD` for scripted usage.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let password = dialoguer::Password::new()
        .with_prompt("Choose master password")
        .with_confirmation(
            "Confirm master password",
            "Passwords do not match, try again",
        )
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;

    Ok(Zeroizing::new(password))
}

/// Ask a yes/no question, defaulting to "no".
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_options() {
        let cli = Cli::try_parse_from([
            "digisafe", "add", "GitHub", "--username", "octo", "--generate",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                name,
                username,
                notes,
                generate,
            } => {
                assert_eq!(name, "GitHub");
                assert_eq!(username, "octo");
                assert_eq!(notes, "");
                assert!(generate);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn vault_dir_flag_overrides_default() {
        let cli =
            Cli::try_parse_from(["digisafe", "--vault-dir", "/tmp/safe", "status"]).unwrap();
        assert_eq!(vault_dir(&cli), PathBuf::from("/tmp/safe"));
    }

    #[test]
    fn vault_dir_flag_is_global() {
        let cli = Cli::try_parse_from(["digisafe", "list", "--vault-dir", "/tmp/x"]).unwrap();
        assert_eq!(vault_dir(&cli), PathBuf::from("/tmp/x"));
    }

    #[test]
    fn get_show_and_copy_conflict() {
        assert!(Cli::try_parse_from(["digisafe", "get", "x", "--show", "--copy"]).is_err());
        assert!(Cli::try_parse_from(["digisafe", "get", "x", "--copy"]).is_ok());
    }

    #[test]
    fn generate_defaults() {
        let cli = Cli::try_parse_from(["digisafe", "generate"]).unwrap();
        match cli.command {
            Commands::Generate { length, no_symbols } => {
                assert_eq!(length, None);
                assert!(!no_symbols);
            }
            _ => panic!("expected generate"),
        }
    }
}
