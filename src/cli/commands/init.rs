//! `digisafe init`: create a new vault.

use crate::cli::output;
use crate::cli::{open_session, prompt_new_password, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::VaultState;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut session = open_session(cli)?;
    let root = session.paths().root().to_path_buf();

    // 1. Refuse to clobber an existing vault.
    if session.state() != VaultState::Uninitialized {
        output::tip("Use `digisafe add` to add entries to the existing vault.");
        output::tip("Use `digisafe reset` to start over.");
        return Err(VaultError::AlreadyInitialized);
    }

    // 2. Prompt for a new password (with confirmation).
    let password = prompt_new_password()?;

    // 3. Derive keys and write the config record.
    session.enroll(&password)?;
    session.lock();

    output::success(&format!("Vault created at {}", root.display()));
    output::tip("Run `digisafe add <NAME>` to store a password.");
    output::tip("Run `digisafe add-file <NAME> <PATH>` to store a file.");

    Ok(())
}
