//! `digisafe reset`: permanently delete the vault.
//!
//! Works without the master password, so a forgotten password can be
//! recovered from by starting over.

use crate::cli::output;
use crate::cli::{confirm, open_session, Cli};
use crate::errors::Result;
use crate::vault::VaultState;

/// Execute the `reset` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let mut session = open_session(cli)?;
    let root = session.paths().root().display().to_string();

    if session.state() == VaultState::Uninitialized {
        output::info(&format!("No vault at {root}, nothing to reset."));
        return Ok(());
    }

    if !force {
        output::warning("This deletes every password and file in the vault. It cannot be undone.");
        if !confirm(&format!("Reset the vault at {root}?"))? {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    session.reset()?;
    output::success(&format!("Vault at {root} has been reset."));
    output::tip("Run `digisafe init` to create a new one.");

    Ok(())
}
