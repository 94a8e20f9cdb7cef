//! `digisafe status`: show the vault location, state, and entry counts.

use crate::cli::output;
use crate::cli::{open_session, unlock_session, Cli};
use crate::errors::Result;
use crate::vault::VaultState;

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let session = open_session(cli)?;
    let root = session.paths().root().display().to_string();

    if session.state() == VaultState::Uninitialized {
        output::info(&format!("No vault at {root}"));
        output::tip("Run `digisafe init` to create one.");
        return Ok(());
    }
    drop(session);

    let session = unlock_session(cli)?;
    output::info(&format!("Vault at {root}"));
    output::print_summary(&session.summary()?);

    Ok(())
}
