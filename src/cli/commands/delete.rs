//! `digisafe delete`: remove an entry from the vault.

use crate::cli::output;
use crate::cli::{confirm, unlock_session, Cli};
use crate::errors::Result;
use crate::vault::Entry;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, name: &str, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Delete entry '{name}'?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let mut session = unlock_session(cli)?;

    match session.delete_entry(name)? {
        Entry::File(f) => output::success(&format!(
            "Deleted entry '{name}' and its encrypted file '{}'",
            f.original_filename
        )),
        Entry::Password(_) => output::success(&format!("Deleted entry '{name}'")),
    }

    Ok(())
}
