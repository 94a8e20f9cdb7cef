//! `digisafe add-file`: encrypt a file into the vault.

use std::path::Path;

use crate::cli::output;
use crate::cli::{unlock_session, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `add-file` command.
pub fn execute(cli: &Cli, name: &str, path: &Path, notes: &str) -> Result<()> {
    if !path.is_file() {
        return Err(VaultError::InvalidInput(format!(
            "'{}' is not a readable file",
            path.display()
        )));
    }

    let mut session = unlock_session(cli)?;
    let entry = session.put_file(name, path, notes)?;

    output::success(&format!(
        "Stored '{}' as '{name}' ({})",
        entry.original_filename,
        output::format_size(entry.size)
    ));
    output::tip(&format!("Run `digisafe export \"{name}\" <DEST>` to get it back."));

    Ok(())
}
