//! `digisafe list`: display entries in a table.

use crate::cli::output;
use crate::cli::{unlock_session, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, search: Option<&str>) -> Result<()> {
    let session = unlock_session(cli)?;

    let Some(query) = search else {
        output::print_summary(&session.summary()?);
        output::print_entries_table(&session.list_entries()?);
        return Ok(());
    };

    let matches = session.search(query)?;
    if matches.is_empty() {
        output::info(&format!("No entries match '{query}'."));
        return Ok(());
    }

    output::info(&format!("{} match(es) for '{query}'", matches.len()));
    output::print_entries_table(&matches);

    Ok(())
}
