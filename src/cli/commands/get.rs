//! `digisafe get`: show a single entry.

use std::time::Duration;

use crate::cli::output;
use crate::cli::{clipboard, load_settings, unlock_session, Cli};
use crate::errors::Result;
use crate::vault::Entry;

/// Execute the `get` command.
pub fn execute(cli: &Cli, name: &str, show: bool, copy: bool) -> Result<()> {
    let session = unlock_session(cli)?;

    match session.get_entry(name)? {
        Entry::Password(p) if show => {
            // Clear text goes to stdout alone so it can be piped.
            println!("{}", p.secret);
        }
        Entry::Password(p) if copy => {
            let secs = load_settings(cli)?.clipboard_clear_secs;
            if secs > 0 {
                output::success(&format!(
                    "Password for '{name}' copied. Clearing the clipboard in {secs}s..."
                ));
            } else {
                output::success(&format!("Password for '{name}' copied to the clipboard."));
            }
            clipboard::copy_then_clear(&p.secret, Duration::from_secs(secs))?;
            if secs > 0 {
                output::info("Clipboard cleared.");
            }
        }
        Entry::Password(p) => {
            println!("Name:     {name}");
            println!("Username: {}", p.username);
            println!("Password: {}", "*".repeat(8));
            if !p.notes.is_empty() {
                println!("Notes:    {}", p.notes);
            }
            output::tip(&format!(
                "Run `digisafe get \"{name}\" --copy` to copy it, or `--show` to print it."
            ));
        }
        Entry::File(f) => {
            println!("Name:     {name}");
            println!("File:     {}", f.original_filename);
            println!("Size:     {}", output::format_size(f.size));
            if !f.notes.is_empty() {
                println!("Notes:    {}", f.notes);
            }
            output::tip(&format!("Run `digisafe export \"{name}\" <DEST>` to decrypt it."));
        }
    }

    Ok(())
}
