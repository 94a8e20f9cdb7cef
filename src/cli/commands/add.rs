//! `digisafe add`: add or replace a password entry.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{load_settings, unlock_session, Cli};
use crate::crypto::generate_password;
use crate::errors::{Result, VaultError};

/// Execute the `add` command.
pub fn execute(cli: &Cli, name: &str, username: &str, notes: &str, generate: bool) -> Result<()> {
    // Determine the password from one of three sources.
    let secret = if generate {
        // Source 1: Generated with the configured defaults.
        let settings = load_settings(cli)?;
        Zeroizing::new(generate_password(
            settings.password_length,
            settings.password_symbols,
        ))
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end_matches(&['\r', '\n'][..]).to_string())
    } else {
        // Source 3: Interactive secure prompt (default).
        let pw = dialoguer::Password::new()
            .with_prompt(format!("Password for {name}"))
            .with_confirmation("Confirm password", "Passwords do not match, try again")
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
        Zeroizing::new(pw)
    };

    if secret.is_empty() {
        return Err(VaultError::InvalidInput("password cannot be empty".into()));
    }

    let mut session = unlock_session(cli)?;
    let existed = session.get_entry(name).is_ok();
    session.put_password(name, username, &secret, notes)?;

    let total = session.list_entries()?.len();
    if existed {
        output::success(&format!("Entry '{name}' updated ({total} total)"));
    } else {
        output::success(&format!("Entry '{name}' added ({total} total)"));
    }

    if generate {
        output::info(&format!("Generated a {}-character password.", secret.chars().count()));
        output::tip(&format!("Run `digisafe get \"{name}\" --show` to reveal it."));
    }

    Ok(())
}
