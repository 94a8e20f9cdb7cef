//! `digisafe generate`: print a random password. Needs no vault.

use crate::cli::{load_settings, Cli};
use crate::crypto::generate_password;
use crate::errors::{Result, VaultError};

/// Longest password the command will produce.
const MAX_LENGTH: usize = 4096;

/// Execute the `generate` command.
pub fn execute(cli: &Cli, length: Option<usize>, no_symbols: bool) -> Result<()> {
    let settings = load_settings(cli)?;
    let length = length.unwrap_or(settings.password_length);
    if length > MAX_LENGTH {
        return Err(VaultError::InvalidInput(format!(
            "length cannot exceed {MAX_LENGTH}"
        )));
    }

    let include_symbols = settings.password_symbols && !no_symbols;
    println!("{}", generate_password(length, include_symbols));
    Ok(())
}
