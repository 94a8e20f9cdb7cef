//! Clipboard copy with automatic clearing.

use std::thread;
use std::time::Duration;

use arboard::Clipboard;
use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

/// Put `text` on the system clipboard, wait `clear_after`, then clear it.
///
/// The clipboard is only cleared if it still holds `text`. A zero
/// duration copies and returns at once. On X11 the contents may then
/// vanish when the process exits unless a clipboard manager keeps them.
pub fn copy_then_clear(text: &str, clear_after: Duration) -> Result<()> {
    let mut clipboard = Clipboard::new().map_err(clipboard_error)?;
    clipboard.set_text(text.to_owned()).map_err(clipboard_error)?;

    if clear_after.is_zero() {
        return Ok(());
    }

    thread::sleep(clear_after);

    let still_ours = clipboard
        .get_text()
        .map(|current| Zeroizing::new(current).as_str() == text)
        .unwrap_or(false);
    if still_ours {
        clipboard.clear().map_err(clipboard_error)?;
    }
    Ok(())
}

fn clipboard_error(e: arboard::Error) -> VaultError {
    VaultError::CommandFailed(format!("clipboard: {e}"))
}
