//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{EntryKind, EntrySummary, VaultSummary};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of entries (Name, Type, Username / File, Size).
pub fn print_entries_table(entries: &[EntrySummary]) {
    if entries.is_empty() {
        info("No entries in this vault yet.");
        tip("Run `digisafe add <NAME>` or `digisafe add-file <NAME> <PATH>`.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Type", "Username / File", "Size"]);

    for e in entries {
        table.add_row(vec![
            e.name.clone(),
            kind_label(e.kind).to_string(),
            e.label.clone(),
            e.size.map(format_size).unwrap_or_default(),
        ]);
    }

    println!("{table}");
}

/// One-line dashboard of entry counts.
pub fn print_summary(summary: &VaultSummary) {
    info(&format!(
        "{} password(s), {} file(s)",
        summary.passwords, summary.files
    ));
}

pub fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Password => "password",
        EntryKind::File => "file",
    }
}

/// Human-readable byte count with one decimal: `512.0 B`, `1.5 KB`, ...
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} TB")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_size_picks_unit() {
        assert_eq!(format_size(0), "0.0 B");
        assert_eq!(format_size(1023), "1023.0 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn format_size_tops_out_at_terabytes() {
        assert_eq!(format_size(2 * 1024u64.pow(4)), "2.0 TB");
        assert_eq!(format_size(2048 * 1024u64.pow(4)), "2048.0 TB");
    }

    #[test]
    fn kind_labels() {
        assert_eq!(kind_label(EntryKind::Password), "password");
        assert_eq!(kind_label(EntryKind::File), "file");
    }
}
