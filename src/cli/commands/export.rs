//! `digisafe export`: decrypt a stored file to disk.

use std::path::Path;

use crate::cli::output;
use crate::cli::{unlock_session, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `export` command.
pub fn execute(cli: &Cli, name: &str, dest: &Path) -> Result<()> {
    let session = unlock_session(cli)?;

    // Refuse to write decrypted data into the vault's own directory.
    if is_inside(dest, session.paths().root()) {
        return Err(VaultError::CommandFailed(
            "refusing to export into the vault directory".into(),
        ));
    }

    let written = session.export_file(name, dest)?;
    output::success(&format!("Exported '{name}' to {}", written.display()));

    Ok(())
}

/// Whether `path` resolves to somewhere under `root`.
fn is_inside(path: &Path, root: &Path) -> bool {
    let resolved = path
        .canonicalize()
        .or_else(|_| {
            path.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."))
                .canonicalize()
        });
    match (resolved, root.canonicalize()) {
        (Ok(p), Ok(r)) => p.starts_with(r),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn detects_paths_inside_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("vault");
        std::fs::create_dir_all(root.join("files")).unwrap();

        assert!(is_inside(&root.join("files"), &root));
        assert!(is_inside(&root.join("new.txt"), &root));
        assert!(!is_inside(&tmp.path().join("out.txt"), &root));
    }

    #[test]
    fn missing_root_is_never_inside() {
        let tmp = TempDir::new().unwrap();
        assert!(!is_inside(tmp.path(), &tmp.path().join("nope")));
    }
}
