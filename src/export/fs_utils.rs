// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Check whether `path` may be created or replaced.
///
/// Missing files and `force` pass straight through; otherwise the operator
/// is asked on stdin and anything but `y`/`yes` cancels.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    warning(format!("The file '{}' already exists.", path.display()));
    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    if confirmed(&answer) {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Export(format!(
            "cancelled: '{}' not overwritten",
            path.display()
        )))
    }
}

fn confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yes_confirms() {
        assert!(confirmed("y\n"));
        assert!(confirmed(" YES "));
        assert!(!confirmed(""));
        assert!(!confirmed("no"));
    }

    #[test]
    fn missing_file_is_writable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ensure_writable(&dir.path().join("out.csv"), false).is_ok());
    }

    #[test]
    fn force_skips_the_prompt() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(ensure_writable(file.path(), true).is_ok());
    }
}
