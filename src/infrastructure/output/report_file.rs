use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Expands a leading `~` in a user-supplied output path.
#[must_use]
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Writes the report text, replacing any previous file and creating
/// parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file
/// cannot be written.
pub fn write_report(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create report directory {}", parent.display())
        })?;
    }
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write report file {}", path.display()))
}
