//! Small helpers shared by the readers, writers and reports.

use std::path::Path;

use crate::error::{DocBatchError, Result};

/// Check that `path` names an existing regular file.
///
/// # Errors
///
/// [`DocBatchError::FileNotFound`] if nothing is there,
/// [`DocBatchError::NotAFile`] for directories and the like.
pub fn ensure_file(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| DocBatchError::from_read(path, e))?;
    if !metadata.is_file() {
        return Err(DocBatchError::not_a_file(path));
    }
    Ok(())
}

/// Size of the file at `path`, or 0 if it cannot be stat'ed.
pub fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
