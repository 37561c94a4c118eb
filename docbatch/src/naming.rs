//! Output path derivation and input path expansion.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::config::PartCount;
use crate::error::{DocBatchError, Result};

/// Timestamp layout of generated output names: `YYMMDD-HHMMSS`.
pub const TIMESTAMP_FORMAT: &str = "%y%m%d-%H%M%S";

/// Where the split of `source` into `parts` strips is written:
/// `{stem}-{parts}a5.pdf`, next to the source unless `dir` is given.
///
/// ```
/// use docbatch::config::PartCount;
/// use docbatch::naming::split_output_path;
/// use std::path::{Path, PathBuf};
///
/// let parts = PartCount::new(2).unwrap();
/// assert_eq!(
///     split_output_path(Path::new("scans/invoice.pdf"), parts, None),
///     PathBuf::from("scans/invoice-2a5.pdf")
/// );
/// ```
pub fn split_output_path(source: &Path, parts: PartCount, dir: Option<&Path>) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{stem}-{parts}a5.pdf");

    match dir {
        Some(dir) => dir.join(name),
        None => source.with_file_name(name),
    }
}

/// A `{YYMMDD-HHMMSS}.{extension}` path inside `dir`.
pub fn timestamped_output_path(dir: &Path, extension: &str, now: DateTime<Local>) -> PathBuf {
    dir.join(format!("{}.{extension}", now.format(TIMESTAMP_FORMAT)))
}

/// File stem of `path` as an owned string, empty if there is none.
pub fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// A pattern without glob metacharacters is passed through unchanged even
/// if nothing exists there, so a missing file is reported by the operation
/// that tries to open it rather than silently dropped.
///
/// Errors:
/// - Invalid glob syntax.
/// - Filesystem errors from the glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        if is_literal(pattern) {
            resolved_paths.push(PathBuf::from(pattern));
        } else {
            resolved_paths.extend(collect_paths_for_pattern(pattern)?);
        }
    }

    Ok(resolved_paths)
}

fn is_literal(pattern: &str) -> bool {
    !pattern.contains(['*', '?', '['])
}

/// Expand a single glob pattern, e.g. `"./scans/*.pdf"`.
fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|err| {
        DocBatchError::invalid_config(format!("Invalid glob pattern '{pattern}': {err}"))
    })?;

    let mut resolved_paths = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| DocBatchError::Io {
            source: err.into(),
        })?;
        resolved_paths.push(path);
    }

    Ok(resolved_paths)
}
