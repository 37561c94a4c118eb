//! Output writing.
//!
//! Every output goes through [`commit_atomically`]: bytes are written to a
//! hidden temp file next to the destination, flushed, then renamed over the
//! destination. A failure at any step removes the temp file and leaves the
//! destination untouched.
//!
//! # Examples
//!
//! ```no_run
//! use docbatch::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # fn example(mut doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! writer.save(&mut doc, Path::new("output.pdf"))?;
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::CompressionLevel;
use crate::error::{DocBatchError, Result};

const BUFFER_SIZE: usize = 8192;

/// Temp path used while `path` is being written: `.{file_name}.tmp` in the
/// same directory, so the final rename never crosses filesystems.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

/// Write `path` through a temp file and rename it into place.
///
/// `write` receives a buffered writer over the temp file. Errors it returns
/// are propagated unchanged; I/O errors from creating, flushing or renaming
/// are mapped to the destination path.
pub fn commit_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let temp = temp_path_for(path);

    let file = File::create(&temp).map_err(|e| DocBatchError::from_create(path, e))?;
    let mut writer = BufWriter::with_capacity(BUFFER_SIZE, file);

    let written = write(&mut writer).and_then(|()| {
        writer
            .flush()
            .map_err(|e| DocBatchError::from_write(path, e))
    });
    drop(writer);

    let outcome = written
        .and_then(|()| fs::rename(&temp, path).map_err(|e| DocBatchError::from_write(path, e)));

    if outcome.is_err() {
        // May already be gone if the rename half-succeeded.
        let _ = fs::remove_file(&temp);
    } else {
        debug!("committed {}", path.display());
    }

    outcome
}

/// Write an in-memory buffer to `path` atomically.
pub fn commit_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    commit_atomically(path, |writer| {
        writer
            .write_all(bytes)
            .map_err(|e| DocBatchError::from_write(path, e))
    })
}

/// Refuse to proceed if `path` already exists.
pub fn ensure_absent(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(DocBatchError::output_exists(path));
    }
    Ok(())
}

/// PDF writer applying a compression level before saving.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfWriter {
    compression: CompressionLevel,
}

impl PdfWriter {
    /// Create a writer with standard compression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with the given compression level.
    pub fn with_compression(compression: CompressionLevel) -> Self {
        Self { compression }
    }

    /// The configured compression level.
    pub fn compression(&self) -> CompressionLevel {
        self.compression
    }

    /// Finalize `doc` and write it to `path` atomically.
    ///
    /// Returns the size of the written file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The destination directory doesn't exist or isn't writable
    /// - Serializing the document fails
    /// - The final rename fails
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<u64> {
        match self.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => doc.compress(),
            CompressionLevel::Maximum => {
                doc.prune_objects();
                doc.compress();
            }
        }
        doc.renumber_objects();

        commit_atomically(path, |writer| {
            doc.save_to(writer)
                .map(|_| ())
                .map_err(|e| DocBatchError::from_write(path, std::io::Error::other(e)))
        })?;

        Ok(fs::metadata(path).map(|m| m.len()).unwrap_or(0))
    }
}
