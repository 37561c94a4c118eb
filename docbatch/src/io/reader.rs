//! PDF reading and loading operations.
//!
//! Documents are loaded whole. Batch loads are all-or-nothing: the first
//! input that cannot be opened aborts the batch with an error naming it.
//!
//! # Examples
//!
//! ```no_run
//! use docbatch::io::reader::PdfReader;
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(&PathBuf::from("a.pdf"))?;
//! println!("{} pages", loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::debug;

use crate::error::{DocBatchError, Result};
use crate::utils::{ensure_file, file_size};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

/// PDF reader. Rejects encrypted documents and documents without pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File does not exist or is not a regular file
    /// - File is not a valid PDF
    /// - PDF is encrypted
    /// - PDF has no pages
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        ensure_file(path)?;

        let start = Instant::now();

        let document = Document::load(path).map_err(|e| {
            let err_msg = e.to_string();
            if err_msg.contains("encrypt") || err_msg.contains("password") {
                DocBatchError::encrypted_pdf(path)
            } else {
                DocBatchError::failed_to_load_pdf(path, err_msg)
            }
        })?;

        if document.is_encrypted() {
            return Err(DocBatchError::encrypted_pdf(path));
        }

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(DocBatchError::corrupted_pdf(path, "PDF has no pages"));
        }

        let load_time = start.elapsed();
        debug!(
            "loaded {} ({page_count} pages) in {load_time:?}",
            path.display()
        );

        Ok(LoadedPdf {
            document,
            path: path.to_path_buf(),
            page_count,
            load_time,
            file_size: file_size(path),
        })
    }

    /// Load every PDF in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the error of the first input that fails to load.
    pub fn load_all(&self, paths: &[PathBuf]) -> Result<Vec<LoadedPdf>> {
        paths.iter().map(|path| self.load(path)).collect()
    }
}
