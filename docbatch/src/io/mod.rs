//! I/O operations for docbatch.
//!
//! This module handles all file I/O:
//! - Loading PDF documents (lopdf)
//! - Loading `.xlsx` / `.xls` workbooks (calamine)
//! - Writing PDFs and `.xlsx` workbooks through an atomic temp-file commit
//!
//! # Examples
//!
//! ```no_run
//! use docbatch::io::{load_pdf, save_pdf};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = load_pdf(Path::new("input.pdf"))?;
//! save_pdf(&mut doc, Path::new("output.pdf"))?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod workbook;
pub mod writer;

pub use reader::{LoadedPdf, PdfReader};
pub use workbook::{WorkbookReader, WorkbookWriter};
pub use writer::{PdfWriter, commit_atomically, commit_bytes};

use crate::error::Result;
use lopdf::Document;
use std::path::Path;

/// Load a PDF document from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid PDF.
pub fn load_pdf(path: &Path) -> Result<Document> {
    Ok(PdfReader::new().load(path)?.document)
}

/// Save a PDF document with standard compression.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_pdf(doc: &mut Document, path: &Path) -> Result<()> {
    PdfWriter::new().save(doc, path).map(|_| ())
}
