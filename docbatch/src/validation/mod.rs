//! Input validation for docbatch.
//!
//! Used by dry runs and before any output is created. Every input is
//! opened with the same readers the operations use, so a file that passes
//! here will load during the real run:
//! - File existence and accessibility checks
//! - PDF parsing, encryption detection and page counting
//! - Workbook parsing with sheet and row counting
//! - Output path checks against the overwrite mode
//!
//! # Examples
//!
//! ```no_run
//! use docbatch::filelist::FileKind;
//! use docbatch::validation::Validator;
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let files = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let summary = Validator::new().validate_files(FileKind::Pdf, &files, false)?;
//! println!("{} pages in total", summary.total_pages);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use log::warn;
use serde::Serialize;

use crate::config::OverwriteMode;
use crate::error::{DocBatchError, Result};
use crate::filelist::FileKind;
use crate::io::{PdfReader, WorkbookReader};
use crate::merge::pages;
use crate::utils::{file_size, format_file_size};

/// What was found inside a validated file.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Contents {
    /// A readable PDF.
    Pdf {
        /// Number of pages.
        page_count: usize,
        /// PDF version string, e.g. `"1.5"`.
        version: String,
        /// First page's media box size (width, height) in points.
        page_dimensions: Option<(f64, f64)>,
    },
    /// A readable workbook.
    Excel {
        /// Sheet names in tab order.
        sheets: Vec<String>,
        /// Rows across all sheets.
        row_count: usize,
    },
}

/// Result of validating a single file.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// Path to the validated file.
    pub path: PathBuf,

    /// Size of the file in bytes.
    pub file_size: u64,

    /// Parsed contents.
    pub contents: Contents,
}

impl ValidationResult {
    /// Pages for PDFs, 0 for workbooks.
    pub fn page_count(&self) -> usize {
        match &self.contents {
            Contents::Pdf { page_count, .. } => *page_count,
            Contents::Excel { .. } => 0,
        }
    }

    /// Rows for workbooks, 0 for PDFs.
    pub fn row_count(&self) -> usize {
        match &self.contents {
            Contents::Excel { row_count, .. } => *row_count,
            Contents::Pdf { .. } => 0,
        }
    }
}

/// A file that failed validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationFailure {
    /// Path to the file.
    pub path: PathBuf,
    /// Why it failed.
    pub message: String,
}

/// Summary of validation results for multiple files.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    /// Individual validation results for each passing file.
    pub results: Vec<ValidationResult>,

    /// Files that failed, when validation continued past errors.
    pub failures: Vec<ValidationFailure>,

    /// Total number of pages across all PDFs.
    pub total_pages: usize,

    /// Total number of rows across all workbooks.
    pub total_rows: usize,

    /// Total file size in bytes.
    pub total_size: u64,
}

impl ValidationSummary {
    /// Create a summary from validation results.
    pub fn from_results(results: Vec<ValidationResult>) -> Self {
        Self {
            total_pages: results.iter().map(ValidationResult::page_count).sum(),
            total_rows: results.iter().map(ValidationResult::row_count).sum(),
            total_size: results.iter().map(|r| r.file_size).sum(),
            results,
            failures: Vec::new(),
        }
    }

    /// Number of files that passed.
    pub fn files_validated(&self) -> usize {
        self.results.len()
    }

    /// Number of files that failed.
    pub fn files_failed(&self) -> usize {
        self.failures.len()
    }

    /// Format the total file size as a human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Validator for input documents and output paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    pdf_reader: PdfReader,
    workbook_reader: WorkbookReader,
}

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a PDF: it must parse, be unencrypted and have pages.
    pub fn validate_pdf(&self, path: &Path) -> Result<ValidationResult> {
        let loaded = self.pdf_reader.load(path)?;
        let doc = &loaded.document;

        let page_dimensions = doc
            .get_pages()
            .values()
            .next()
            .and_then(|&id| pages::media_box(doc, id).ok())
            .map(|media| (media.width(), media.height()));

        Ok(ValidationResult {
            path: path.to_path_buf(),
            file_size: loaded.file_size,
            contents: Contents::Pdf {
                page_count: loaded.page_count,
                version: doc.version.clone(),
                page_dimensions,
            },
        })
    }

    /// Validate a workbook: it must have a supported extension and parse.
    pub fn validate_workbook(&self, path: &Path) -> Result<ValidationResult> {
        let workbook = self.workbook_reader.load(path)?;

        Ok(ValidationResult {
            path: path.to_path_buf(),
            file_size: file_size(path),
            contents: Contents::Excel {
                sheets: workbook.sheets.iter().map(|s| s.name.clone()).collect(),
                row_count: workbook.total_rows(),
            },
        })
    }

    /// Validate one file as `kind`.
    pub fn validate_file(&self, kind: FileKind, path: &Path) -> Result<ValidationResult> {
        match kind {
            FileKind::Pdf => self.validate_pdf(path),
            FileKind::Excel => self.validate_workbook(path),
        }
    }

    /// Validate multiple files.
    ///
    /// With `continue_on_error` failing files are recorded in the summary
    /// instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns an error if `paths` is empty, if a file fails and
    /// `continue_on_error` is false, or if every file failed.
    pub fn validate_files(
        &self,
        kind: FileKind,
        paths: &[PathBuf],
        continue_on_error: bool,
    ) -> Result<ValidationSummary> {
        if paths.is_empty() {
            return Err(DocBatchError::NoFilesSelected);
        }

        let mut results = Vec::new();
        let mut failures = Vec::new();

        for path in paths {
            match self.validate_file(kind, path) {
                Ok(result) => results.push(result),
                Err(e) if continue_on_error => {
                    warn!("skipping {}: {e}", path.display());
                    failures.push(ValidationFailure {
                        path: path.clone(),
                        message: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        if results.is_empty() {
            return Err(DocBatchError::NoFilesSelected);
        }

        let mut summary = ValidationSummary::from_results(results);
        summary.failures = failures;
        Ok(summary)
    }

    /// Validate the output path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output file exists and `mode` is [`OverwriteMode::NoClobber`]
    /// - Output names an existing directory
    /// - Output directory doesn't exist
    pub fn validate_output(&self, output: &Path, mode: OverwriteMode) -> Result<()> {
        if output.is_dir() {
            return Err(DocBatchError::invalid_config(format!(
                "Output path is a directory: {}",
                output.display()
            )));
        }

        if output.exists() && mode == OverwriteMode::NoClobber {
            return Err(DocBatchError::output_exists(output));
        }

        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
            && !parent.is_dir()
        {
            return Err(DocBatchError::invalid_config(format!(
                "Output directory does not exist: {}",
                parent.display()
            )));
        }

        Ok(())
    }
}
