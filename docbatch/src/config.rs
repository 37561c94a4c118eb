//! Configuration module for docbatch.
//!
//! This module turns front-end arguments into a validated, normalized
//! configuration that drives one batch operation. It handles:
//! - Typed, range-checked operation parameters (part count, header rows)
//! - Resolution of conflicting output options
//! - Application of defaults

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{DocBatchError, Result};
use crate::filelist::FileKind;

/// Number of header rows carried over from the first workbook by default.
pub const DEFAULT_HEADER_ROWS: u32 = 8;

/// Compression level for PDF outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Write streams exactly as they were read.
    None,
    /// Compress uncompressed streams.
    #[default]
    Standard,
    /// Compress and drop unreachable objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = DocBatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(DocBatchError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Which occurrence of a duplicated path survives deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupPolicy {
    /// Scan from the end and keep the first sighting, then restore order.
    ///
    /// The surviving entry of a duplicated path sits where its last
    /// occurrence was: `[a, b, a]` becomes `[b, a]`.
    #[default]
    KeepLast,
    /// Keep the earliest occurrence: `[a, b, a]` becomes `[a, b]`.
    KeepFirst,
}

impl FromStr for DedupPolicy {
    type Err = DocBatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "keep-last" | "last" => Ok(Self::KeepLast),
            "keep-first" | "first" => Ok(Self::KeepFirst),
            _ => Err(DocBatchError::invalid_config(format!(
                "Invalid dedup policy: {s}. Must be one of: keep-last, keep-first"
            ))),
        }
    }
}

/// Number of horizontal strips each page is cut into, from 2 to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PartCount(u32);

impl PartCount {
    /// Smallest meaningful split.
    pub const MIN: u32 = 2;

    /// Largest accepted split.
    pub const MAX: u32 = 100;

    /// Validate a part count.
    ///
    /// # Errors
    ///
    /// Returns [`DocBatchError::InvalidPartCount`] for values outside
    /// [`MIN`](Self::MIN)..=[`MAX`](Self::MAX).
    pub fn new(parts: u32) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&parts) {
            return Err(DocBatchError::InvalidPartCount { parts });
        }
        Ok(Self(parts))
    }

    /// The raw count.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for PartCount {
    type Error = DocBatchError;

    fn try_from(parts: u32) -> Result<Self> {
        Self::new(parts)
    }
}

impl fmt::Display for PartCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of leading rows of the first workbook treated as the header block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HeaderRows(u32);

impl HeaderRows {
    /// Wrap a row count. Zero means "no header": every row is body.
    pub fn new(rows: u32) -> Self {
        Self(rows)
    }

    /// The raw count.
    pub fn get(self) -> u32 {
        self.0
    }

    /// The count as an index bound.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl Default for HeaderRows {
    fn default() -> Self {
        Self(DEFAULT_HEADER_ROWS)
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// The single transformation a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Concatenate PDFs into one document.
    MergePdf,
    /// Cut every page of each PDF into horizontal strips.
    SplitPdf {
        /// Strips per page.
        parts: PartCount,
    },
    /// Merge workbooks below the first workbook's header block.
    MergeExcel {
        /// Header block height.
        header_rows: HeaderRows,
    },
    /// Copy every sheet of every workbook into one workbook.
    ExportExcelSheets,
}

impl Operation {
    /// Which kind of file this operation consumes.
    pub fn file_kind(&self) -> FileKind {
        match self {
            Self::MergePdf | Self::SplitPdf { .. } => FileKind::Pdf,
            Self::MergeExcel { .. } | Self::ExportExcelSheets => FileKind::Excel,
        }
    }

    /// Extension of the file this operation produces.
    pub fn output_extension(&self) -> &'static str {
        match self.file_kind() {
            FileKind::Pdf => "pdf",
            FileKind::Excel => "xlsx",
        }
    }
}

/// Complete configuration for one batch run.
#[derive(Debug, Clone)]
pub struct Config {
    /// What to do.
    pub operation: Operation,

    /// Input paths, in processing order, before deduplication.
    pub inputs: Vec<PathBuf>,

    /// Output file. For splitting this is a directory; `None` means
    /// "alongside each source".
    pub output: Option<PathBuf>,

    /// Dry run mode - validate without creating output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression for PDF outputs.
    pub compression: CompressionLevel,

    /// Duplicate path handling applied before the operation runs.
    pub dedup: DedupPolicy,

    /// Number of files split concurrently (None = 1).
    pub jobs: Option<usize>,

    /// Hand the finished output to the viewer/print collaborator.
    pub print: bool,
}

impl Config {
    /// Create a configuration with defaults for everything but the essentials.
    pub fn new(operation: Operation, inputs: Vec<PathBuf>, output: Option<PathBuf>) -> Self {
        Self {
            operation,
            inputs,
            output,
            dry_run: false,
            verbose: false,
            quiet: false,
            overwrite_mode: OverwriteMode::default(),
            compression: CompressionLevel::default(),
            dedup: DedupPolicy::default(),
            jobs: None,
            print: false,
        }
    }

    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - The output path is also one of the inputs
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(DocBatchError::NoFilesSelected);
        }

        if self.verbose && self.quiet {
            return Err(DocBatchError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(DocBatchError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        if let Some(output) = &self.output
            && self.inputs.iter().any(|input| input == output)
        {
            return Err(DocBatchError::invalid_config(format!(
                "Output file cannot be the same as an input file: {}",
                output.display()
            )));
        }

        Ok(())
    }

    /// Get the effective number of parallel split jobs.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or(1).max(1)
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}
