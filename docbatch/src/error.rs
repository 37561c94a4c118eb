//! Error types for docbatch.
//!
//! Every fallible operation in the crate returns [`DocBatchError`]. Each
//! variant names the file involved (where there is one) and the underlying
//! cause, so the message can be shown to a user as-is.
//!
//! # Error Categories
//!
//! Variants are grouped into four [`ErrorKind`]s:
//!
//! - **Input**: nothing selected, bad arguments, unsupported file types
//! - **Format**: a document cannot be parsed as its declared format
//! - **Io**: a source cannot be read or a destination cannot be written
//! - **Permission**: the operating system denied access to a path

use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

/// Result type alias for docbatch operations.
pub type Result<T> = std::result::Result<T, DocBatchError>;

/// Coarse classification of a [`DocBatchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// No files selected, or an argument is out of range.
    Input,
    /// A document cannot be parsed per its declared format.
    Format,
    /// A source cannot be read or a destination cannot be written.
    Io,
    /// The destination (or a source) is not accessible.
    Permission,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Input => "input error",
            Self::Format => "format error",
            Self::Io => "I/O error",
            Self::Permission => "permission error",
        };
        f.write_str(name)
    }
}

/// Main error type for docbatch operations.
#[derive(Debug, thiserror::Error)]
pub enum DocBatchError {
    /// The operation was invoked with an empty file list.
    #[error("No input files selected")]
    NoFilesSelected,

    /// A split was requested with fewer than 2 or more than 100 parts.
    #[error("Invalid part count {parts}: a page must be split into 2 to 100 parts")]
    InvalidPartCount {
        /// Requested number of parts.
        parts: u32,
    },

    /// The file extension is not handled by the requested operation.
    #[error("Unsupported file type: {}\n  Expected one of: {expected}", .path.display())]
    UnsupportedExtension {
        /// Offending path.
        path: PathBuf,
        /// Human readable list of accepted extensions.
        expected: String,
    },

    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// The operating system denied access to a path.
    #[error("Permission denied: {}\n  Reason: {source}", .path.display())]
    PermissionDenied {
        /// Path that could not be accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse a PDF file.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", .path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// PDF parsed but its structure is unusable.
    #[error("Corrupted or invalid PDF: {}\n  Details: {details}", .path.display())]
    CorruptedPdf {
        /// Path to the corrupted PDF.
        path: PathBuf,
        /// Details about the corruption.
        details: String,
    },

    /// PDF file is encrypted and cannot be processed.
    #[error(
        "PDF is encrypted and cannot be processed: {}\n  Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools",
        .path.display()
    )]
    EncryptedPdf {
        /// Path to the encrypted PDF.
        path: PathBuf,
    },

    /// Failed to read a spreadsheet.
    #[error("Failed to load workbook: {}\n  Reason: {reason}", .path.display())]
    FailedToLoadWorkbook {
        /// Path to the workbook.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Combining documents failed after every input was read.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to read input list file.
    #[error("Failed to read input list file: {}\n  Reason: {source}", .path.display())]
    FailedToReadInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Input list file contains an unusable entry.
    #[error(
        "Invalid entry in input list file: {} at line {line_number}\n  Details: {details}",
        .path.display()
    )]
    InvalidInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Line number with the error.
        line_number: usize,
        /// Details about what's invalid.
        details: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },
}

impl DocBatchError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: impl Into<PathBuf>) -> Self {
        Self::NotAFile { path: path.into() }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a CorruptedPdf error.
    pub fn corrupted_pdf(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        Self::CorruptedPdf {
            path: path.into(),
            details: details.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(path: impl Into<PathBuf>) -> Self {
        Self::EncryptedPdf { path: path.into() }
    }

    /// Create a FailedToLoadWorkbook error.
    pub fn failed_to_load_workbook(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadWorkbook {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedExtension error.
    pub fn unsupported_extension(path: impl Into<PathBuf>, expected: impl Into<String>) -> Self {
        Self::UnsupportedExtension {
            path: path.into(),
            expected: expected.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: impl Into<PathBuf>) -> Self {
        Self::OutputExists { path: path.into() }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Map an I/O error raised while reading `path`.
    ///
    /// `NotFound` and `PermissionDenied` get their dedicated variants; anything
    /// else becomes a generic [`DocBatchError::Io`].
    pub fn from_read(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::file_not_found(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
                source,
            },
            _ => Self::Io { source },
        }
    }

    /// Map an I/O error raised while creating `path`.
    pub fn from_create(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied {
                path: path.to_path_buf(),
                source,
            }
        } else {
            Self::FailedToCreateOutput {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Map an I/O error raised while writing or renaming into `path`.
    pub fn from_write(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied {
                path: path.to_path_buf(),
                source,
            }
        } else {
            Self::FailedToWrite {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoFilesSelected
            | Self::InvalidPartCount { .. }
            | Self::UnsupportedExtension { .. }
            | Self::OutputExists { .. }
            | Self::InvalidInputList { .. }
            | Self::InvalidConfig { .. }
            | Self::Cancelled => ErrorKind::Input,
            Self::FailedToLoadPdf { .. }
            | Self::CorruptedPdf { .. }
            | Self::EncryptedPdf { .. }
            | Self::FailedToLoadWorkbook { .. }
            | Self::MergeFailed { .. } => ErrorKind::Format,
            Self::FileNotFound { .. }
            | Self::NotAFile { .. }
            | Self::FailedToCreateOutput { .. }
            | Self::FailedToWrite { .. }
            | Self::FailedToReadInputList { .. }
            | Self::Io { .. } => ErrorKind::Io,
            Self::PermissionDenied { .. } => ErrorKind::Permission,
        }
    }

    /// The file this error is about, when there is exactly one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::UnsupportedExtension { path, .. }
            | Self::FileNotFound { path }
            | Self::NotAFile { path }
            | Self::PermissionDenied { path, .. }
            | Self::FailedToLoadPdf { path, .. }
            | Self::CorruptedPdf { path, .. }
            | Self::EncryptedPdf { path }
            | Self::FailedToLoadWorkbook { path, .. }
            | Self::OutputExists { path }
            | Self::FailedToCreateOutput { path, .. }
            | Self::FailedToWrite { path, .. }
            | Self::FailedToReadInputList { path, .. }
            | Self::InvalidInputList { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Check if a batch may skip the failing file and carry on.
    ///
    /// True for per-document problems; false for anything that would fail
    /// the same way for every file.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::NotAFile { .. }
                | Self::FailedToLoadPdf { .. }
                | Self::CorruptedPdf { .. }
                | Self::EncryptedPdf { .. }
                | Self::FailedToLoadWorkbook { .. }
                | Self::UnsupportedExtension { .. }
                | Self::OutputExists { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cancelled => 130,
            _ => match self.kind() {
                ErrorKind::Input => 1,
                ErrorKind::Io => 5,
                ErrorKind::Format => 3,
                ErrorKind::Permission => 77,
            },
        }
    }
}

impl From<lopdf::Error> for DocBatchError {
    fn from(err: lopdf::Error) -> Self {
        Self::merge_failed(err.to_string())
    }
}
