//! PDF merging operations.
//!
//! This module provides the PDF concatenation used by `merge-pdf`:
//! - Document concatenation in list order
//! - Page tree helpers shared with the splitter
//!
//! # Examples
//!
//! ```no_run
//! use docbatch::merge::PdfMerger;
//! use std::path::{Path, PathBuf};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let files = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let summary = PdfMerger::new().merge(&files, Path::new("merged.pdf"))?;
//! println!("Merged {} pages", summary.total_pages);
//! # Ok(())
//! # }
//! ```

pub mod merger;
pub mod pages;

pub use merger::{MergeSummary, PdfMerger, merge_documents};
pub use pages::PageBox;
