//! docbatch - Batch transformations over ordered lists of PDFs and workbooks.
//!
//! Four operations, each consuming a curated [`filelist::FileList`]:
//!
//! - PDF merge: concatenate documents in list order
//! - PDF split: cut every page into N horizontal strips
//! - Excel merge: stack body rows under the first workbook's header
//! - Excel export: copy every sheet of every workbook into one workbook
//!
//! Every operation is synchronous and commits its output atomically.
//!
//! # Examples
//!
//! ## Merge PDFs
//!
//! ```no_run
//! use docbatch::config::DedupPolicy;
//! use docbatch::filelist::{FileKind, FileList};
//! use docbatch::merge::PdfMerger;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut list = FileList::new(FileKind::Pdf);
//! list.add(["cover.pdf", "body.pdf", "cover.pdf"]);
//! list.dedupe_in_place(DedupPolicy::KeepLast);
//!
//! let summary = PdfMerger::new().merge(&list.paths(), Path::new("book.pdf"))?;
//! println!("Created {} page document", summary.total_pages);
//! # Ok(())
//! # }
//! ```
//!
//! ## Merge workbooks
//!
//! ```no_run
//! use docbatch::config::HeaderRows;
//! use docbatch::excel::ExcelMerger;
//! use std::path::{Path, PathBuf};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let files = vec![PathBuf::from("jan.xlsx"), PathBuf::from("feb.xls")];
//! let summary = ExcelMerger::new().merge(&files, HeaderRows::default(), Path::new("q1.xlsx"))?;
//! println!("{} body rows", summary.body_rows);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod excel;
pub mod filelist;
pub mod io;
pub mod merge;
pub mod naming;
pub mod output;
pub mod print;
pub mod split;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{DocBatchError, ErrorKind, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
