//! Cutting PDF pages into horizontal strips.
//!
//! Every page of a source document becomes `parts` pages, one per strip,
//! ordered top to bottom. Each strip is a separate page object cloned from
//! the source page with its own `/CropBox`; content streams and resources
//! are shared and left untouched.
//!
//! # Examples
//!
//! ```no_run
//! use docbatch::config::PartCount;
//! use docbatch::split::PdfSplitter;
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let files = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let report = PdfSplitter::new().split_all(&files, PartCount::new(2)?)?;
//! for failure in &report.failed {
//!     eprintln!("{}: {}", failure.path.display(), failure.message);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use log::{debug, error, warn};
use lopdf::{Document, Object, ObjectId};
use serde::Serialize;

use crate::config::{CompressionLevel, PartCount};
use crate::error::{DocBatchError, ErrorKind, Result};
use crate::io::writer::ensure_absent;
use crate::io::{PdfReader, PdfWriter};
use crate::merge::pages::{self, PageBox};
use crate::naming::split_output_path;

/// Crop boxes of the `parts` strips of `media`, topmost first.
///
/// Strip `i` spans `bottom + H·(n−i−1)/n ..= bottom + H·(n−i)/n`
/// vertically and the full media width horizontally. No rounding.
pub fn strip_boxes(media: PageBox, parts: PartCount) -> Vec<PageBox> {
    let n = parts.get();
    let height = media.height();
    (0..n)
        .map(|i| {
            let lower = f64::from(n - i - 1) / f64::from(n);
            let upper = f64::from(n - i) / f64::from(n);
            PageBox::new(
                media.left,
                media.bottom + height * lower,
                media.right,
                media.bottom + height * upper,
            )
        })
        .collect()
}

/// Replace every page of `doc` with its strips, in page-major order.
///
/// Returns the new page count.
pub fn split_document(doc: &mut Document, parts: PartCount) -> Result<usize> {
    let root = pages::root_pages_id(doc)?;
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

    let mut kids = Vec::with_capacity(page_ids.len() * parts.get() as usize);
    for page_id in page_ids {
        let media = pages::media_box(doc, page_id)?;
        let template = pages::materialized_page(doc, page_id)?;

        for strip in strip_boxes(media, parts) {
            let mut page = template.clone();
            page.set("Parent", Object::Reference(root));
            page.set("CropBox", strip.to_object());
            kids.push(doc.add_object(page));
        }
    }

    pages::set_root_kids(doc, &kids, kids.len())?;
    // Drops the original pages and intermediate tree nodes.
    doc.prune_objects();

    Ok(kids.len())
}

/// Outcome of splitting one file.
#[derive(Debug, Clone, Serialize)]
pub struct SplitSummary {
    /// Source document.
    pub source: PathBuf,
    /// Written document.
    pub output: PathBuf,
    /// Strips per page.
    pub parts: PartCount,
    /// Pages in the source.
    pub source_pages: usize,
    /// Pages in the output (`source_pages * parts`).
    pub output_pages: usize,
}

/// A file the batch could not split.
#[derive(Debug, Clone, Serialize)]
pub struct SplitFailure {
    /// Source document.
    pub path: PathBuf,
    /// Error category.
    pub kind: ErrorKind,
    /// Full error message.
    pub message: String,
}

/// Per-file outcomes of a batch split, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SplitReport {
    /// Files split successfully.
    pub succeeded: Vec<SplitSummary>,
    /// Files that failed, with the reason.
    pub failed: Vec<SplitFailure>,
}

impl SplitReport {
    fn record(&mut self, path: &Path, outcome: Result<SplitSummary>) {
        match outcome {
            Ok(summary) => self.succeeded.push(summary),
            Err(err) => {
                if err.is_recoverable() {
                    warn!("skipping {}: {err}", path.display());
                } else {
                    error!("failed to split {}: {err}", path.display());
                }
                self.failed.push(SplitFailure {
                    path: path.to_path_buf(),
                    kind: err.kind(),
                    message: err.to_string(),
                });
            }
        }
    }

    /// True when every file was split.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Pages written across all outputs.
    pub fn total_output_pages(&self) -> usize {
        self.succeeded.iter().map(|s| s.output_pages).sum()
    }
}

/// PDF splitter with output placement and overwrite policy.
#[derive(Debug, Clone, Default)]
pub struct PdfSplitter {
    reader: PdfReader,
    writer: PdfWriter,
    output_dir: Option<PathBuf>,
    no_clobber: bool,
}

impl PdfSplitter {
    /// Create a splitter writing next to each source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write outputs with the given compression level.
    pub fn with_compression(mut self, compression: CompressionLevel) -> Self {
        self.writer = PdfWriter::with_compression(compression);
        self
    }

    /// Write outputs into `dir` instead of next to each source.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Refuse to replace existing outputs.
    pub fn no_clobber(mut self, no_clobber: bool) -> Self {
        self.no_clobber = no_clobber;
        self
    }

    /// Where the split of `source` will be written.
    pub fn output_path_for(&self, source: &Path, parts: PartCount) -> PathBuf {
        split_output_path(source, parts, self.output_dir.as_deref())
    }

    /// Split `file` into `parts` strips per page and write it to `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be loaded, its page tree has
    /// no usable media box, or the output cannot be written.
    pub fn split(&self, file: &Path, parts: PartCount, output: &Path) -> Result<SplitSummary> {
        if self.no_clobber {
            ensure_absent(output)?;
        }

        let loaded = self.reader.load(file)?;
        let mut doc = loaded.document;

        let output_pages = split_document(&mut doc, parts).map_err(|e| match e {
            DocBatchError::MergeFailed { reason } => DocBatchError::corrupted_pdf(file, reason),
            other => other,
        })?;
        self.writer.save(&mut doc, output)?;

        debug!(
            "split {} into {output_pages} pages at {}",
            file.display(),
            output.display()
        );

        Ok(SplitSummary {
            source: file.to_path_buf(),
            output: output.to_path_buf(),
            parts,
            source_pages: loaded.page_count,
            output_pages,
        })
    }

    /// Split `file` to its derived output path.
    pub fn split_file(&self, file: &Path, parts: PartCount) -> Result<SplitSummary> {
        self.split(file, parts, &self.output_path_for(file, parts))
    }

    /// Split each file in turn. A failing file is recorded and skipped.
    ///
    /// # Errors
    ///
    /// Only [`DocBatchError::NoFilesSelected`]; per-file failures are in
    /// the report.
    pub fn split_all(&self, files: &[PathBuf], parts: PartCount) -> Result<SplitReport> {
        if files.is_empty() {
            return Err(DocBatchError::NoFilesSelected);
        }

        let mut report = SplitReport::default();
        for file in files {
            report.record(file, self.split_file(file, parts));
        }
        Ok(report)
    }

    /// Split files on up to `jobs` blocking tasks at once.
    ///
    /// Produces the same report as [`split_all`](Self::split_all), in the
    /// same order. Must run inside a tokio runtime.
    pub async fn split_all_parallel(
        &self,
        files: &[PathBuf],
        parts: PartCount,
        jobs: usize,
    ) -> Result<SplitReport> {
        if files.is_empty() {
            return Err(DocBatchError::NoFilesSelected);
        }

        let tasks = files.iter().cloned().map(|file| {
            let splitter = self.clone();
            async move {
                let source = file.clone();
                let outcome =
                    tokio::task::spawn_blocking(move || splitter.split_file(&source, parts))
                        .await
                        .unwrap_or_else(|e| {
                            Err(DocBatchError::Io {
                                source: std::io::Error::other(format!("split task failed: {e}")),
                            })
                        });
                (file, outcome)
            }
        });

        let outcomes: Vec<_> = stream::iter(tasks).buffered(jobs.max(1)).collect().await;

        let mut report = SplitReport::default();
        for (file, outcome) in outcomes {
            report.record(&file, outcome);
        }
        Ok(report)
    }
}
