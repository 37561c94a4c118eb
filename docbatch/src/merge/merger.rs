//! Core PDF merging implementation.
//!
//! Every input is loaded before anything is written. The first document
//! becomes the base; each following document's page tree is renumbered past
//! the base's object ids and hung under the base's root `Pages` node, so
//! pages keep their content, geometry and inherited attributes unchanged.

use lopdf::Document;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::config::CompressionLevel;
use crate::error::{DocBatchError, Result};
use crate::io::{LoadedPdf, PdfReader, PdfWriter};
use crate::merge::pages;

/// Outcome of a successful PDF merge.
#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    /// Where the merged document was written.
    pub output: PathBuf,

    /// Number of PDFs merged.
    pub files_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Total size of input files in bytes.
    pub input_size: u64,

    /// Size of the written file in bytes.
    pub output_size: u64,

    /// Time taken to load every input.
    #[serde(skip)]
    pub load_time: Duration,

    /// Total time taken for the merge.
    #[serde(skip)]
    pub merge_time: Duration,
}

/// PDF merger that concatenates documents in list order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfMerger {
    reader: PdfReader,
    writer: PdfWriter,
}

impl PdfMerger {
    /// Create a merger with standard compression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a merger writing with the given compression level.
    pub fn with_compression(compression: CompressionLevel) -> Self {
        Self {
            reader: PdfReader::new(),
            writer: PdfWriter::with_compression(compression),
        }
    }

    /// Merge `files` in order into a single PDF at `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `files` is empty ([`DocBatchError::NoFilesSelected`])
    /// - Any input cannot be opened or parsed (the error names that file)
    /// - The output cannot be written
    ///
    /// No file appears at `output` unless the merge succeeds.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use docbatch::merge::PdfMerger;
    /// # use std::path::{Path, PathBuf};
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let files = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
    /// let summary = PdfMerger::new().merge(&files, Path::new("merged.pdf"))?;
    /// println!("Merged {} pages", summary.total_pages);
    /// # Ok(())
    /// # }
    /// ```
    pub fn merge(&self, files: &[PathBuf], output: &Path) -> Result<MergeSummary> {
        if files.is_empty() {
            return Err(DocBatchError::NoFilesSelected);
        }

        let merge_start = Instant::now();

        let loaded = self.reader.load_all(files)?;
        let load_time = merge_start.elapsed();
        let input_size = loaded.iter().map(|pdf| pdf.file_size).sum();

        let mut merged = merge_loaded(loaded)?;
        let total_pages = merged.get_pages().len();

        let output_size = self.writer.save(&mut merged, output)?;

        let merge_time = merge_start.elapsed();
        info!(
            "merged {} files ({total_pages} pages) into {}",
            files.len(),
            output.display()
        );

        Ok(MergeSummary {
            output: output.to_path_buf(),
            files_merged: files.len(),
            total_pages,
            input_size,
            output_size,
            load_time,
            merge_time,
        })
    }
}

fn merge_loaded(loaded: Vec<LoadedPdf>) -> Result<Document> {
    let (paths, documents): (Vec<_>, Vec<_>) =
        loaded.into_iter().map(|pdf| (pdf.path, pdf.document)).unzip();

    merge_documents(documents).map_err(|e| match e {
        DocBatchError::MergeFailed { reason } => {
            DocBatchError::merge_failed(format!("{reason} (inputs: {})", join_names(&paths)))
        }
        other => other,
    })
}

fn join_names(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Concatenate already loaded documents, preserving page order.
///
/// # Errors
///
/// Returns [`DocBatchError::NoFilesSelected`] for an empty input, or
/// [`DocBatchError::MergeFailed`] if a page tree is malformed.
pub fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    let mut documents = documents.into_iter();
    let mut merged = documents.next().ok_or(DocBatchError::NoFilesSelected)?;

    for mut doc in documents {
        doc.renumber_objects_with(merged.max_id + 1);

        let subtree = pages::root_pages_id(&doc)?;
        let page_count = doc.get_pages().len();
        let max_id = doc.max_id;

        merged.objects.extend(doc.objects);
        merged.max_id = merged.max_id.max(max_id);

        pages::append_subtree(&mut merged, subtree, page_count)?;
        debug!("appended {page_count} pages");
    }

    // Catalogs of the appended documents are now unreachable.
    merged.prune_objects();

    Ok(merged)
}
