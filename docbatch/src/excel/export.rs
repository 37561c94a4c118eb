//! Collecting every input sheet into one workbook, one tab per sheet.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::error::{DocBatchError, Result};
use crate::excel::model::{Sheet, Workbook};
use crate::io::{WorkbookReader, WorkbookWriter};
use crate::naming::stem_of;

/// Longest sheet name Excel accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

const APOSTROPHE: char = '\'';

/// Outcome of a successful export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// Where the workbook was written.
    pub output: PathBuf,
    /// Number of source workbooks.
    pub files_exported: usize,
    /// Output sheet names, in tab order.
    pub sheets: Vec<String>,
    /// Rows copied across all sheets.
    pub total_rows: usize,
}

/// Copies each sheet of each input verbatim into its own output sheet
/// named `{stem}_{sheet}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SheetExporter {
    reader: WorkbookReader,
    writer: WorkbookWriter,
}

impl SheetExporter {
    /// Create an exporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Export every sheet of `files` into a single `.xlsx` at `output`.
    ///
    /// # Errors
    ///
    /// Same as [`ExcelMerger::merge`](crate::excel::ExcelMerger::merge).
    pub fn export(&self, files: &[PathBuf], output: &Path) -> Result<ExportSummary> {
        if files.is_empty() {
            return Err(DocBatchError::NoFilesSelected);
        }

        let sources = files
            .iter()
            .map(|path| Ok((stem_of(path), self.reader.load(path)?)))
            .collect::<Result<Vec<_>>>()?;

        let workbook = collect_sheets(&sources);
        self.writer.save(&workbook, output)?;

        info!(
            "exported {} sheets from {} workbooks into {}",
            workbook.sheets.len(),
            files.len(),
            output.display()
        );

        Ok(ExportSummary {
            output: output.to_path_buf(),
            files_exported: files.len(),
            sheets: workbook.sheets.iter().map(|s| s.name.clone()).collect(),
            total_rows: workbook.total_rows(),
        })
    }
}

/// One output sheet per `(stem, workbook)` sheet, rows unchanged.
pub fn collect_sheets(sources: &[(String, Workbook)]) -> Workbook {
    let mut taken = HashSet::new();
    let sheets = sources
        .iter()
        .flat_map(|(stem, workbook)| {
            workbook
                .sheets
                .iter()
                .map(move |sheet| (format!("{stem}_{}", sheet.name), sheet))
        })
        .map(|(name, sheet)| {
            let name = unique_name(&sanitize_sheet_name(&name), &mut taken);
            Sheet::with_rows(name, sheet.rows.clone())
        })
        .collect();

    Workbook { sheets }
}

/// Replace characters Excel forbids in sheet names and cap the length.
///
/// Excel also rejects names that start or end with an apostrophe, so
/// those are trimmed, before and after truncation.
pub fn sanitize_sheet_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();
    let truncated: String = replaced
        .trim_matches(APOSTROPHE)
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let cleaned = truncated.trim_matches(APOSTROPHE);

    if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Excel compares sheet names case-insensitively.
fn unique_name(base: &str, taken: &mut HashSet<String>) -> String {
    let mut candidate = base.to_string();
    let mut n = 2;
    while !taken.insert(candidate.to_lowercase()) {
        let suffix = format!(" ({n})");
        let room = MAX_SHEET_NAME_LEN - suffix.chars().count();
        let head: String = base.chars().take(room).collect();
        candidate = format!("{}{suffix}", head.trim_start_matches(APOSTROPHE));
        n += 1;
    }
    candidate
}
