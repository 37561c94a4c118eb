//! Stacking workbook rows into a single sheet below a shared header.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, info};
use serde::Serialize;

use crate::config::HeaderRows;
use crate::error::{DocBatchError, Result};
use crate::excel::model::{Row, Sheet, Workbook, is_blank_row};
use crate::io::{WorkbookReader, WorkbookWriter};

/// Name of the output sheet when the header source has no sheets.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Outcome of a successful workbook merge.
#[derive(Debug, Clone, Serialize)]
pub struct ExcelMergeSummary {
    /// Where the merged workbook was written.
    pub output: PathBuf,
    /// Number of workbooks merged.
    pub files_merged: usize,
    /// Name of the single output sheet.
    pub sheet_name: String,
    /// Rows in the header block.
    pub header_rows: usize,
    /// Body rows appended below the header.
    pub body_rows: usize,
    /// Total time taken.
    #[serde(skip)]
    pub merge_time: Duration,
}

impl ExcelMergeSummary {
    /// Header plus body rows.
    pub fn total_rows(&self) -> usize {
        self.header_rows + self.body_rows
    }
}

/// Merges workbooks into one sheet: the first file's header, then every
/// non-blank body row of every sheet of every file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelMerger {
    reader: WorkbookReader,
    writer: WorkbookWriter,
}

impl ExcelMerger {
    /// Create a merger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `files` into a single-sheet `.xlsx` at `output`.
    ///
    /// # Errors
    ///
    /// - [`DocBatchError::NoFilesSelected`] if `files` is empty
    /// - Any load error, naming the file; nothing is written
    /// - Write errors for `output`
    pub fn merge(
        &self,
        files: &[PathBuf],
        header_rows: HeaderRows,
        output: &Path,
    ) -> Result<ExcelMergeSummary> {
        if files.is_empty() {
            return Err(DocBatchError::NoFilesSelected);
        }

        let start = Instant::now();
        let workbooks = self.reader.load_all(files)?;

        let sheet = merge_workbooks(&workbooks, header_rows);
        let body_rows = sheet.row_count() - header_rows.as_usize();
        let sheet_name = sheet.name.clone();

        self.writer.save(
            &Workbook {
                sheets: vec![sheet],
            },
            output,
        )?;

        info!(
            "merged {} workbooks ({body_rows} body rows) into {}",
            files.len(),
            output.display()
        );

        Ok(ExcelMergeSummary {
            output: output.to_path_buf(),
            files_merged: files.len(),
            sheet_name,
            header_rows: header_rows.as_usize(),
            body_rows,
            merge_time: start.elapsed(),
        })
    }
}

/// Build the merged sheet from already loaded workbooks.
///
/// The result always starts with exactly `header_rows` rows.
pub fn merge_workbooks(workbooks: &[Workbook], header_rows: HeaderRows) -> Sheet {
    let header_len = header_rows.as_usize();
    let first_sheet = workbooks.first().and_then(Workbook::first_sheet);

    let name = first_sheet
        .map(|sheet| sheet.name.clone())
        .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string());

    let mut rows: Vec<Row> = first_sheet
        .map(|sheet| sheet.rows.iter().take(header_len).cloned().collect())
        .unwrap_or_default();
    rows.resize(header_len, Row::new());

    for workbook in workbooks {
        for sheet in &workbook.sheets {
            let before = rows.len();
            rows.extend(
                sheet
                    .rows
                    .iter()
                    .skip(header_len)
                    .filter(|row| !is_blank_row(row))
                    .cloned(),
            );
            debug!("sheet '{}': {} body rows", sheet.name, rows.len() - before);
        }
    }

    Sheet::with_rows(name, rows)
}
