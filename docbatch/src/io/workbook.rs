//! Spreadsheet reading and writing.
//!
//! Inputs are read with calamine, choosing the `.xlsx` or `.xls` reader by
//! extension. Outputs are always `.xlsx`, built with rust_xlsxwriter into
//! a buffer and committed atomically.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, Xls, Xlsx, open_workbook};
use log::debug;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet, XlsxError};

use crate::error::{DocBatchError, Result};
use crate::excel::model::{CellValue, Row, Sheet, Workbook};
use crate::filelist::FileKind;
use crate::io::writer::commit_bytes;
use crate::utils::ensure_file;

/// Number format applied to date-time cells in outputs.
pub const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Reads `.xlsx` and `.xls` files into a [`Workbook`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookReader;

impl WorkbookReader {
    /// Create a reader.
    pub fn new() -> Self {
        Self
    }

    /// Read every sheet of the workbook at `path`.
    ///
    /// # Errors
    ///
    /// - [`DocBatchError::UnsupportedExtension`] unless the path ends in
    ///   `.xlsx` or `.xls`
    /// - [`DocBatchError::FileNotFound`] if the file is missing
    /// - [`DocBatchError::FailedToLoadWorkbook`] if it cannot be parsed
    pub fn load(&self, path: &Path) -> Result<Workbook> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let load: fn(&Path) -> Result<Workbook> = match extension.as_deref() {
            Some("xlsx") => read_xlsx,
            Some("xls") => read_xls,
            _ => {
                return Err(DocBatchError::unsupported_extension(
                    path,
                    FileKind::Excel.describe(),
                ));
            }
        };

        ensure_file(path)?;
        let workbook = load(path)?;
        debug!(
            "loaded {} ({} sheets, {} rows)",
            path.display(),
            workbook.sheets.len(),
            workbook.total_rows()
        );
        Ok(workbook)
    }

    /// Read every workbook in order, stopping at the first failure.
    pub fn load_all(&self, paths: &[PathBuf]) -> Result<Vec<Workbook>> {
        paths.iter().map(|path| self.load(path)).collect()
    }
}

fn read_xlsx(path: &Path) -> Result<Workbook> {
    let mut source = open_workbook::<Xlsx<BufReader<File>>, _>(path)
        .map_err(|e| DocBatchError::failed_to_load_workbook(path, e.to_string()))?;
    read_sheets(&mut source, path)
}

fn read_xls(path: &Path) -> Result<Workbook> {
    let mut source = open_workbook::<Xls<BufReader<File>>, _>(path)
        .map_err(|e| DocBatchError::failed_to_load_workbook(path, e.to_string()))?;
    read_sheets(&mut source, path)
}

fn read_sheets<R>(source: &mut R, path: &Path) -> Result<Workbook>
where
    R: Reader<BufReader<File>>,
    R::Error: std::fmt::Display,
{
    let mut sheets = Vec::new();
    for name in source.sheet_names() {
        let range = source
            .worksheet_range(&name)
            .map_err(|e| DocBatchError::failed_to_load_workbook(path, e.to_string()))?;
        sheets.push(Sheet::with_rows(name, absolute_rows(&range)));
    }
    Ok(Workbook { sheets })
}

/// Lay a calamine range out at absolute worksheet positions.
///
/// calamine ranges start at the first used cell; the leading rows and
/// columns are filled with [`CellValue::Empty`]. Trailing empty cells are
/// dropped from each row.
fn absolute_rows(range: &Range<Data>) -> Vec<Row> {
    let Some((first_row, first_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Row> = vec![Vec::new(); first_row as usize];
    for cells in range.rows() {
        let mut row: Row = vec![CellValue::Empty; first_col as usize];
        row.extend(cells.iter().map(cell_value));
        while row.last().is_some_and(|cell| *cell == CellValue::Empty) {
            row.pop();
        }
        rows.push(row);
    }
    rows
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Bool(v) => CellValue::Bool(*v),
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Float(v) => CellValue::Number(*v),
        Data::String(v) => CellValue::Text(v.clone()),
        Data::DateTime(v) => CellValue::DateTime(v.as_f64()),
        Data::DateTimeIso(v) | Data::DurationIso(v) => CellValue::Text(v.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Writes a [`Workbook`] as `.xlsx`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookWriter;

impl WorkbookWriter {
    /// Create a writer.
    pub fn new() -> Self {
        Self
    }

    /// Serialize `workbook` and commit it to `path` atomically.
    ///
    /// Sheet names must already be valid and unique. A workbook without
    /// sheets is written with a single empty `Sheet1`.
    pub fn save(&self, workbook: &Workbook, path: &Path) -> Result<()> {
        let bytes = to_xlsx_bytes(workbook).map_err(|e| {
            DocBatchError::from_write(path, std::io::Error::other(e.to_string()))
        })?;
        commit_bytes(path, &bytes)
    }
}

fn to_xlsx_bytes(workbook: &Workbook) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut output = XlsxWorkbook::new();
    let datetime = Format::new().set_num_format(DATETIME_FORMAT);

    if workbook.sheets.is_empty() {
        output.add_worksheet();
    }

    for sheet in &workbook.sheets {
        let worksheet = output.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_rows(worksheet, &sheet.rows, &datetime)?;
    }

    output.save_to_buffer()
}

fn write_rows(
    worksheet: &mut Worksheet,
    rows: &[Row],
    datetime: &Format,
) -> std::result::Result<(), XlsxError> {
    for (r, row) in rows.iter().enumerate() {
        let r = r as u32;
        for (c, cell) in row.iter().enumerate() {
            let c = c as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(text) => {
                    worksheet.write_string(r, c, text)?;
                }
                CellValue::Number(number) => {
                    worksheet.write_number(r, c, *number)?;
                }
                CellValue::Bool(flag) => {
                    worksheet.write_boolean(r, c, *flag)?;
                }
                CellValue::DateTime(serial) => {
                    worksheet.write_number_with_format(r, c, *serial, datetime)?;
                }
            }
        }
    }
    Ok(())
}
