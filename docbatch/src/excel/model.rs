//! In-memory workbook model.
//!
//! Workbooks are read fully into these types and outputs are built from
//! them. Rows sit at absolute positions: `rows[0]` is worksheet row 1 and
//! `row[0]` is column A.

use serde::Serialize;

/// A single cell's value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    /// No value.
    Empty,
    /// A string.
    Text(String),
    /// Any numeric value.
    Number(f64),
    /// A boolean.
    Bool(bool),
    /// An Excel serial date-time.
    DateTime(f64),
}

impl CellValue {
    /// Empty cells and empty strings are blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// One worksheet row.
pub type Row = Vec<CellValue>;

/// Whether every cell of `row` is blank. An empty row is blank.
pub fn is_blank_row(row: &[CellValue]) -> bool {
    row.iter().all(CellValue::is_blank)
}

/// A named worksheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sheet {
    /// Tab name.
    pub name: String,
    /// Rows from worksheet row 1 onwards.
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Create a sheet with the given rows.
    pub fn with_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Number of rows up to the last stored row.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// An ordered collection of sheets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Workbook {
    /// Sheets in tab order.
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// First sheet, if any.
    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    /// Total rows across every sheet.
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(Sheet::row_count).sum()
    }
}
