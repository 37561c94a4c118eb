//! Workbook merging and sheet export.
//!
//! [`ExcelMerger`] stacks the body rows of every input below the header of
//! the first one. [`SheetExporter`] keeps every input sheet as its own tab.

pub mod export;
pub mod merger;
pub mod model;

pub use export::{ExportSummary, SheetExporter};
pub use merger::{ExcelMergeSummary, ExcelMerger, merge_workbooks};
pub use model::{CellValue, Row, Sheet, Workbook};
