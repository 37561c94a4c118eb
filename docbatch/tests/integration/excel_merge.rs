//! Integration tests for workbook merging and sheet export.

use docbatch::config::HeaderRows;
use docbatch::excel::{ExcelMerger, SheetExporter};
use docbatch::io::WorkbookReader;
use tempfile::TempDir;

use crate::common::{first_column, write_xls, write_xlsx};

#[test]
fn test_merge_keeps_first_header_and_all_body_rows() {
    let dir = TempDir::new().unwrap();
    let a = write_xlsx(&dir, "a.xlsx", &[("Report", "A", 10)]);
    let b = write_xlsx(&dir, "b.xlsx", &[("Report", "B", 9)]);
    let output = dir.path().join("merged.xlsx");

    let summary = ExcelMerger::new()
        .merge(&[a, b], HeaderRows::default(), &output)
        .unwrap();

    assert_eq!(summary.total_rows(), 11);
    assert_eq!(summary.sheet_name, "Report");
    assert_eq!(
        first_column(&output),
        vec!["A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8", "A9", "A10", "B9"]
    );
}

#[test]
fn test_merge_legacy_xls_with_xlsx() {
    let dir = TempDir::new().unwrap();
    let legacy = write_xls(&dir, "legacy.xls", "Ledger", "L", 4);
    let modern = write_xlsx(&dir, "modern.xlsx", &[("Ledger", "M", 4)]);
    let output = dir.path().join("merged.xlsx");

    let summary = ExcelMerger::new()
        .merge(&[legacy, modern], HeaderRows::new(2), &output)
        .unwrap();

    assert_eq!(summary.sheet_name, "Ledger");
    assert_eq!(summary.header_rows, 2);
    assert_eq!(
        first_column(&output),
        vec!["L1", "L2", "L3", "L4", "M3", "M4"]
    );
}

#[test]
fn test_xls_and_xlsx_read_the_same_rows() {
    let dir = TempDir::new().unwrap();
    let legacy = write_xls(&dir, "same.xls", "Data", "r", 5);
    let modern = write_xlsx(&dir, "same.xlsx", &[("Data", "r", 5)]);
    let reader = WorkbookReader::new();

    let from_xls = reader.load(&legacy).unwrap();
    let from_xlsx = reader.load(&modern).unwrap();

    assert_eq!(from_xls.sheets.len(), 1);
    assert_eq!(from_xls.sheets[0].name, "Data");
    assert_eq!(from_xls.sheets[0].rows, from_xlsx.sheets[0].rows);
}

#[test]
fn test_merge_reads_every_sheet() {
    let dir = TempDir::new().unwrap();
    let a = write_xlsx(&dir, "a.xlsx", &[("One", "P", 3), ("Two", "Q", 4)]);
    let output = dir.path().join("merged.xlsx");

    ExcelMerger::new()
        .merge(&[a], HeaderRows::new(2), &output)
        .unwrap();

    assert_eq!(first_column(&output), vec!["P1", "P2", "P3", "Q3", "Q4"]);
}

#[test]
fn test_merge_writes_single_sheet() {
    let dir = TempDir::new().unwrap();
    let a = write_xlsx(&dir, "a.xlsx", &[("X", "a", 9), ("Y", "b", 9)]);
    let output = dir.path().join("merged.xlsx");

    ExcelMerger::new()
        .merge(&[a], HeaderRows::default(), &output)
        .unwrap();

    let merged = WorkbookReader::new().load(&output).unwrap();
    assert_eq!(merged.sheets.len(), 1);
}

#[test]
fn test_export_one_sheet_per_input_sheet() {
    let dir = TempDir::new().unwrap();
    let sales = write_xlsx(&dir, "sales.xlsx", &[("Jan", "s", 2), ("Feb", "t", 1)]);
    let costs = write_xlsx(&dir, "costs.xlsx", &[("Jan", "c", 3)]);
    let output = dir.path().join("export.xlsx");

    let summary = SheetExporter::new().export(&[sales, costs], &output).unwrap();

    assert_eq!(summary.sheets, vec!["sales_Jan", "sales_Feb", "costs_Jan"]);
    assert_eq!(summary.total_rows, 6);

    let exported = WorkbookReader::new().load(&output).unwrap();
    let names: Vec<&str> = exported.sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["sales_Jan", "sales_Feb", "costs_Jan"]);
    assert_eq!(exported.sheets[2].row_count(), 3);
}
