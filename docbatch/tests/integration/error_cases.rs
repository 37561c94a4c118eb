//! Integration tests for error handling and edge cases.

use std::path::PathBuf;

use docbatch::config::{HeaderRows, PartCount};
use docbatch::error::{DocBatchError, ErrorKind};
use docbatch::excel::{ExcelMerger, SheetExporter};
use docbatch::filelist::{FileKind, FileList};
use docbatch::io::writer::temp_path_for;
use docbatch::merge::PdfMerger;
use docbatch::split::PdfSplitter;
use tempfile::TempDir;

use crate::common::{labelled_pdf, write_xlsx};

#[test]
fn test_empty_inputs_are_input_errors_without_output() {
    let dir = TempDir::new().unwrap();
    let pdf_out = dir.path().join("out.pdf");
    let xlsx_out = dir.path().join("out.xlsx");

    let merge = PdfMerger::new().merge(&[], &pdf_out).unwrap_err();
    let split = PdfSplitter::new()
        .split_all(&[], PartCount::new(2).unwrap())
        .unwrap_err();
    let excel = ExcelMerger::new()
        .merge(&[], HeaderRows::default(), &xlsx_out)
        .unwrap_err();
    let export = SheetExporter::new().export(&[], &xlsx_out).unwrap_err();

    for err in [merge, split, excel, export] {
        assert_eq!(err.kind(), ErrorKind::Input);
    }
    assert!(!pdf_out.exists());
    assert!(!xlsx_out.exists());
}

#[test]
fn test_part_count_out_of_range() {
    for parts in [0, 1, 101] {
        let err = PartCount::new(parts).unwrap_err();
        assert!(matches!(err, DocBatchError::InvalidPartCount { .. }));
        assert_eq!(err.kind(), ErrorKind::Input);
    }
}

#[test]
fn test_missing_pdf_aborts_merge() {
    let dir = TempDir::new().unwrap();
    let good = labelled_pdf(&dir, "good.pdf", &[1]);
    let missing = PathBuf::from("/nonexistent/file.pdf");
    let output = dir.path().join("out.pdf");

    let err = PdfMerger::new().merge(&[good, missing], &output).unwrap_err();

    assert!(matches!(err, DocBatchError::FileNotFound { .. }));
    assert!(!output.exists());
    assert!(!temp_path_for(&output).exists());
}

#[test]
fn test_corrupt_workbook_aborts_merge() {
    let dir = TempDir::new().unwrap();
    let good = write_xlsx(&dir, "good.xlsx", &[("S", "a", 10)]);
    let bad = dir.path().join("bad.xlsx");
    std::fs::write(&bad, b"PK not really a zip").unwrap();
    let output = dir.path().join("out.xlsx");

    let err = ExcelMerger::new()
        .merge(&[good, bad.clone()], HeaderRows::default(), &output)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Format);
    assert_eq!(err.path(), Some(bad.as_path()));
    assert!(!output.exists());
}

#[test]
fn test_unsupported_extension_for_workbooks() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("data.csv");
    std::fs::write(&csv, "a,b\n").unwrap();

    let err = ExcelMerger::new()
        .merge(&[csv], HeaderRows::default(), &dir.path().join("out.xlsx"))
        .unwrap_err();

    assert!(matches!(err, DocBatchError::UnsupportedExtension { .. }));
    assert_eq!(err.kind(), ErrorKind::Input);
}

#[test]
fn test_output_into_missing_directory() {
    let dir = TempDir::new().unwrap();
    let a = labelled_pdf(&dir, "a.pdf", &[1]);
    let output = dir.path().join("missing").join("out.pdf");

    let err = PdfMerger::new().merge(&[a], &output).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(!output.exists());
}

#[test]
fn test_move_at_boundaries_is_a_noop() {
    let mut list = FileList::new(FileKind::Pdf);
    list.add(["a.pdf", "b.pdf", "c.pdf"]);
    let original = list.paths();

    assert!(list.select(0));
    assert!(!list.move_up());
    assert!(!list.move_to_top());
    assert_eq!(list.paths(), original);
    assert_eq!(list.current(), Some(0));

    assert!(list.select(2));
    assert!(!list.move_down());
    assert!(!list.move_to_bottom());
    assert_eq!(list.paths(), original);
    assert_eq!(list.current(), Some(2));
}

#[test]
fn test_list_rejects_wrong_kind() {
    let mut pdfs = FileList::new(FileKind::Pdf);
    let rejected = pdfs.add(["book.xlsx", "scan.pdf"]);
    assert_eq!(rejected, vec![PathBuf::from("book.xlsx")]);

    let mut books = FileList::new(FileKind::Excel);
    let rejected = books.add(["scan.pdf", "old.XLS", "new.xlsx"]);
    assert_eq!(rejected, vec![PathBuf::from("scan.pdf")]);
    assert_eq!(books.len(), 2);
}
