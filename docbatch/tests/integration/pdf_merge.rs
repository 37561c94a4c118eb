//! Integration tests for PDF merging.

use docbatch::config::{CompressionLevel, DedupPolicy};
use docbatch::filelist::{FileKind, FileList};
use docbatch::merge::PdfMerger;
use rstest::rstest;
use tempfile::TempDir;

use crate::common::{labelled_pdf, page_labels, write_pdf};

#[test]
fn test_merge_preserves_page_order() {
    let dir = TempDir::new().unwrap();
    let a = labelled_pdf(&dir, "a.pdf", &[1, 2]);
    let b = labelled_pdf(&dir, "b.pdf", &[3]);
    let output = dir.path().join("merged.pdf");

    let summary = PdfMerger::new().merge(&[a, b], &output).unwrap();

    assert_eq!(summary.files_merged, 2);
    assert_eq!(summary.total_pages, 3);
    assert_eq!(page_labels(&output), vec![1, 2, 3]);
}

#[rstest]
#[case(CompressionLevel::None)]
#[case(CompressionLevel::Standard)]
#[case(CompressionLevel::Maximum)]
fn test_merge_with_each_compression_level(#[case] compression: CompressionLevel) {
    let dir = TempDir::new().unwrap();
    let a = labelled_pdf(&dir, "a.pdf", &[1]);
    let b = labelled_pdf(&dir, "b.pdf", &[2, 3]);
    let output = dir.path().join("merged.pdf");

    PdfMerger::with_compression(compression)
        .merge(&[a, b], &output)
        .unwrap();

    assert_eq!(page_labels(&output), vec![1, 2, 3]);
}

#[test]
fn test_merge_keeps_page_geometry() {
    let dir = TempDir::new().unwrap();
    let wide = write_pdf(&dir, "wide.pdf", &[1], 842, 595);
    let tall = write_pdf(&dir, "tall.pdf", &[2], 595, 842);
    let output = dir.path().join("merged.pdf");

    PdfMerger::new().merge(&[wide, tall], &output).unwrap();

    let doc = lopdf::Document::load(&output).unwrap();
    let sizes: Vec<(f64, f64)> = doc
        .get_pages()
        .values()
        .map(|&id| {
            let media = docbatch::merge::pages::media_box(&doc, id).unwrap();
            (media.width(), media.height())
        })
        .collect();
    assert_eq!(sizes, vec![(842.0, 595.0), (595.0, 842.0)]);
}

#[test]
fn test_merge_after_dedupe_keeps_last_occurrence() {
    let dir = TempDir::new().unwrap();
    let a = labelled_pdf(&dir, "a.pdf", &[1]);
    let b = labelled_pdf(&dir, "b.pdf", &[2]);
    let output = dir.path().join("merged.pdf");

    let mut list = FileList::new(FileKind::Pdf);
    list.add([a.clone(), b, a]);
    list.dedupe_in_place(DedupPolicy::KeepLast);

    PdfMerger::new().merge(&list.paths(), &output).unwrap();

    assert_eq!(page_labels(&output), vec![2, 1]);
}

#[test]
fn test_merge_reordered_list() {
    let dir = TempDir::new().unwrap();
    let a = labelled_pdf(&dir, "a.pdf", &[1]);
    let b = labelled_pdf(&dir, "b.pdf", &[2]);
    let c = labelled_pdf(&dir, "c.pdf", &[3]);
    let output = dir.path().join("merged.pdf");

    let mut list = FileList::new(FileKind::Pdf);
    list.add([a, b, c]);
    assert!(list.select(2));
    assert!(list.move_to_top());

    PdfMerger::new().merge(&list.paths(), &output).unwrap();

    assert_eq!(page_labels(&output), vec![3, 1, 2]);
}

#[test]
fn test_merged_output_can_be_merged_again() {
    let dir = TempDir::new().unwrap();
    let a = labelled_pdf(&dir, "a.pdf", &[1, 2]);
    let b = labelled_pdf(&dir, "b.pdf", &[3]);
    let first = dir.path().join("first.pdf");
    let second = dir.path().join("second.pdf");

    PdfMerger::new().merge(&[a, b.clone()], &first).unwrap();
    PdfMerger::new().merge(&[first, b], &second).unwrap();

    assert_eq!(page_labels(&second), vec![1, 2, 3, 3]);
}
