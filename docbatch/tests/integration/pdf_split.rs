//! Integration tests for splitting pages into strips.

use docbatch::config::PartCount;
use docbatch::merge::PageBox;
use docbatch::split::PdfSplitter;
use lopdf::{Document, Object};
use rstest::rstest;
use tempfile::TempDir;

use crate::common::{labelled_pdf, page_labels, write_pdf};

fn crop_boxes(doc: &Document) -> Vec<PageBox> {
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_object(id).and_then(Object::as_dict).unwrap();
            let crop = page.get(b"CropBox").and_then(Object::as_array).unwrap();
            PageBox::from_array(crop).unwrap()
        })
        .collect()
}

#[test]
fn test_split_in_two_halves() {
    let dir = TempDir::new().unwrap();
    let source = write_pdf(&dir, "page.pdf", &[1], 200, 100);

    let summary = PdfSplitter::new()
        .split_file(&source, PartCount::new(2).unwrap())
        .unwrap();

    assert_eq!(summary.output, dir.path().join("page-2a5.pdf"));
    let doc = Document::load(&summary.output).unwrap();
    assert_eq!(
        crop_boxes(&doc),
        vec![
            PageBox::new(0.0, 50.0, 200.0, 100.0),
            PageBox::new(0.0, 0.0, 200.0, 50.0),
        ]
    );
}

#[test]
fn test_split_is_page_major() {
    let dir = TempDir::new().unwrap();
    let source = labelled_pdf(&dir, "three.pdf", &[1, 2, 3]);

    let summary = PdfSplitter::new()
        .split_file(&source, PartCount::new(4).unwrap())
        .unwrap();

    assert_eq!(summary.output_pages, 12);
    assert_eq!(
        page_labels(&summary.output),
        vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3]
    );
}

#[rstest]
#[case(2)]
#[case(3)]
#[case(5)]
fn test_strips_cover_each_page(#[case] parts: u32) {
    let dir = TempDir::new().unwrap();
    let source = write_pdf(&dir, "page.pdf", &[1], 595, 842);

    let summary = PdfSplitter::new()
        .split_file(&source, PartCount::new(parts).unwrap())
        .unwrap();

    let crops = crop_boxes(&Document::load(&summary.output).unwrap());
    assert_eq!(crops.len(), parts as usize);

    let covered: f64 = crops.iter().map(PageBox::height).sum();
    assert!((covered - 842.0).abs() < 1e-2);
    for crop in &crops {
        assert_eq!(crop.width(), 595.0);
    }
}

#[test]
fn test_split_leaves_source_untouched() {
    let dir = TempDir::new().unwrap();
    let source = labelled_pdf(&dir, "doc.pdf", &[7, 8]);
    let before = std::fs::read(&source).unwrap();

    PdfSplitter::new()
        .split_file(&source, PartCount::new(2).unwrap())
        .unwrap();

    assert_eq!(std::fs::read(&source).unwrap(), before);
}

#[test]
fn test_batch_split_continues_past_bad_file() {
    let dir = TempDir::new().unwrap();
    let good = labelled_pdf(&dir, "good.pdf", &[1]);
    let bad = dir.path().join("bad.pdf");
    std::fs::write(&bad, b"not a pdf").unwrap();
    let later = labelled_pdf(&dir, "later.pdf", &[2, 3]);

    let report = PdfSplitter::new()
        .split_all(&[good, bad.clone(), later], PartCount::new(2).unwrap())
        .unwrap();

    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].path, bad);
    assert!(!dir.path().join("bad-2a5.pdf").exists());
    assert!(dir.path().join("later-2a5.pdf").exists());
}

#[tokio::test]
async fn test_parallel_split_matches_sequential() {
    let dir = TempDir::new().unwrap();
    let sequential_out = TempDir::new().unwrap();
    let parallel_out = TempDir::new().unwrap();
    let files: Vec<_> = (1..=4)
        .map(|n| labelled_pdf(&dir, &format!("f{n}.pdf"), &vec![n; n as usize]))
        .collect();
    let parts = PartCount::new(3).unwrap();

    let sequential = PdfSplitter::new()
        .with_output_dir(sequential_out.path())
        .split_all(&files, parts)
        .unwrap();
    let parallel = PdfSplitter::new()
        .with_output_dir(parallel_out.path())
        .split_all_parallel(&files, parts, 4)
        .await
        .unwrap();

    let pages = |report: &docbatch::split::SplitReport| -> Vec<usize> {
        report.succeeded.iter().map(|s| s.output_pages).collect()
    };
    assert_eq!(pages(&sequential), pages(&parallel));
    for (s, p) in sequential.succeeded.iter().zip(&parallel.succeeded) {
        assert_eq!(page_labels(&s.output), page_labels(&p.output));
    }
}
