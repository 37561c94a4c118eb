//! Fixture builders shared by the integration tests.
//!
//! Every fixture is generated on the fly inside a [`TempDir`], so the
//! tests need nothing checked into the repository. Legacy `.xls`
//! fixtures come from the small BIFF8 writer in [`xls`].

#![allow(dead_code)]

mod xls;

pub use xls::write_xls;

use std::path::PathBuf;

use lopdf::{Document, Object, dictionary};
use tempfile::TempDir;

/// Write a PDF with one page per entry of `labels`, each `width × height`
/// points and tagged with a `/Label` integer.
pub fn write_pdf(dir: &TempDir, name: &str, labels: &[i64], width: i64, height: i64) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = labels
        .iter()
        .map(|&label| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
                "Label" => label,
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => labels.len() as i64,
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.path().join(name);
    doc.save(&path).expect("Failed to write PDF fixture");
    path
}

/// Letter-sized PDF with the given page labels.
pub fn labelled_pdf(dir: &TempDir, name: &str, labels: &[i64]) -> PathBuf {
    write_pdf(dir, name, labels, 612, 792)
}

/// Page labels of the PDF at `path`, in page order.
pub fn page_labels(path: &std::path::Path) -> Vec<i64> {
    let doc = Document::load(path).expect("Failed to reload PDF");
    doc.get_pages()
        .values()
        .map(|&id| {
            doc.get_object(id)
                .and_then(Object::as_dict)
                .and_then(|page| page.get(b"Label"))
                .and_then(Object::as_i64)
                .expect("page without /Label")
        })
        .collect()
}

/// Write an `.xlsx` whose sheets hold text cells `"{prefix}{row}"` in
/// column A, rows numbered from 1.
pub fn write_xlsx(dir: &TempDir, name: &str, sheets: &[(&str, &str, u32)]) -> PathBuf {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    for &(sheet_name, prefix, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name).expect("Invalid sheet name");
        for row in 0..rows {
            sheet
                .write_string(row, 0, format!("{prefix}{}", row + 1))
                .expect("Failed to write cell");
        }
    }

    let path = dir.path().join(name);
    workbook.save(&path).expect("Failed to write workbook fixture");
    path
}

/// Column A of the first sheet of the workbook at `path`.
pub fn first_column(path: &std::path::Path) -> Vec<String> {
    use docbatch::excel::CellValue;
    use docbatch::io::WorkbookReader;

    let workbook = WorkbookReader::new().load(path).expect("Failed to reload workbook");
    workbook.sheets[0]
        .rows
        .iter()
        .map(|row| match row.first() {
            Some(CellValue::Text(text)) => text.clone(),
            _ => String::new(),
        })
        .collect()
}
