//! Output formatting and display for docbatch.
//!
//! Human-readable renderings of validation results and operation
//! summaries. Every report type is also `Serialize` for `--json`.
//!
//! # Examples
//!
//! ```no_run
//! use docbatch::output::OutputFormatter;
//! use docbatch::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting merge operation");
//! formatter.success("Merge completed successfully");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use serde::Serialize;

use crate::error::{DocBatchError, Result};
use crate::excel::{ExcelMergeSummary, ExportSummary};
use crate::merge::MergeSummary;
use crate::split::SplitReport;
use crate::utils::format_file_size;
use crate::validation::{Contents, ValidationSummary};

/// Render any report as pretty JSON.
pub fn to_json<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| DocBatchError::Io {
        source: std::io::Error::other(e),
    })
}

/// Display validation summary to the user.
pub fn display_validation_summary(formatter: &OutputFormatter, summary: &ValidationSummary) {
    for failure in &summary.failures {
        formatter.warning(&format!(
            "Skipping {}: {}",
            failure.path.display(),
            failure.message
        ));
    }

    for (index, result) in summary.results.iter().enumerate() {
        let name = result.path.display();
        let description = match &result.contents {
            Contents::Pdf {
                page_count,
                page_dimensions: Some((width, height)),
                ..
            } => format!("{name}: {page_count} pages, {width:.0}×{height:.0} pt"),
            Contents::Pdf { page_count, .. } => format!("{name}: {page_count} pages"),
            Contents::Excel { sheets, row_count } => {
                format!("{name}: {} sheets, {row_count} rows", sheets.len())
            }
        };
        formatter.list_item(index + 1, &description);
    }

    formatter.info(&format!(
        "Validated {} file(s), {}",
        summary.files_validated(),
        summary.format_total_size()
    ));
}

/// Display the outcome of a PDF merge.
pub fn display_merge_summary(formatter: &OutputFormatter, summary: &MergeSummary) {
    formatter.success(&format!(
        "Merged {} file(s) into {} ({} pages, {})",
        summary.files_merged,
        summary.output.display(),
        summary.total_pages,
        format_file_size(summary.output_size)
    ));
    formatter.detail("Input size", &format_file_size(summary.input_size));
    formatter.detail(
        "Load time",
        &format!("{:.2}s", summary.load_time.as_secs_f64()),
    );
    formatter.detail(
        "Total time",
        &format!("{:.2}s", summary.merge_time.as_secs_f64()),
    );
}

/// Display the per-file outcome of a batch split.
pub fn display_split_report(formatter: &OutputFormatter, report: &SplitReport) {
    for summary in &report.succeeded {
        formatter.success(&format!(
            "{} → {} ({} pages)",
            summary.source.display(),
            summary.output.display(),
            summary.output_pages
        ));
    }
    for failure in &report.failed {
        formatter.error(&format!(
            "{}: {}",
            failure.path.display(),
            failure.message
        ));
    }
    formatter.info(&format!(
        "Split {} file(s), {} failed",
        report.succeeded.len(),
        report.failed.len()
    ));
}

/// Display the outcome of a workbook merge.
pub fn display_excel_merge_summary(formatter: &OutputFormatter, summary: &ExcelMergeSummary) {
    formatter.success(&format!(
        "Merged {} workbook(s) into {} ({} rows)",
        summary.files_merged,
        summary.output.display(),
        summary.total_rows()
    ));
    formatter.detail("Sheet", &summary.sheet_name);
    formatter.detail("Header rows", &summary.header_rows.to_string());
    formatter.detail("Body rows", &summary.body_rows.to_string());
}

/// Display the outcome of a sheet export.
pub fn display_export_summary(formatter: &OutputFormatter, summary: &ExportSummary) {
    formatter.success(&format!(
        "Exported {} sheet(s) from {} workbook(s) into {}",
        summary.sheets.len(),
        summary.files_exported,
        summary.output.display()
    ));
    for (index, name) in summary.sheets.iter().enumerate() {
        formatter.debug(&format!("{}. {name}", index + 1));
    }
}
