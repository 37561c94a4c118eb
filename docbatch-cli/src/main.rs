//! docbatch - Batch PDF and Excel merging and splitting.

mod cli;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, bail};
use clap::Parser;
use serde::Serialize;

use crate::cli::Cli;
use docbatch::config::{Config, Operation, OverwriteMode, PartCount};
use docbatch::error::DocBatchError;
use docbatch::excel::{ExcelMerger, SheetExporter};
use docbatch::filelist::FileList;
use docbatch::merge::PdfMerger;
use docbatch::naming::timestamped_output_path;
use docbatch::output::{
    OutputFormatter, display_excel_merge_summary, display_export_summary, display_merge_summary,
    display_split_report, display_validation_summary, to_json,
};
use docbatch::print::{PrintTrigger, SystemViewer};
use docbatch::split::PdfSplitter;
use docbatch::validation::Validator;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        let code = err
            .downcast_ref::<DocBatchError>()
            .map_or(1, DocBatchError::exit_code);
        process::exit(code);
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> anyhow::Result<()> {
    let inputs = cli.collect_inputs()?;
    let config = cli.to_config(inputs)?;
    log::debug!("{config:?}");

    let formatter = if cli.json {
        OutputFormatter::quiet()
    } else {
        OutputFormatter::from_config(&config)
    };

    let files = prepare_files(&config, &formatter)?;

    if config.dry_run {
        return dry_run(&config, &files, &formatter, cli.json);
    }

    match config.operation {
        Operation::MergePdf => {
            let output = resolve_output(&config)?;
            handle_output_overwrite(&output, config.overwrite_mode, &formatter)?;

            formatter.info(&format!("Merging {} PDF file(s)...", files.len()));
            let summary = PdfMerger::with_compression(config.compression).merge(&files, &output)?;

            report(cli.json, &summary, |s| display_merge_summary(&formatter, s))?;
            print_output(&config, &output, &formatter);
        }
        Operation::SplitPdf { parts } => split(&config, &files, parts, &formatter, cli.json).await?,
        Operation::MergeExcel { header_rows } => {
            let output = resolve_output(&config)?;
            handle_output_overwrite(&output, config.overwrite_mode, &formatter)?;

            formatter.info(&format!("Merging {} workbook(s)...", files.len()));
            let summary = ExcelMerger::new().merge(&files, header_rows, &output)?;

            report(cli.json, &summary, |s| {
                display_excel_merge_summary(&formatter, s)
            })?;
        }
        Operation::ExportExcelSheets => {
            let output = resolve_output(&config)?;
            handle_output_overwrite(&output, config.overwrite_mode, &formatter)?;

            formatter.info(&format!("Exporting sheets of {} workbook(s)...", files.len()));
            let summary = SheetExporter::new().export(&files, &output)?;

            report(cli.json, &summary, |s| display_export_summary(&formatter, s))?;
            print_output(&config, &output, &formatter);
        }
    }

    Ok(())
}

/// Build the file list: drop unsupported paths, then collapse duplicates.
fn prepare_files(config: &Config, formatter: &OutputFormatter) -> Result<Vec<PathBuf>, DocBatchError> {
    let kind = config.operation.file_kind();
    let mut list = FileList::new(kind);

    for rejected in list.add(config.inputs().iter().cloned()) {
        formatter.warning(&format!(
            "Ignoring {}: not a {} file ({})",
            rejected.display(),
            kind,
            kind.describe()
        ));
    }

    list.dedupe_in_place(config.dedup);
    for entry in list.entries() {
        formatter.debug(&entry.label());
    }

    if list.is_empty() {
        return Err(DocBatchError::NoFilesSelected);
    }
    Ok(list.paths())
}

/// Where a single-output operation writes: `-o`, or a timestamped name
/// in the working directory when printing.
fn resolve_output(config: &Config) -> Result<PathBuf, DocBatchError> {
    match &config.output {
        Some(output) => Ok(output.clone()),
        None if config.print => Ok(timestamped_output_path(
            Path::new("."),
            config.operation.output_extension(),
            chrono::Local::now(),
        )),
        None => Err(DocBatchError::invalid_config("An output path is required")),
    }
}

fn report<T: Serialize>(json: bool, summary: &T, display: impl FnOnce(&T)) -> anyhow::Result<()> {
    if json {
        println!("{}", to_json(summary)?);
    } else {
        display(summary);
    }
    Ok(())
}

fn print_output(config: &Config, output: &Path, formatter: &OutputFormatter) {
    if config.print {
        let outcome = SystemViewer.print(output);
        formatter.info(&format!("{}: {outcome}", output.display()));
    }
}

async fn split(
    config: &Config,
    files: &[PathBuf],
    parts: PartCount,
    formatter: &OutputFormatter,
    json: bool,
) -> anyhow::Result<()> {
    let mut splitter = PdfSplitter::new().with_compression(config.compression);
    if let Some(dir) = &config.output {
        splitter = splitter.with_output_dir(dir);
    }

    let existing: Vec<PathBuf> = files
        .iter()
        .map(|file| splitter.output_path_for(file, parts))
        .filter(|output| output.exists())
        .collect();

    match config.overwrite_mode {
        OverwriteMode::Force => {}
        OverwriteMode::NoClobber => splitter = splitter.no_clobber(true),
        OverwriteMode::Prompt => {
            if let Some(first) = existing.first() {
                let subject = if existing.len() == 1 {
                    first.display().to_string()
                } else {
                    format!("{} and {} more", first.display(), existing.len() - 1)
                };
                confirm_overwrite(&subject, formatter)?;
            }
        }
    }

    let jobs = config.effective_jobs();
    formatter.info(&format!(
        "Splitting {} PDF file(s) into {parts} parts per page...",
        files.len()
    ));

    let report_data = if jobs > 1 {
        splitter.split_all_parallel(files, parts, jobs).await?
    } else {
        splitter.split_all(files, parts)?
    };

    report(json, &report_data, |r| display_split_report(formatter, r))?;

    if !report_data.is_success() {
        bail!(
            "{} of {} file(s) could not be split",
            report_data.failed.len(),
            files.len()
        );
    }
    Ok(())
}

fn dry_run(
    config: &Config,
    files: &[PathBuf],
    formatter: &OutputFormatter,
    json: bool,
) -> anyhow::Result<()> {
    let validator = Validator::new();
    let kind = config.operation.file_kind();
    // Splits skip bad files; merges abort on them.
    let continue_on_error = matches!(config.operation, Operation::SplitPdf { .. });

    formatter.info("Validating input files...");
    let summary = validator
        .validate_files(kind, files, continue_on_error)
        .context("Dry run failed")?;

    if !matches!(config.operation, Operation::SplitPdf { .. }) {
        let output = resolve_output(config)?;
        validator.validate_output(&output, config.overwrite_mode)?;
        formatter.info(&format!("Output would be: {}", output.display()));
    }

    report(json, &summary, |s| display_validation_summary(formatter, s))?;
    formatter.success("Dry run completed successfully");
    Ok(())
}

/// Handle output file overwrite scenarios.
fn handle_output_overwrite(
    output: &Path,
    mode: OverwriteMode,
    formatter: &OutputFormatter,
) -> Result<(), DocBatchError> {
    if !output.exists() {
        return Ok(());
    }

    match mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(DocBatchError::output_exists(output)),
        OverwriteMode::Prompt => confirm_overwrite(&output.display().to_string(), formatter),
    }
}

fn confirm_overwrite(subject: &str, formatter: &OutputFormatter) -> Result<(), DocBatchError> {
    use std::io::{self, Write};

    // In quiet mode, treat as no-clobber
    if formatter.is_quiet() {
        return Err(DocBatchError::output_exists(subject));
    }

    formatter.warning(&format!("Output file already exists: {subject}"));
    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response)?;

    let response = response.trim().to_lowercase();
    if response == "y" || response == "yes" {
        Ok(())
    } else {
        Err(DocBatchError::Cancelled)
    }
}
