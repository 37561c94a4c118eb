//! CLI argument parsing for docbatch.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, input collection, and conversion into a
//! validated [`Config`].

use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use docbatch::config::{
    CompressionLevel, Config, DEFAULT_HEADER_ROWS, DedupPolicy, HeaderRows, Operation,
    OverwriteMode, PartCount,
};
use docbatch::error::{DocBatchError, Result};
use docbatch::naming::collect_paths_for_patterns;

/// Batch-merge PDFs, split PDF pages into strips, and merge Excel workbooks.
#[derive(Parser, Debug)]
#[command(name = "docbatch")]
#[command(version)]
#[command(about = "Batch PDF and Excel merging and splitting", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Which occurrence of a repeated input survives
    ///
    /// - keep-last: a repeated file is processed at its last position (default)
    /// - keep-first: a repeated file is processed at its first position
    #[arg(long, global = true, value_name = "POLICY", default_value = "keep-last")]
    #[arg(value_parser = ["keep-last", "keep-first"])]
    pub dedup: String,

    /// Dry run - validate inputs and show what would be done without creating output
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Verbose output - show detailed information about each file
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Overwrite existing output files without confirmation
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Never overwrite existing output files
    #[arg(long, global = true, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Print the result report as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,
}

/// Input files shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Input files, in processing order (glob patterns are expanded)
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Read additional input paths from a file (one path per line)
    ///
    /// Empty lines and lines starting with '#' are ignored. Paths from
    /// the file are appended after the positional inputs.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,
}

/// The operation to run.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Concatenate PDFs into one document, in list order
    MergePdf {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE", required_unless_present = "print")]
        output: Option<PathBuf>,

        /// Compression level for the output PDF
        #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
        #[arg(value_parser = ["none", "standard", "maximum"])]
        compression: String,

        /// Open the result for printing (writes a timestamped file if -o is omitted)
        #[arg(short, long)]
        print: bool,
    },

    /// Cut every page of each PDF into horizontal strips
    ///
    /// Each input `name.pdf` produces `name-{N}a5.pdf`, whose pages are the
    /// strips of the source pages, top to bottom.
    SplitPdf {
        #[command(flatten)]
        inputs: InputArgs,

        /// Number of strips per page (2 to 100)
        #[arg(short, long, value_name = "N", default_value_t = 2)]
        parts: u32,

        /// Write outputs into this directory instead of next to each source
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Number of files split concurrently
        #[arg(short, long, value_name = "N")]
        jobs: Option<usize>,

        /// Compression level for the output PDFs
        #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
        #[arg(value_parser = ["none", "standard", "maximum"])]
        compression: String,
    },

    /// Merge workbooks into one sheet below the first workbook's header rows
    MergeExcel {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output .xlsx file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Rows of the first workbook copied as the header block
        #[arg(long, value_name = "N", default_value_t = DEFAULT_HEADER_ROWS)]
        header_rows: u32,
    },

    /// Copy every sheet of every workbook into one workbook
    ExportExcel {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output .xlsx file path
        #[arg(short, long, value_name = "FILE", required_unless_present = "print")]
        output: Option<PathBuf>,

        /// Open the result for printing (writes a timestamped file if -o is omitted)
        #[arg(short, long)]
        print: bool,
    },
}

impl Command {
    fn inputs(&self) -> &InputArgs {
        match self {
            Self::MergePdf { inputs, .. }
            | Self::SplitPdf { inputs, .. }
            | Self::MergeExcel { inputs, .. }
            | Self::ExportExcel { inputs, .. } => inputs,
        }
    }
}

impl Cli {
    /// All input paths: expanded positional patterns, then `--input-list`.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid or the list cannot be read.
    pub fn collect_inputs(&self) -> Result<Vec<PathBuf>> {
        let args = self.command.inputs();
        let mut all_inputs = collect_paths_for_patterns(&args.inputs)?;

        if let Some(ref input_list_path) = args.input_list {
            all_inputs.extend(read_input_list(input_list_path)?);
        }

        Ok(all_inputs)
    }

    /// Convert CLI arguments and the collected inputs into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if an option value is invalid or
    /// [`Config::validate`] fails.
    pub fn to_config(&self, inputs: Vec<PathBuf>) -> Result<Config> {
        let mut compression = CompressionLevel::default();
        let mut jobs = None;
        let mut print = false;

        let (operation, output) = match &self.command {
            Command::MergePdf {
                output,
                compression: level,
                print: p,
                ..
            } => {
                compression = CompressionLevel::from_str(level)?;
                print = *p;
                (Operation::MergePdf, output.clone())
            }
            Command::SplitPdf {
                parts,
                output_dir,
                jobs: j,
                compression: level,
                ..
            } => {
                compression = CompressionLevel::from_str(level)?;
                jobs = *j;
                let parts = PartCount::new(*parts)?;
                (Operation::SplitPdf { parts }, output_dir.clone())
            }
            Command::MergeExcel {
                output,
                header_rows,
                ..
            } => (
                Operation::MergeExcel {
                    header_rows: HeaderRows::new(*header_rows),
                },
                Some(output.clone()),
            ),
            Command::ExportExcel {
                output, print: p, ..
            } => {
                print = *p;
                (Operation::ExportExcelSheets, output.clone())
            }
        };

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            operation,
            inputs,
            output,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            overwrite_mode,
            compression,
            dedup: DedupPolicy::from_str(&self.dedup)?,
            jobs,
            print,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Read input paths from a file, one per line.
///
/// Lines starting with '#' are comments. Empty lines are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_input_list(path: &Path) -> Result<Vec<PathBuf>> {
    let read_error = |source: std::io::Error| DocBatchError::FailedToReadInputList {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(read_error)?;
    let mut paths = Vec::new();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(read_error)?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.contains('\0') {
            return Err(DocBatchError::InvalidInputList {
                path: path.to_path_buf(),
                line_number: index + 1,
                details: "Path contains a NUL byte".to_string(),
            });
        }

        paths.push(PathBuf::from(line));
    }

    Ok(paths)
}
