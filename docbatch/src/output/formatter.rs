//! Message formatting and display.
//!
//! Status lines go to stdout, warnings and errors to stderr so that
//! `--json` reports on stdout stay machine-readable.
//!
//! # Examples
//!
//! ```
//! use docbatch::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Processing files...");
//! formatter.success("Operation completed");
//! formatter.error("Something went wrong");
//! ```

use std::io::{self, IsTerminal};

use crate::config::Config;

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    fn prefix(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "✓ ",
            Self::Warning => "⚠ ",
            Self::Error => "✗ ",
            Self::Debug => "→ ",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "\x1b[32m",
            Self::Warning => "\x1b[33m",
            Self::Error => "\x1b[31m",
            Self::Debug => "\x1b[36m",
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

/// Output formatter with configurable verbosity.
#[derive(Debug, Clone, Copy)]
pub struct OutputFormatter {
    /// Whether to suppress non-error output.
    quiet: bool,
    /// Whether to show verbose output.
    verbose: bool,
    /// Whether to use colored output.
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: Self::should_use_color(),
        }
    }

    /// Create a formatter from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quiet, config.verbose)
    }

    /// Create a quiet formatter (only warnings and errors).
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Create a verbose formatter.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    /// Returns true if stdout is a TTY and TERM is set.
    fn should_use_color() -> bool {
        io::stdout().is_terminal() && std::env::var("TERM").is_ok()
    }

    /// Print an informational message. Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Info, message);
        }
    }

    /// Print a success message. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Success, message);
        }
    }

    /// Print a warning message, even in quiet mode.
    pub fn warning(&self, message: &str) {
        self.print_message(MessageLevel::Warning, message);
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        self.print_message(MessageLevel::Error, message);
    }

    /// Print a debug message. Only displayed in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print_message(MessageLevel::Debug, message);
        }
    }

    fn print_message(&self, level: MessageLevel, message: &str) {
        let line = if self.colored && !level.color().is_empty() {
            format!("{}{}{message}\x1b[0m", level.color(), level.prefix())
        } else {
            format!("{}{message}", level.prefix())
        };

        if level.to_stderr() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    /// Print a section header. Suppressed in quiet mode.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// Print a labelled value. Only shown in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Print a numbered list item. Suppressed in quiet mode.
    pub fn list_item(&self, index: usize, message: &str) {
        if !self.quiet {
            println!("  {index}. {message}");
        }
    }

    /// Print a blank line. Suppressed in quiet mode.
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// True unless in quiet mode.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Check if verbose output should be shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}
