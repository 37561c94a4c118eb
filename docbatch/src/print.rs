//! Handing generated files to the user for printing.
//!
//! Printing is best effort: a trigger reports what happened but never
//! fails, so a successfully generated file is never turned into an error.

use std::fmt;
use std::path::Path;
use std::process::Command;

use log::{debug, warn};
use serde::Serialize;

/// What a [`PrintTrigger`] did with a generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PrintOutcome {
    /// The file was opened in the platform's default application.
    Opened,
    /// The file was generated but must be printed by hand.
    ManualPrintRequired {
        /// Why it was not opened.
        reason: String,
    },
}

impl fmt::Display for PrintOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opened => write!(f, "opened in the default viewer"),
            Self::ManualPrintRequired { reason } => {
                write!(f, "file generated, print manually ({reason})")
            }
        }
    }
}

/// Something that can present a generated file for printing.
pub trait PrintTrigger {
    /// Present `path` for printing.
    fn print(&self, path: &Path) -> PrintOutcome;
}

/// Never opens anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualPrint;

impl PrintTrigger for ManualPrint {
    fn print(&self, _path: &Path) -> PrintOutcome {
        PrintOutcome::ManualPrintRequired {
            reason: "automatic printing is not enabled".to_string(),
        }
    }
}

/// Opens the file with the platform's default application.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemViewer;

impl SystemViewer {
    fn command(path: &Path) -> Command {
        if cfg!(target_os = "windows") {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", ""]).arg(path);
            command
        } else if cfg!(target_os = "macos") {
            let mut command = Command::new("open");
            command.arg(path);
            command
        } else {
            let mut command = Command::new("xdg-open");
            command.arg(path);
            command
        }
    }
}

impl PrintTrigger for SystemViewer {
    fn print(&self, path: &Path) -> PrintOutcome {
        if !path.is_file() {
            return PrintOutcome::ManualPrintRequired {
                reason: format!("{} does not exist", path.display()),
            };
        }

        launch(Self::command(path), path)
    }
}

/// Spawn `command` and leave it running.
///
/// The viewer is detached: the child handle is dropped without waiting,
/// so the viewer may outlive this process.
fn launch(mut command: Command, path: &Path) -> PrintOutcome {
    match command.spawn() {
        Ok(child) => {
            debug!(
                "opened {} in the default viewer (pid {})",
                path.display(),
                child.id()
            );
            drop(child);
            PrintOutcome::Opened
        }
        Err(e) => {
            warn!("could not open {}: {e}", path.display());
            PrintOutcome::ManualPrintRequired {
                reason: format!("no default viewer available: {e}"),
            }
        }
    }
}
