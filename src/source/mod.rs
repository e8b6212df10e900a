//! Line sources feeding the console.
//!
//! - File input: read once on a background thread
//! - Piped stdin: streamed on a background thread until EOF
//! - Interactive: no reader; the user types commands

use crate::console::LogSender;
use crate::model::error::InputError;
use std::fs::File;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::thread::JoinHandle;

pub mod classify;
pub mod reader;

pub use classify::{classify_line, is_continuation, LineAssembler};
pub use reader::{forward_lines, read_lines, spawn_reader, IDLE_FLUSH};

/// Where console input comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A file read once from start to end.
    File(PathBuf),
    /// Lines piped on stdin.
    Stdin,
    /// Stdin is a terminal; nothing to read.
    Interactive,
}

impl InputSource {
    /// Whether more lines may arrive after startup.
    pub fn is_live(&self) -> bool {
        matches!(self, InputSource::Stdin)
    }

    /// Short name for logs and the status bar.
    pub fn label(&self) -> String {
        match self {
            InputSource::File(path) => path.display().to_string(),
            InputSource::Stdin => "stdin".to_string(),
            InputSource::Interactive => "interactive".to_string(),
        }
    }

    /// Start a reader thread forwarding lines to `sender`.
    ///
    /// Returns `None` for [`InputSource::Interactive`].
    ///
    /// # Errors
    ///
    /// [`InputError::FileNotFound`] or [`InputError::Io`] if the file cannot
    /// be opened, [`InputError::Spawn`] if the thread cannot be started.
    pub fn spawn(&self, sender: LogSender) -> Result<Option<JoinHandle<()>>, InputError> {
        match self {
            InputSource::File(path) => {
                let file = File::open(path).map_err(|err| match err.kind() {
                    std::io::ErrorKind::NotFound => InputError::FileNotFound { path: path.clone() },
                    _ => InputError::Io(err),
                })?;
                spawn_reader(file, self.label(), sender).map(Some)
            }
            InputSource::Stdin => spawn_reader(std::io::stdin(), self.label(), sender).map(Some),
            InputSource::Interactive => Ok(None),
        }
    }
}

/// Pick the input source.
///
/// 1. A file path wins; it must exist.
/// 2. Otherwise piped stdin.
/// 3. Otherwise interactive.
///
/// # Errors
///
/// [`InputError::FileNotFound`] if the given file does not exist.
pub fn detect_input_source(file: Option<PathBuf>) -> Result<InputSource, InputError> {
    match file {
        Some(path) if !path.exists() => Err(InputError::FileNotFound { path }),
        Some(path) => Ok(InputSource::File(path)),
        None if std::io::stdin().is_terminal() => Ok(InputSource::Interactive),
        None => Ok(InputSource::Stdin),
    }
}
