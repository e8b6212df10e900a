//! Error types for diagcon.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - top-level error returned to `main`
//!   - [`InputError`] - opening or reading a line source
//!   - [`ConsoleError`] - contract violations against the console core
//!     - [`FilterError`] - a filter job was handed corrupt input
//!   - `std::io::Error` - terminal failures
//!
//! # Recovery Strategy
//!
//! Contract violations (out-of-range indices, corrupt filter jobs) indicate a bug
//! in a caller or cross-component state corruption. They are returned as errors
//! rather than clamped or ignored so the caller sees them; the console logs them
//! at `error` before returning. Input errors are fatal for the reader that hit
//! them but never for the console itself.

use super::EntityId;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// A line source could not be opened or read.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// The console core reported a contract violation.
    #[error("Console error: {0}")]
    Console(#[from] ConsoleError),

    /// Terminal or output stream failure.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors raised by a filter job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The job's snapshot boundary lies past the records it carries.
    ///
    /// Only possible if the snapshot was assembled from inconsistent parts, which
    /// means the store and the job disagree about the collection. The job is
    /// aborted.
    #[error("torn snapshot: boundary {claimed} exceeds {available} available records")]
    TornSnapshot {
        /// Length recorded at submission.
        claimed: usize,
        /// Records actually present.
        available: usize,
    },
}

/// Contract violations against the console core.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// A row index outside the current filtered view was requested.
    ///
    /// The virtualization surface must only ask for `0..item_count`.
    #[error("row index {index} out of range (item count {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Item count of the filtered view.
        len: usize,
    },

    /// The filtered view referenced a row the store does not hold.
    #[error("filtered view references unknown row {0}")]
    UnknownEntity(EntityId),

    /// A filter job was aborted.
    #[error("filter job aborted: {0}")]
    Filter(#[from] FilterError),

    /// The console did not settle within the allotted time.
    #[error("console did not settle within {0:?}")]
    SettleTimeout(Duration),
}

/// Errors encountered when opening or reading a line source.
#[derive(Debug, Error)]
pub enum InputError {
    /// The given input file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Print mode was requested without a file and stdin is a terminal.
    #[error("No input: pass a file or pipe lines on stdin")]
    NoInput,

    /// The reader thread could not be started.
    #[error("Failed to start reader thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// Generic I/O failure while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
