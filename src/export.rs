//! Headless export of the filtered view as JSON lines.
//!
//! Used by `--print`: everything is ingested synchronously, the filter is
//! allowed to settle, then each visible entry is written as one JSON object
//! per line.

use crate::console::{ConsoleOptions, ListDataSource, RecordingSurface};
use crate::model::{AppError, Category, LogEntity, RowKind};
use crate::source::read_lines;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::io::{Read, Write};
use std::time::Duration;
use tracing::info;

/// How long print mode waits for the filter to settle.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

/// One exported row.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedEntry<'a> {
    /// Position in the filtered view.
    pub index: usize,
    /// Category name.
    pub category: Category,
    /// Primary text.
    pub message: &'a str,
    /// Details, omitted when empty.
    #[serde(skip_serializing_if = "str::is_empty")]
    pub context: &'a str,
    /// Arrival time.
    pub timestamp: DateTime<Local>,
}

impl<'a> ExportedEntry<'a> {
    /// Export view of an entity. Separators and banners have none.
    pub fn from_entity(index: usize, entity: &'a LogEntity) -> Option<Self> {
        if entity.kind() != RowKind::Entry {
            return None;
        }
        Some(Self {
            index,
            category: entity.category(),
            message: entity.message(),
            context: entity.context(),
            timestamp: entity.timestamp(),
        })
    }
}

/// Write every entry of the filtered view to `writer`, one JSON object per
/// line. Returns the number of lines written.
///
/// # Errors
///
/// Any write or serialization failure.
pub fn write_jsonl<W: Write>(console: &ListDataSource, mut writer: W) -> std::io::Result<usize> {
    let mut written = 0;
    for index in 0..console.item_count() {
        let Ok(entity) = console.item_at_index(index) else {
            break;
        };
        let Some(entry) = ExportedEntry::from_entity(index, entity) else {
            continue;
        };
        serde_json::to_writer(&mut writer, &entry)?;
        writer.write_all(b"\n")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Ingest `input` completely, filter it with `options`, and write the result
/// to `output` as JSON lines.
///
/// # Errors
///
/// [`AppError::Input`] if reading fails, [`AppError::Console`] if the filter
/// does not settle, [`AppError::Terminal`] if writing fails.
pub fn print_filtered<R: Read, W: Write>(
    input: R,
    options: ConsoleOptions,
    output: W,
) -> Result<usize, AppError> {
    let mut console = ListDataSource::new(ConsoleOptions {
        welcome_banner: None,
        ..options
    });
    let mut surface = RecordingSurface::new();

    let read = read_lines(input, &console.sender())?;
    console.settle(&mut surface, SETTLE_TIMEOUT)?;
    let written = write_jsonl(&console, output)?;

    info!(read, written, "Print mode finished");
    Ok(written)
}
