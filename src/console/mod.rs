//! The console core: ingestion, filtering and the renderer contract.

pub mod commands;
pub mod data_source;
pub mod ingest;
pub mod surface;

pub use commands::{run_command, CommandError, ConsoleCommand};
pub use data_source::{ConsoleOptions, ListDataSource, TickReport, DEFAULT_BANNER};
pub use ingest::LogSender;
pub use surface::{RecordingSurface, RowBinding, RowHandle, VirtualizationSurface};
