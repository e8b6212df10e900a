//! Built-in console commands.
//!
//! Typed input is echoed as a command entry, then parsed and executed against
//! the console. Parse failures become error entries, not `Err`s.

use super::{ListDataSource, VirtualizationSurface};
use crate::filter::FilterDelta;
use crate::model::{Category, ConsoleError, FilterClass};
use thiserror::Error;
use tracing::debug;

/// One-line summary of every command, shown by `help`.
pub const HELP_LINES: &[&str] = &[
    "help                      show this list",
    "clear                     remove every row and reset counters",
    "select-all                select every visible row",
    "deselect                  clear the selection of visible rows",
    "filter <class> <on|off>   show or hide logs, warnings, errors or commands",
    "search [text]             filter by substring; no text clears the search",
    "echo <text>               append text as a log line",
];

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// List the commands.
    Help,
    /// Clear the console.
    Clear,
    /// Select every visible row.
    SelectAll,
    /// Deselect every visible row.
    Deselect,
    /// Show or hide a filter class.
    Filter(FilterClass, bool),
    /// Replace the search string.
    Search(String),
    /// Append text as a log line.
    Echo(String),
}

/// Why a command line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Nothing but whitespace was entered.
    #[error("empty command")]
    Empty,

    /// The command name is not known.
    #[error("unknown command '{0}' (type 'help' for a list)")]
    Unknown(String),

    /// The command was recognised but its arguments were not.
    #[error("usage: {0}")]
    Usage(&'static str),
}

impl ConsoleCommand {
    /// Parse one command line.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();
        let (name, rest) = match input.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (input, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "help" | "?" => Ok(ConsoleCommand::Help),
            "clear" | "cls" => Ok(ConsoleCommand::Clear),
            "select-all" => Ok(ConsoleCommand::SelectAll),
            "deselect" => Ok(ConsoleCommand::Deselect),
            "search" => Ok(ConsoleCommand::Search(rest.to_string())),
            "echo" => Ok(ConsoleCommand::Echo(rest.to_string())),
            "filter" => parse_filter(rest),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_filter(args: &str) -> Result<ConsoleCommand, CommandError> {
    const USAGE: &str = "filter <logs|warnings|errors|commands> <on|off>";

    let mut parts = args.split_whitespace();
    let class = parts
        .next()
        .and_then(FilterClass::parse)
        .ok_or(CommandError::Usage(USAGE))?;
    let shown = match parts.next().map(str::to_ascii_lowercase).as_deref() {
        Some("on" | "show" | "true") => true,
        Some("off" | "hide" | "false") => false,
        _ => return Err(CommandError::Usage(USAGE)),
    };
    if parts.next().is_some() {
        return Err(CommandError::Usage(USAGE));
    }
    Ok(ConsoleCommand::Filter(class, shown))
}

/// Echo `input` into the console and execute it.
///
/// # Errors
///
/// Only console contract violations; bad input is reported in the console.
pub fn run_command(
    console: &mut ListDataSource,
    input: &str,
    surface: &mut dyn VirtualizationSurface,
) -> Result<(), ConsoleError> {
    let input = input.trim();
    console.append(format!("> {}", input), "", Category::Command);

    let command = match ConsoleCommand::parse(input) {
        Ok(command) => command,
        Err(err) => {
            console.append(err.to_string(), "", Category::Error);
            return Ok(());
        }
    };
    debug!(?command, "Running console command");

    match command {
        ConsoleCommand::Help => {
            console.append(
                format!("{} commands (expand for details)", HELP_LINES.len()),
                HELP_LINES.join("\n"),
                Category::Info,
            );
        }
        ConsoleCommand::Clear => console.clear(surface),
        ConsoleCommand::SelectAll => {
            let selected = console.select_all();
            console.append(format!("{} rows selected", selected), "", Category::Info);
        }
        ConsoleCommand::Deselect => console.reset_selection(),
        ConsoleCommand::Filter(class, shown) => {
            console.set_filter(FilterDelta::class(class, shown), surface)?;
        }
        ConsoleCommand::Search(text) => {
            console.set_filter(FilterDelta::search(text), surface)?;
        }
        ConsoleCommand::Echo(text) => console.append(text, "", Category::Log),
    }
    Ok(())
}
