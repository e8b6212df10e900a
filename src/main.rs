//! Diagnostic console - Entry Point

use clap::Parser;
use diagcon::config::{CliOverrides, ResolvedConfig};
use diagcon::console::ListDataSource;
use diagcon::source::InputSource;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::info;

/// Diagnostic console - filterable, searchable view of log output
#[derive(Parser, Debug)]
#[command(name = "diagcon")]
#[command(version)]
#[command(about = "Terminal console for log output with category filters and live search")]
pub struct Args {
    /// Log file to read (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Start with this search string active
    #[arg(short, long)]
    pub search: Option<String>,

    /// Start with debug/log lines hidden
    #[arg(long)]
    pub hide_logs: bool,

    /// Start with warnings hidden
    #[arg(long)]
    pub hide_warnings: bool,

    /// Start with errors hidden
    #[arg(long)]
    pub hide_errors: bool,

    /// Start with command echoes hidden
    #[arg(long)]
    pub hide_commands: bool,

    /// Match the search string ignoring case
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Run filtering on the UI thread instead of a worker
    #[arg(long)]
    pub inline_filter: bool,

    /// Print the filtered entries as JSON lines instead of opening the UI
    #[arg(short, long)]
    pub print: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            search: self.search.clone(),
            hide_logs: self.hide_logs,
            hide_warnings: self.hide_warnings,
            hide_errors: self.hide_errors,
            hide_commands: self.hide_commands,
            ignore_case: self.ignore_case,
            inline_filter: self.inline_filter,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = diagcon::config::load_config_with_precedence(args.config.clone())?;
        let merged = diagcon::config::merge_config(config_file);
        let with_env = diagcon::config::apply_env_overrides(merged);
        diagcon::config::apply_cli_overrides(with_env, args.overrides())
    };

    let input_source = diagcon::source::detect_input_source(args.file.clone())?;

    if args.print {
        diagcon::logging::init(&config.log_file_path)?;
        info!(config = ?config, "Configuration loaded and resolved");
        return print_mode(&input_source, &config);
    }

    // Warnings and errors of our own show up in the console too.
    let console = ListDataSource::new(config.console_options());
    diagcon::logging::init_with_console(&config.log_file_path, Some(console.sender()))?;
    info!(config = ?config, source = %input_source.label(), "Configuration loaded and resolved");

    diagcon::view::run_with_source(console, input_source)?;

    Ok(())
}

fn print_mode(
    source: &InputSource,
    config: &ResolvedConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let out = BufWriter::new(io::stdout().lock());
    let options = config.console_options();
    match source {
        InputSource::File(path) => {
            diagcon::export::print_filtered(File::open(path)?, options, out)?;
        }
        InputSource::Stdin => {
            diagcon::export::print_filtered(io::stdin().lock(), options, out)?;
        }
        InputSource::Interactive => {
            diagcon::export::print_filtered(io::empty(), options, out)?;
        }
    }
    Ok(())
}
