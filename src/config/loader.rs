//! Configuration file loading with precedence handling.

use crate::console::{ConsoleOptions, DEFAULT_BANNER};
use crate::filter::{FilterMode, FilterSettings};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DIAGCON_CONFIG";
/// Environment variable overriding the filter mode.
pub const FILTER_MODE_ENV: &str = "DIAGCON_FILTER_MODE";
/// Environment variable overriding search case handling.
pub const SEARCH_CASE_ENV: &str = "DIAGCON_SEARCH_CASE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/diagcon/config.toml`:
///
/// ```toml
/// show_logs = false
/// case_insensitive_search = true
/// filter_mode = "inline"
/// welcome_banner = ""   # no banner
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Show debug/log lines on startup.
    #[serde(default)]
    pub show_logs: Option<bool>,

    /// Show warnings on startup.
    #[serde(default)]
    pub show_warnings: Option<bool>,

    /// Show errors on startup.
    #[serde(default)]
    pub show_errors: Option<bool>,

    /// Show command echoes on startup.
    #[serde(default)]
    pub show_commands: Option<bool>,

    /// Match the search string ignoring case.
    #[serde(default)]
    pub case_insensitive_search: Option<bool>,

    /// `background` or `inline`.
    #[serde(default)]
    pub filter_mode: Option<FilterMode>,

    /// Banner text above the startup separator. Empty disables it.
    #[serde(default)]
    pub welcome_banner: Option<String>,

    /// Layout units per text line.
    #[serde(default)]
    pub line_height: Option<u16>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Show debug/log lines.
    pub show_logs: bool,
    /// Show warnings.
    pub show_warnings: bool,
    /// Show errors.
    pub show_errors: bool,
    /// Show command echoes.
    pub show_commands: bool,
    /// Initial search string. Only settable from the command line.
    pub search: String,
    /// Match the search string ignoring case.
    pub case_insensitive_search: bool,
    /// Where filter jobs run.
    pub filter_mode: FilterMode,
    /// Startup banner, `None` for none.
    pub welcome_banner: Option<String>,
    /// Layout units per text line, at least 1.
    pub line_height: u16,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            show_logs: true,
            show_warnings: true,
            show_errors: true,
            show_commands: true,
            search: String::new(),
            case_insensitive_search: false,
            filter_mode: FilterMode::Background,
            welcome_banner: Some(DEFAULT_BANNER.to_string()),
            line_height: 1,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Filter settings the console starts with.
    pub fn filter_settings(&self) -> FilterSettings {
        FilterSettings {
            show_logs: self.show_logs,
            show_warnings: self.show_warnings,
            show_errors: self.show_errors,
            show_commands: self.show_commands,
            search: self.search.clone(),
            case_insensitive: self.case_insensitive_search,
        }
    }

    /// Options for constructing the console.
    pub fn console_options(&self) -> ConsoleOptions {
        ConsoleOptions {
            settings: self.filter_settings(),
            filter_mode: self.filter_mode,
            line_height: self.line_height,
            welcome_banner: self.welcome_banner.clone(),
            ..ConsoleOptions::default()
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/diagcon/diagcon.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("diagcon").join("diagcon.log"),
        None => PathBuf::from("diagcon.log"),
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/diagcon/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("diagcon").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `DIAGCON_CONFIG` environment variable
/// 3. Default path `~/.config/diagcon/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(format!("{} is empty", CONFIG_ENV)));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let welcome_banner = match config.welcome_banner {
        Some(banner) if banner.is_empty() => None,
        Some(banner) => Some(banner),
        None => defaults.welcome_banner,
    };

    ResolvedConfig {
        show_logs: config.show_logs.unwrap_or(defaults.show_logs),
        show_warnings: config.show_warnings.unwrap_or(defaults.show_warnings),
        show_errors: config.show_errors.unwrap_or(defaults.show_errors),
        show_commands: config.show_commands.unwrap_or(defaults.show_commands),
        search: defaults.search,
        case_insensitive_search: config
            .case_insensitive_search
            .unwrap_or(defaults.case_insensitive_search),
        filter_mode: config.filter_mode.unwrap_or(defaults.filter_mode),
        welcome_banner,
        line_height: config.line_height.unwrap_or(defaults.line_height).max(1),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `DIAGCON_FILTER_MODE`: `background` or `inline`
/// - `DIAGCON_SEARCH_CASE`: `sensitive` or `insensitive`
///
/// Unrecognized values are logged and ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(value) = std::env::var(FILTER_MODE_ENV) {
        match value.parse::<FilterMode>() {
            Ok(mode) => config.filter_mode = mode,
            Err(err) => warn!(variable = FILTER_MODE_ENV, "{}", err),
        }
    }

    if let Ok(value) = std::env::var(SEARCH_CASE_ENV) {
        match value.trim().to_ascii_lowercase().as_str() {
            "sensitive" => config.case_insensitive_search = false,
            "insensitive" => config.case_insensitive_search = true,
            _ => warn!(
                variable = SEARCH_CASE_ENV,
                value = %value,
                "Ignoring unknown search case (expected 'sensitive' or 'insensitive')"
            ),
        }
    }

    config
}

/// Command-line flags that override configuration.
///
/// `hide_*`, `ignore_case` and `inline_filter` only ever switch their setting
/// one way; leaving them `false` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// Initial search string.
    pub search: Option<String>,
    /// Start with log lines hidden.
    pub hide_logs: bool,
    /// Start with warnings hidden.
    pub hide_warnings: bool,
    /// Start with errors hidden.
    pub hide_errors: bool,
    /// Start with command echoes hidden.
    pub hide_commands: bool,
    /// Match the search string ignoring case.
    pub ignore_case: bool,
    /// Run filter jobs inline.
    pub inline_filter: bool,
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(search) = cli.search {
        config.search = search;
    }
    if cli.hide_logs {
        config.show_logs = false;
    }
    if cli.hide_warnings {
        config.show_warnings = false;
    }
    if cli.hide_errors {
        config.show_errors = false;
    }
    if cli.hide_commands {
        config.show_commands = false;
    }
    if cli.ignore_case {
        config.case_insensitive_search = true;
    }
    if cli.inline_filter {
        config.filter_mode = FilterMode::Inline;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
