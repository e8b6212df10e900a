//! Filter toggles and the free-text search string.

use crate::model::FilterClass;
use serde::Serialize;

/// Current filter configuration of the console.
///
/// Owned by the main tick. Filter jobs only ever see a [`FilterSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSettings {
    /// Show debug/log lines.
    pub show_logs: bool,
    /// Show warnings.
    pub show_warnings: bool,
    /// Show errors and exceptions.
    pub show_errors: bool,
    /// Show command echoes.
    pub show_commands: bool,
    /// Substring a message must contain. Empty matches everything.
    pub search: String,
    /// Compare `search` ignoring case.
    pub case_insensitive: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            show_logs: true,
            show_warnings: true,
            show_errors: true,
            show_commands: true,
            search: String::new(),
            case_insensitive: false,
        }
    }
}

impl FilterSettings {
    /// Whether a filter class is currently shown.
    pub fn shows(&self, class: FilterClass) -> bool {
        match class {
            FilterClass::Logs => self.show_logs,
            FilterClass::Warnings => self.show_warnings,
            FilterClass::Errors => self.show_errors,
            FilterClass::Commands => self.show_commands,
        }
    }

    /// Show or hide a filter class.
    pub fn set_class(&mut self, class: FilterClass, shown: bool) {
        *self.class_mut(class) = shown;
    }

    /// Apply a partial update. Returns `true` if anything changed.
    pub fn apply(&mut self, delta: FilterDelta) -> bool {
        let before = self.clone();
        for (class, value) in [
            (FilterClass::Logs, delta.show_logs),
            (FilterClass::Warnings, delta.show_warnings),
            (FilterClass::Errors, delta.show_errors),
            (FilterClass::Commands, delta.show_commands),
        ] {
            if let Some(shown) = value {
                self.set_class(class, shown);
            }
        }
        if let Some(search) = delta.search {
            self.search = search;
        }
        if let Some(case_insensitive) = delta.case_insensitive {
            self.case_insensitive = case_insensitive;
        }
        *self != before
    }

    /// Immutable copy for a filter job.
    pub fn snapshot(&self) -> FilterSnapshot {
        let folded_search = if self.case_insensitive {
            self.search.to_lowercase()
        } else {
            self.search.clone()
        };
        FilterSnapshot {
            settings: self.clone(),
            folded_search,
        }
    }

    fn class_mut(&mut self, class: FilterClass) -> &mut bool {
        match class {
            FilterClass::Logs => &mut self.show_logs,
            FilterClass::Warnings => &mut self.show_warnings,
            FilterClass::Errors => &mut self.show_errors,
            FilterClass::Commands => &mut self.show_commands,
        }
    }
}

/// Partial update to [`FilterSettings`]; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDelta {
    /// New value for `show_logs`.
    pub show_logs: Option<bool>,
    /// New value for `show_warnings`.
    pub show_warnings: Option<bool>,
    /// New value for `show_errors`.
    pub show_errors: Option<bool>,
    /// New value for `show_commands`.
    pub show_commands: Option<bool>,
    /// New search string.
    pub search: Option<String>,
    /// New case-sensitivity flag.
    pub case_insensitive: Option<bool>,
}

impl FilterDelta {
    /// Show or hide one filter class.
    pub fn class(class: FilterClass, shown: bool) -> Self {
        let mut delta = Self::default();
        match class {
            FilterClass::Logs => delta.show_logs = Some(shown),
            FilterClass::Warnings => delta.show_warnings = Some(shown),
            FilterClass::Errors => delta.show_errors = Some(shown),
            FilterClass::Commands => delta.show_commands = Some(shown),
        }
        delta
    }

    /// Replace the search string.
    pub fn search(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            ..Self::default()
        }
    }

    /// Change case sensitivity of the search.
    pub fn case_insensitive(case_insensitive: bool) -> Self {
        Self {
            case_insensitive: Some(case_insensitive),
            ..Self::default()
        }
    }
}

/// Read-only settings captured when a filter job is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSnapshot {
    settings: FilterSettings,
    folded_search: String,
}

impl FilterSnapshot {
    /// Settings the snapshot was taken from.
    pub fn settings(&self) -> &FilterSettings {
        &self.settings
    }

    /// Search string as compared against messages (lowercased when the
    /// search ignores case).
    pub fn needle(&self) -> &str {
        &self.folded_search
    }
}
