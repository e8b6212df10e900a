//! Entry categories and the category lookup table.
//!
//! Every category maps to at most one counter bucket and at most one filter
//! class. Adding a category is a table change, not a control-flow change.

use serde::{Deserialize, Serialize};

/// Category of a console row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Informational output (welcome text, help). Never filtered, never counted.
    Info,
    /// Ordinary debug/log output.
    Log,
    /// Warning.
    Warning,
    /// Error or exception.
    Error,
    /// Echo of a command issued by the user.
    Command,
    /// Rows owned by the console itself (separators, banner).
    Internal,
}

/// Ingestion counter a category increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Debug/log lines.
    Debug,
    /// Warnings.
    Warning,
    /// Errors and exceptions.
    Error,
    /// Command echoes.
    Command,
}

/// Filter toggle that controls visibility of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterClass {
    /// Debug/log lines.
    Logs,
    /// Warnings.
    Warnings,
    /// Errors and exceptions.
    Errors,
    /// Command echoes.
    Commands,
}

impl FilterClass {
    /// All filter classes in display order.
    pub const ALL: [FilterClass; 4] = [
        FilterClass::Logs,
        FilterClass::Warnings,
        FilterClass::Errors,
        FilterClass::Commands,
    ];

    /// Name used by console commands and the status bar.
    pub fn name(self) -> &'static str {
        match self {
            FilterClass::Logs => "logs",
            FilterClass::Warnings => "warnings",
            FilterClass::Errors => "errors",
            FilterClass::Commands => "commands",
        }
    }

    /// Parse a class name as typed in the console (`log`, `logs`, `warn`, ...).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "log" | "logs" | "debug" => Some(FilterClass::Logs),
            "warn" | "warning" | "warnings" => Some(FilterClass::Warnings),
            "err" | "error" | "errors" => Some(FilterClass::Errors),
            "cmd" | "command" | "commands" => Some(FilterClass::Commands),
            _ => None,
        }
    }
}

/// Static attributes of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTraits {
    /// Counter bucket incremented on ingestion, if any.
    pub bucket: Option<Bucket>,
    /// Filter class that can hide the category, if any.
    pub filter_class: Option<FilterClass>,
    /// Three-letter label shown in the row gutter.
    pub label: &'static str,
}

// Indexed by `Category as usize`; order must match the enum declaration.
const TRAITS: [CategoryTraits; 6] = [
    // Info
    CategoryTraits {
        bucket: None,
        filter_class: None,
        label: "INF",
    },
    // Log
    CategoryTraits {
        bucket: Some(Bucket::Debug),
        filter_class: Some(FilterClass::Logs),
        label: "LOG",
    },
    // Warning
    CategoryTraits {
        bucket: Some(Bucket::Warning),
        filter_class: Some(FilterClass::Warnings),
        label: "WRN",
    },
    // Error
    CategoryTraits {
        bucket: Some(Bucket::Error),
        filter_class: Some(FilterClass::Errors),
        label: "ERR",
    },
    // Command
    CategoryTraits {
        bucket: Some(Bucket::Command),
        filter_class: Some(FilterClass::Commands),
        label: "CMD",
    },
    // Internal
    CategoryTraits {
        bucket: None,
        filter_class: None,
        label: "---",
    },
];

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 6] = [
        Category::Info,
        Category::Log,
        Category::Warning,
        Category::Error,
        Category::Command,
        Category::Internal,
    ];

    /// Table entry for this category.
    pub fn traits(self) -> &'static CategoryTraits {
        &TRAITS[self as usize]
    }

    /// Counter bucket this category increments.
    pub fn bucket(self) -> Option<Bucket> {
        self.traits().bucket
    }

    /// Filter class that can hide this category.
    pub fn filter_class(self) -> Option<FilterClass> {
        self.traits().filter_class
    }

    /// Gutter label.
    pub fn label(self) -> &'static str {
        self.traits().label
    }

    /// Whether rows of this category pull the view to the bottom when flushed.
    pub fn is_command_echo(self) -> bool {
        self == Category::Command
    }
}
