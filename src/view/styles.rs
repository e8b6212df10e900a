//! Row and status bar styling.
//!
//! Colors follow the category: warnings yellow, errors red, commands cyan.

use crate::model::{Category, FilterClass};
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Colors are on unless the `NO_COLOR` environment variable is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Read `NO_COLOR` from the environment.
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Explicitly enable or disable colors.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== ConsoleStyles =====

/// Styles used when drawing the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleStyles {
    colors: bool,
}

impl Default for ConsoleStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env())
    }
}

impl ConsoleStyles {
    /// Styles honoring `config`.
    pub fn with_color_config(config: ColorConfig) -> Self {
        Self {
            colors: config.colors_enabled(),
        }
    }

    fn fg(self, color: Color) -> Style {
        if self.colors {
            Style::default().fg(color)
        } else {
            Style::default()
        }
    }

    /// Message text of a row.
    pub fn message(self, category: Category) -> Style {
        match category {
            Category::Warning => self.fg(Color::Yellow),
            Category::Error => self.fg(Color::Red),
            Category::Command => self.fg(Color::Cyan),
            Category::Info => self.fg(Color::Green),
            Category::Log | Category::Internal => Style::default(),
        }
    }

    /// Three-letter category label in the gutter.
    pub fn label(self, category: Category) -> Style {
        self.message(category).add_modifier(Modifier::BOLD)
    }

    /// Expanded details below a message.
    pub fn context(self) -> Style {
        self.fg(Color::Gray).add_modifier(Modifier::DIM)
    }

    /// Separator rule.
    pub fn separator(self) -> Style {
        self.fg(Color::DarkGray)
    }

    /// Welcome banner.
    pub fn banner(self) -> Style {
        self.fg(Color::Cyan).add_modifier(Modifier::BOLD)
    }

    /// A search match inside a message.
    pub fn search_match(self) -> Style {
        if self.colors {
            Style::default().bg(Color::Yellow).fg(Color::Black)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        }
    }

    /// Extra style applied to the row under the cursor.
    pub fn cursor(self) -> Style {
        if self.colors {
            Style::default().bg(Color::Rgb(40, 40, 60))
        } else {
            Style::default().add_modifier(Modifier::UNDERLINED)
        }
    }

    /// Status bar background.
    pub fn status_bar(self) -> Style {
        if self.colors {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        }
    }

    /// Filter toggle in the status bar.
    pub fn toggle(self, class: FilterClass, shown: bool) -> Style {
        if !shown {
            return self.status_bar().add_modifier(Modifier::CROSSED_OUT | Modifier::DIM);
        }
        let category = match class {
            FilterClass::Logs => Category::Log,
            FilterClass::Warnings => Category::Warning,
            FilterClass::Errors => Category::Error,
            FilterClass::Commands => Category::Command,
        };
        self.status_bar().patch(self.label(category))
    }
}
