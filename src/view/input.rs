//! The bottom input line: live search and console commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// What the input line is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Keys go to key bindings.
    Normal,
    /// Keys edit the search string; every edit refilters.
    Search,
    /// Keys edit a console command, run on Enter.
    Command,
}

/// Result of feeding a key to the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// The key was not for the input line.
    Ignored,
    /// The text changed.
    Edited(String),
    /// Enter was pressed with this text.
    Submitted(String),
    /// Editing was abandoned.
    Cancelled,
}

/// Single-line text editor with a cursor.
#[derive(Debug, Clone)]
pub struct InputLine {
    mode: InputMode,
    text: String,
    /// Cursor position in chars.
    cursor: usize,
    /// Search string to restore on cancel.
    saved_search: String,
}

impl Default for InputLine {
    fn default() -> Self {
        Self::new()
    }
}

impl InputLine {
    /// Idle input line.
    pub fn new() -> Self {
        Self {
            mode: InputMode::Normal,
            text: String::new(),
            cursor: 0,
            saved_search: String::new(),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Text typed so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Search string that was active when search editing started.
    pub fn saved_search(&self) -> &str {
        &self.saved_search
    }

    /// Start editing the search string, seeded with the current one.
    pub fn start_search(&mut self, current: &str) {
        self.mode = InputMode::Search;
        self.saved_search = current.to_string();
        self.text = current.to_string();
        self.cursor = self.text.chars().count();
    }

    /// Start typing a command.
    pub fn start_command(&mut self) {
        self.mode = InputMode::Command;
        self.text.clear();
        self.cursor = 0;
    }

    /// Feed a key while editing.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputOutcome {
        if self.mode == InputMode::Normal {
            return InputOutcome::Ignored;
        }
        match key.code {
            KeyCode::Esc => {
                self.finish();
                InputOutcome::Cancelled
            }
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.text);
                self.finish();
                InputOutcome::Submitted(text)
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let at = self.byte_index(self.cursor);
                self.text.insert(at, ch);
                self.cursor += 1;
                InputOutcome::Edited(self.text.clone())
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.text.remove(at);
                InputOutcome::Edited(self.text.clone())
            }
            KeyCode::Delete if self.cursor < self.text.chars().count() => {
                let at = self.byte_index(self.cursor);
                self.text.remove(at);
                InputOutcome::Edited(self.text.clone())
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                InputOutcome::Ignored
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.text.chars().count());
                InputOutcome::Ignored
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputOutcome::Ignored
            }
            KeyCode::End => {
                self.cursor = self.text.chars().count();
                InputOutcome::Ignored
            }
            _ => InputOutcome::Ignored,
        }
    }

    /// Line to draw: a prompt and the text with a block cursor, or a key
    /// hint when idle.
    pub fn render(&self) -> Line<'static> {
        let prompt = match self.mode {
            InputMode::Normal => {
                return Line::styled(
                    " / search  : command  1-4 filters  i case  v select  ? help  q quit",
                    Style::default().add_modifier(Modifier::DIM),
                );
            }
            InputMode::Search => "/",
            InputMode::Command => ":",
        };

        let split = self.byte_index(self.cursor);
        let (before, rest) = self.text.split_at(split);
        let mut rest_chars = rest.chars();
        let under = rest_chars.next().map(String::from).unwrap_or_else(|| " ".into());
        let after: String = rest_chars.collect();

        Line::from(vec![
            Span::styled(prompt, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(before.to_string()),
            Span::styled(under, Style::default().bg(Color::White).fg(Color::Black)),
            Span::raw(after),
        ])
    }

    fn finish(&mut self) {
        self.mode = InputMode::Normal;
        self.text.clear();
        self.cursor = 0;
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(i, _)| i)
    }
}
