//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crate::model::FilterClass;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to console actions.
///
/// Provides default vim-style bindings. Only consulted while no text is being
/// typed into the search or command line.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&key).copied()
    }

    /// Bind `key` to `action`, replacing any previous binding.
    pub fn bind(&mut self, key: KeyEvent, action: KeyAction) {
        self.bindings.insert(key, action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let plain = |c: char| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        let ctrl = |c: char| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
        let shifted = |c: char| KeyEvent::new(KeyCode::Char(c), KeyModifiers::SHIFT);
        let key = |code: KeyCode| KeyEvent::new(code, KeyModifiers::NONE);

        let defaults = [
            // Vim-style movement
            (plain('j'), KeyAction::CursorDown),
            (plain('k'), KeyAction::CursorUp),
            (plain('g'), KeyAction::ScrollToTop),
            (shifted('G'), KeyAction::ScrollToBottom),
            (ctrl('d'), KeyAction::PageDown),
            (ctrl('u'), KeyAction::PageUp),
            // Arrow and page keys
            (key(KeyCode::Down), KeyAction::CursorDown),
            (key(KeyCode::Up), KeyAction::CursorUp),
            (key(KeyCode::PageDown), KeyAction::PageDown),
            (key(KeyCode::PageUp), KeyAction::PageUp),
            (key(KeyCode::Home), KeyAction::ScrollToTop),
            (key(KeyCode::End), KeyAction::ScrollToBottom),
            // Rows
            (key(KeyCode::Enter), KeyAction::ToggleExpand),
            (key(KeyCode::Tab), KeyAction::ToggleExpand),
            (plain('v'), KeyAction::ToggleSelectionMode),
            (plain(' '), KeyAction::ToggleSelected),
            (plain('a'), KeyAction::SelectAll),
            // Filtering
            (plain('1'), KeyAction::ToggleClass(FilterClass::Logs)),
            (plain('2'), KeyAction::ToggleClass(FilterClass::Warnings)),
            (plain('3'), KeyAction::ToggleClass(FilterClass::Errors)),
            (plain('4'), KeyAction::ToggleClass(FilterClass::Commands)),
            (plain('i'), KeyAction::ToggleCaseSensitivity),
            (plain('/'), KeyAction::StartSearch),
            (ctrl('f'), KeyAction::StartSearch),
            (key(KeyCode::Esc), KeyAction::ClearSearch),
            // Application
            (plain(':'), KeyAction::StartCommand),
            (ctrl('l'), KeyAction::ClearConsole),
            (plain('?'), KeyAction::Help),
            (plain('q'), KeyAction::Quit),
            (ctrl('c'), KeyAction::Quit),
        ];

        Self {
            bindings: defaults.into_iter().collect(),
        }
    }
}
