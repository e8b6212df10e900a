//! Console actions independent of key bindings.

use crate::model::FilterClass;

/// What the user asked the console to do.
///
/// These represent intent, not keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Cursor and scrolling
    /// Move the cursor one row up. Default: k/↑
    CursorUp,
    /// Move the cursor one row down. Default: j/↓
    CursorDown,
    /// Scroll up by one page height. Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one page height. Default: Ctrl+d/Page Down
    PageDown,
    /// Jump to the first row. Default: g/Home
    ScrollToTop,
    /// Jump to the last row and follow new output. Default: G/End
    ScrollToBottom,

    // Rows
    /// Expand or collapse the row under the cursor. Default: Enter/Tab
    ToggleExpand,
    /// Enter or leave selection mode. Default: v
    ToggleSelectionMode,
    /// Select or deselect the row under the cursor. Default: Space
    ToggleSelected,
    /// Select every row. Default: a
    SelectAll,

    // Filtering
    /// Show or hide one filter class. Default: 1-4
    ToggleClass(FilterClass),
    /// Switch search between case-sensitive and case-insensitive. Default: i
    ToggleCaseSensitivity,
    /// Start typing a search string. Default: /
    StartSearch,
    /// Drop the current search string. Default: Esc
    ClearSearch,

    // Application
    /// Start typing a console command. Default: :
    StartCommand,
    /// Remove every entry. Default: Ctrl+l
    ClearConsole,
    /// Print the command help into the console. Default: ?
    Help,
    /// Exit. Default: q/Ctrl+c
    Quit,
}
