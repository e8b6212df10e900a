//! Terminal UI (impure shell)
//!
//! Draws the console with ratatui: a virtualized list of rows, a status bar
//! and an input line. [`TerminalSurface`] receives the console's push
//! notifications; rows are pulled by index and drawn through [`RowRenderer`].

pub mod input;
pub mod row;
pub mod row_offsets;
pub mod status;
pub mod styles;
pub mod viewport;

pub use input::{InputLine, InputMode, InputOutcome};
pub use row::{highlight, RowRenderer, GUTTER_WIDTH};
pub use row_offsets::RowOffsets;
pub use status::{status_line, StatusContext};
pub use styles::{ColorConfig, ConsoleStyles};
pub use viewport::{TerminalSurface, VisibleRow};

use crate::config::KeyBindings;
use crate::console::{run_command, ListDataSource};
use crate::filter::FilterDelta;
use crate::model::{ConsoleError, InputError, KeyAction};
use crate::source::InputSource;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout, Rect},
    widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Terminal,
};
use std::io::{self, Stdout};
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// How long the loop waits for a terminal event before ticking again.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Column reserved for the scrollbar.
const SCROLLBAR_WIDTH: u16 = 1;

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Input source error
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Console contract violation
    #[error("Console error: {0}")]
    Console(#[from] ConsoleError),
}

/// List area, status bar, input line.
fn screen_layout(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area)
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    console: ListDataSource,
    surface: TerminalSurface,
    key_bindings: KeyBindings,
    input: InputLine,
    styles: ConsoleStyles,
    source_label: String,
    live_source: bool,
    reader: Option<JoinHandle<()>>,
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Wire a console to a terminal and start reading `source`.
    ///
    /// # Errors
    ///
    /// [`TuiError::Input`] if the source cannot be opened.
    pub fn new(
        terminal: Terminal<B>,
        console: ListDataSource,
        source: &InputSource,
    ) -> Result<Self, TuiError> {
        let reader = source.spawn(console.sender())?;
        Ok(Self {
            terminal,
            console,
            surface: TerminalSurface::new(),
            key_bindings: KeyBindings::default(),
            input: InputLine::new(),
            styles: ConsoleStyles::default(),
            source_label: source.label(),
            live_source: source.is_live(),
            reader,
        })
    }

    /// The console being shown.
    pub fn console(&self) -> &ListDataSource {
        &self.console
    }

    /// Scroll state.
    pub fn surface(&self) -> &TerminalSurface {
        &self.surface
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q or Ctrl+C). Redraws only when the console
    /// changed or an event arrived.
    ///
    /// # Errors
    ///
    /// Terminal failures and console contract violations.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.tick()?;
        self.draw()?;

        loop {
            let mut redraw = self.tick()?;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key)? {
                            return Ok(());
                        }
                        redraw = true;
                    }
                    Event::Resize(width, height) => {
                        debug!("Handling resize to {}x{}", width, height);
                        redraw = true;
                    }
                    _ => {}
                }
            }

            if redraw {
                self.draw()?;
            }
        }
    }

    /// Advance the console one frame. Returns whether a redraw is needed.
    ///
    /// # Errors
    ///
    /// [`TuiError::Console`] if a filter job was corrupt.
    pub fn tick(&mut self) -> Result<bool, TuiError> {
        let report = self.console.tick(&mut self.surface)?;
        if self.live_source && self.reader.as_ref().is_some_and(JoinHandle::is_finished) {
            info!(source = %self.source_label, "Input closed");
            self.live_source = false;
            self.reader = None;
            return Ok(true);
        }
        Ok(report.flushed > 0 || report.swapped || self.surface.take_dirty())
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    ///
    /// # Errors
    ///
    /// Console contract violations raised by the action.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool, TuiError> {
        // Ctrl+C always quits, even while typing.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }

        match self.input.mode() {
            InputMode::Normal => {}
            InputMode::Search => {
                match self.input.handle_key(key) {
                    InputOutcome::Edited(text) => {
                        self.console
                            .set_filter(FilterDelta::search(text), &mut self.surface)?;
                    }
                    InputOutcome::Cancelled => {
                        let saved = self.input.saved_search().to_string();
                        self.console
                            .set_filter(FilterDelta::search(saved), &mut self.surface)?;
                    }
                    InputOutcome::Submitted(_) | InputOutcome::Ignored => {}
                }
                return Ok(false);
            }
            InputMode::Command => {
                if let InputOutcome::Submitted(text) = self.input.handle_key(key) {
                    if !text.trim().is_empty() {
                        run_command(&mut self.console, &text, &mut self.surface)?;
                    }
                }
                return Ok(false);
            }
        }

        match self.key_bindings.get(key) {
            Some(action) => self.apply(action),
            None => Ok(false),
        }
    }

    fn apply(&mut self, action: KeyAction) -> Result<bool, TuiError> {
        self.surface.sync_view(self.console.filtered_view());
        let console = &mut self.console;
        let surface = &mut self.surface;

        match action {
            KeyAction::CursorUp => surface.move_cursor(-1),
            KeyAction::CursorDown => surface.move_cursor(1),
            KeyAction::PageUp => surface.page(false),
            KeyAction::PageDown => surface.page(true),
            KeyAction::ScrollToTop => surface.to_top(),
            KeyAction::ScrollToBottom => surface.to_bottom(),
            KeyAction::ToggleExpand => {
                if let Some(index) = surface.cursor() {
                    console.toggle_expanded(index, surface)?;
                }
            }
            KeyAction::ToggleSelectionMode => {
                console.set_selection_mode(!console.selection_mode());
            }
            KeyAction::ToggleSelected => {
                if let Some(index) = surface.cursor() {
                    console.set_selection_mode(true);
                    console.toggle_selected(index)?;
                }
            }
            KeyAction::SelectAll => {
                console.set_selection_mode(true);
                console.select_all();
            }
            KeyAction::ToggleClass(class) => {
                let shown = console.settings().shows(class);
                console.set_filter(FilterDelta::class(class, !shown), surface)?;
            }
            KeyAction::ToggleCaseSensitivity => {
                let insensitive = console.settings().case_insensitive;
                console.set_filter(FilterDelta::case_insensitive(!insensitive), surface)?;
            }
            KeyAction::StartSearch => self.input.start_search(&console.settings().search),
            KeyAction::ClearSearch => {
                if !console.settings().search.is_empty() {
                    console.set_filter(FilterDelta::search(String::new()), surface)?;
                }
            }
            KeyAction::StartCommand => self.input.start_command(),
            KeyAction::ClearConsole => console.clear(surface),
            KeyAction::Help => run_command(console, "help", surface)?,
            KeyAction::Quit => return Ok(true),
        }
        Ok(false)
    }

    /// Render the current frame
    ///
    /// # Errors
    ///
    /// Terminal failures, or [`TuiError::Console`] if the surface and the
    /// console disagree about the row count.
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        let [list_area, _, _] = screen_layout(Rect::new(0, 0, size.width, size.height));

        let text_width = list_area
            .width
            .saturating_sub(GUTTER_WIDTH + SCROLLBAR_WIDTH)
            .max(1);
        self.console
            .set_reference_width(text_width, &mut self.surface);
        self.surface.set_viewport_height(list_area.height);

        let visible = self.surface.layout(&mut self.console)?;
        let cursor = self.surface.cursor();
        let mut renderer = RowRenderer::new(text_width, self.styles);
        let mut lines = Vec::new();
        for row in &visible {
            self.console.bind_row_at_index(row.index, &mut renderer)?;
            let mut row_lines = renderer.take_lines();
            if cursor == Some(row.index) {
                for line in &mut row_lines {
                    line.style = line.style.patch(self.styles.cursor());
                }
            }
            lines.extend(row_lines);
        }

        let (position, total) = self.surface.scroll_position();
        let mut scrollbar = ScrollbarState::new(total.saturating_sub(usize::from(list_area.height)))
            .position(position);
        let status = status_line(
            &self.console,
            StatusContext {
                source: &self.source_label,
                following: self.surface.is_following(),
                live: self.live_source,
            },
            self.styles,
        );
        let input = self.input.render();
        let status_style = self.styles.status_bar();

        self.terminal.draw(|frame| {
            let [list_area, status_area, input_area] = screen_layout(frame.area());
            frame.render_widget(Paragraph::new(lines), list_area);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                list_area,
                &mut scrollbar,
            );
            frame.render_widget(Paragraph::new(status).style(status_style), status_area);
            frame.render_widget(Paragraph::new(input), input_area);
        })?;

        self.surface.take_dirty();
        Ok(())
    }
}

/// Initialize and run the TUI on the real terminal.
///
/// Sets the terminal up in raw mode with an alternate screen, runs the event
/// loop, and restores the terminal even if the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
///
/// # Errors
///
/// Terminal failures, input errors, and console contract violations.
pub fn run_with_source(console: ListDataSource, source: InputSource) -> Result<(), TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let terminal: Terminal<CrosstermBackend<Stdout>> = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = TuiApp::new(terminal, console, &source).and_then(|mut app| app.run());

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
