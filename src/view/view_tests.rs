//! Tests for the TUI shell, drawn into a `TestBackend`.

use super::*;
use crate::console::ConsoleOptions;
use crate::filter::FilterMode;
use crate::model::{Category, FilterClass};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;

fn create_test_app(width: u16, height: u16) -> TuiApp<TestBackend> {
    let terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");
    let console = ListDataSource::new(ConsoleOptions {
        filter_mode: FilterMode::Inline,
        welcome_banner: None,
        ..ConsoleOptions::default()
    });
    TuiApp::new(terminal, console, &InputSource::Interactive).expect("app")
}

fn press(app: &mut TuiApp<TestBackend>, code: KeyCode) -> bool {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
        .expect("key handled")
}

fn type_text(app: &mut TuiApp<TestBackend>, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

fn screen(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (0..area.height)
        .map(|y| (0..area.width).map(|x| buffer[(x, y)].symbol()).collect())
        .collect()
}

fn rendered(app: &mut TuiApp<TestBackend>) -> Vec<String> {
    app.tick().expect("tick");
    app.draw().expect("draw");
    screen(app.terminal.backend().buffer())
}

#[test]
fn tui_error_from_io_error() {
    let io_err = io::Error::other("test error");
    let tui_err: TuiError = io_err.into();
    assert!(matches!(tui_err, TuiError::Io(_)));
}

#[test]
fn draws_rows_status_and_hint() {
    let mut app = create_test_app(60, 8);
    app.console.append("hello world", "", Category::Log);
    app.console.append("disk low", "", Category::Warning);

    let lines = rendered(&mut app);

    assert!(lines[0].contains("LOG") && lines[0].contains("hello world"), "{:?}", lines);
    assert!(lines[1].contains("WRN") && lines[1].contains("disk low"), "{:?}", lines);
    assert!(lines[6].contains("interactive"), "{:?}", lines);
    assert!(lines[6].contains("[2] warnings 1"), "{:?}", lines);
    assert!(lines[7].contains("/ search"), "{:?}", lines);
}

#[test]
fn number_keys_toggle_filter_classes() {
    let mut app = create_test_app(60, 10);
    app.console.append("boom", "", Category::Error);
    app.console.append("fine", "", Category::Log);
    app.tick().expect("tick");

    press(&mut app, KeyCode::Char('3'));
    assert_eq!(app.console().item_count(), 1);
    assert!(!app.console().settings().show_errors);

    press(&mut app, KeyCode::Char('3'));
    assert_eq!(app.console().item_count(), 2);
}

#[test]
fn live_search_filters_while_typing_and_escape_restores() {
    let mut app = create_test_app(60, 10);
    app.console.append("disk full", "", Category::Warning);
    app.console.append("net down", "", Category::Error);
    app.tick().expect("tick");

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "disk");
    assert_eq!(app.console().settings().search, "disk");
    assert_eq!(app.console().item_count(), 1);
    let lines = rendered(&mut app);
    assert!(lines[9].starts_with("/disk"), "{:?}", lines);

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.console().settings().search, "");
    assert_eq!(app.console().item_count(), 2);
}

#[test]
fn submitted_search_stays_and_escape_clears_it() {
    let mut app = create_test_app(60, 10);
    app.console.append("disk full", "", Category::Warning);
    app.console.append("net down", "", Category::Error);
    app.tick().expect("tick");

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "net");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.console().settings().search, "net");

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.console().settings().search, "");
}

#[test]
fn commands_are_echoed_and_run() {
    let mut app = create_test_app(60, 10);

    press(&mut app, KeyCode::Char(':'));
    type_text(&mut app, "echo hi");
    press(&mut app, KeyCode::Enter);
    let lines = rendered(&mut app);

    let messages: Vec<String> = (0..app.console().item_count())
        .map(|i| {
            app.console()
                .item_at_index(i)
                .expect("row")
                .message()
                .to_string()
        })
        .collect();
    assert_eq!(messages, vec!["> echo hi", "hi"]);
    assert!(lines[0].contains("CMD"), "{:?}", lines);
    assert!(app.surface().is_following());
}

#[test]
fn quit_keys() {
    let mut app = create_test_app(40, 6);
    assert!(press(&mut app, KeyCode::Char('q')));

    let mut app = create_test_app(40, 6);
    press(&mut app, KeyCode::Char(':'));
    let quit = app
        .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
        .expect("key");
    assert!(quit, "Ctrl+C quits even while typing");
}

#[test]
fn enter_expands_row_under_cursor() {
    let mut app = create_test_app(60, 10);
    app.console
        .append("panic", "at main.rs:1\nat lib.rs:2", Category::Error);
    rendered(&mut app);
    assert_eq!(app.surface().cursor(), Some(0));

    press(&mut app, KeyCode::Enter);
    let lines = rendered(&mut app);

    assert!(app.console().item_at_index(0).expect("row").is_expanded());
    assert!(lines[1].contains("at main.rs:1"), "{:?}", lines);
    assert!(lines[2].contains("at lib.rs:2"), "{:?}", lines);
}

#[test]
fn space_selects_and_enables_selection_mode() {
    let mut app = create_test_app(60, 10);
    app.console.append("one", "", Category::Log);
    app.console.append("two", "", Category::Log);
    rendered(&mut app);

    press(&mut app, KeyCode::Char(' '));

    assert!(app.console().selection_mode());
    assert_eq!(app.console().selected_text(), "two");
    let lines = rendered(&mut app);
    assert!(lines[1].starts_with("● LOG"), "{:?}", lines);
}

#[test]
fn resize_changes_reference_width() {
    let mut app = create_test_app(80, 10);
    rendered(&mut app);
    assert_eq!(
        app.console().reference_width(),
        80 - GUTTER_WIDTH - SCROLLBAR_WIDTH
    );

    app.terminal.backend_mut().resize(40, 10);
    rendered(&mut app);

    assert_eq!(
        app.console().reference_width(),
        40 - GUTTER_WIDTH - SCROLLBAR_WIDTH
    );
}

#[test]
fn clear_key_empties_console() {
    let mut app = create_test_app(60, 10);
    app.console.append("x", "", Category::Log);
    app.tick().expect("tick");

    app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL))
        .expect("key");
    app.tick().expect("tick");

    assert_eq!(app.console().item_count(), 0);
    assert_eq!(app.console().counter().debug(), 0);
}

#[test]
fn case_toggle_key_flips_setting() {
    let mut app = create_test_app(60, 10);
    press(&mut app, KeyCode::Char('i'));
    assert!(app.console().settings().case_insensitive);
    press(&mut app, KeyCode::Char('i'));
    assert!(!app.console().settings().case_insensitive);
}

#[test]
fn hidden_class_status_survives_toggle() {
    let mut app = create_test_app(80, 6);
    press(&mut app, KeyCode::Char('1'));
    assert!(!app.console().settings().shows(FilterClass::Logs));
    let lines = rendered(&mut app);
    assert!(lines[4].contains("[1] logs 0"), "{:?}", lines);
}
