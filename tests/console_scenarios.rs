//! End-to-end console scenarios through the public API.
//!
//! Each test drives a [`ListDataSource`] the way the terminal shell does:
//! append, tick, change filters, query rows by index.

use diagcon::console::{ConsoleOptions, ListDataSource, RecordingSurface};
use diagcon::filter::{FilterDelta, FilterMode};
use diagcon::model::{Category, ConsoleError, FilterClass};
use std::time::Duration;

const SETTLE: Duration = Duration::from_secs(10);

fn console(mode: FilterMode) -> (ListDataSource, RecordingSurface) {
    let console = ListDataSource::new(ConsoleOptions {
        filter_mode: mode,
        ..ConsoleOptions::default()
    });
    (console, RecordingSurface::new())
}

fn messages(console: &ListDataSource) -> Vec<String> {
    (0..console.item_count())
        .map(|i| {
            console
                .item_at_index(i)
                .expect("index in range")
                .message()
                .to_string()
        })
        .collect()
}

#[test]
fn hiding_errors_removes_only_the_error_and_keeps_counts() {
    for mode in [FilterMode::Inline, FilterMode::Background] {
        let (mut console, mut surface) = console(mode);
        console.append("boom", "", Category::Error);
        console.append("started", "", Category::Log);
        console.append("> reload", "", Category::Command);
        console.settle(&mut surface, SETTLE).expect("settle");

        let initial = console.initial_rows();
        assert_eq!(initial, 2, "banner and separator");
        assert_eq!(console.item_count(), 3 + initial);

        console
            .set_filter(FilterDelta::class(FilterClass::Errors, false), &mut surface)
            .expect("filter");
        console.settle(&mut surface, SETTLE).expect("settle");

        assert_eq!(console.item_count(), 2 + initial);
        let visible = messages(&console);
        assert!(!visible.contains(&"boom".to_string()), "{:?}", visible);
        assert!(visible.contains(&"started".to_string()));
        assert!(visible.contains(&"> reload".to_string()));

        let counter = console.counter();
        assert_eq!(counter.error(), 1);
        assert_eq!(counter.debug(), 1);
        assert_eq!(counter.command(), 1);
        assert_eq!(surface.item_count, Some(2 + initial));
    }
}

#[test]
fn rapid_filter_changes_end_on_the_last_settings() {
    let (mut console, mut surface) = console(FilterMode::Background);
    for i in 0..500 {
        let category = if i % 2 == 0 { Category::Warning } else { Category::Log };
        console.append(format!("line {}", i), "", category);
    }
    console.settle(&mut surface, SETTLE).expect("settle");
    let before = console.engine_stats();

    console
        .set_filter(FilterDelta::class(FilterClass::Warnings, false), &mut surface)
        .expect("filter");
    console
        .set_filter(FilterDelta::search("line 1"), &mut surface)
        .expect("filter");
    console.settle(&mut surface, SETTLE).expect("settle");

    let after = console.engine_stats();
    assert!(
        after.delivered - before.delivered <= 2,
        "two changes deliver at most two results: {:?} -> {:?}",
        before,
        after
    );

    // Only odd lines (logs) whose text contains "line 1" remain, plus the
    // banner and separator.
    let visible = messages(&console);
    let expected: Vec<String> = (0..500)
        .filter(|i| i % 2 == 1)
        .map(|i| format!("line {}", i))
        .filter(|m| m.contains("line 1"))
        .collect();
    assert_eq!(&visible[console.initial_rows()..], expected.as_slice());
}

#[test]
fn selection_survives_being_filtered_out() {
    let (mut console, mut surface) = console(FilterMode::Background);
    console.append("keep me", "", Category::Warning);
    console.append("noise", "", Category::Log);
    console.settle(&mut surface, SETTLE).expect("settle");

    let warning = console.initial_rows();
    assert!(console.toggle_selected(warning).expect("select"));

    console
        .set_filter(FilterDelta::class(FilterClass::Warnings, false), &mut surface)
        .expect("filter");
    console.settle(&mut surface, SETTLE).expect("settle");
    assert!(console.selected_items().is_empty());

    console
        .set_filter(FilterDelta::class(FilterClass::Warnings, true), &mut surface)
        .expect("filter");
    console.settle(&mut surface, SETTLE).expect("settle");

    assert_eq!(console.selected_text(), "keep me");
}

#[test]
fn queries_past_the_end_are_rejected() {
    let (mut console, mut surface) = console(FilterMode::Inline);
    console.append("only", "", Category::Log);
    console.settle(&mut surface, SETTLE).expect("settle");

    let len = console.item_count();
    assert!(matches!(
        console.item_at_index(len),
        Err(ConsoleError::IndexOutOfRange { index, len: l }) if index == len && l == len
    ));
    assert!(console.height_for_index(len).is_err());
}

#[test]
fn expanding_a_row_grows_its_height_and_requests_relayout() {
    let (mut console, mut surface) = console(FilterMode::Inline);
    console.append("panic", "frame 1\nframe 2\nframe 3", Category::Error);
    console.settle(&mut surface, SETTLE).expect("settle");

    let row = console.item_count() - 1;
    let collapsed = console.height_for_index(row).expect("height").get();
    assert!(console.toggle_expanded(row, &mut surface).expect("expand"));
    let expanded = console.height_for_index(row).expect("height").get();

    assert_eq!(expanded, collapsed + 3);
    assert_eq!(surface.relayout_requests, vec![row]);
}

#[test]
fn width_change_invalidates_every_height() {
    let (mut console, mut surface) = console(FilterMode::Inline);
    console.append("word ".repeat(20).trim_end(), "", Category::Log);
    console.settle(&mut surface, SETTLE).expect("settle");
    let row = console.item_count() - 1;

    assert!(console.set_reference_width(50, &mut surface));
    assert_eq!(console.height_for_index(row).expect("height").get(), 2);

    assert!(console.set_reference_width(20, &mut surface));
    assert_eq!(console.height_for_index(row).expect("height").get(), 5);

    assert!(!console.set_reference_width(20, &mut surface));
    assert_eq!(surface.full_relayouts, 2);
}

#[test]
fn sender_appends_from_another_thread() {
    let (mut console, mut surface) = console(FilterMode::Background);
    let sender = console.sender();

    let handle = std::thread::spawn(move || {
        for i in 0..10 {
            assert!(sender.send(format!("worker {}", i), "", Category::Log));
        }
    });
    handle.join().expect("sender thread");
    console.settle(&mut surface, SETTLE).expect("settle");

    assert_eq!(console.counter().debug(), 10);
    assert_eq!(console.item_count(), 10 + console.initial_rows());
}

#[test]
fn clear_then_append_starts_fresh() {
    let (mut console, mut surface) = console(FilterMode::Background);
    console.append("old", "", Category::Error);
    console.settle(&mut surface, SETTLE).expect("settle");

    console.clear(&mut surface);
    console.append("new", "", Category::Warning);
    console.settle(&mut surface, SETTLE).expect("settle");

    assert_eq!(messages(&console), vec!["new"]);
    assert_eq!(console.counter().error(), 0);
    assert_eq!(console.counter().warning(), 1);
}
