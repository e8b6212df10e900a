//! Filtering throughput benchmarks.
//!
//! Measures a full filter pass over a large store, with and without a
//! search string, and the cost of a settle after a filter change on a live
//! console.
//!
//! Run with: cargo bench

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use diagcon::console::{ConsoleOptions, ListDataSource, RecordingSurface};
use diagcon::filter::{filter_records, FilterDelta, FilterMode, FilterSettings};
use diagcon::model::{Category, EntityStore, FilterClass, NewEntry};
use std::time::Duration;

const NUM_ENTRIES: usize = 100_000;

fn category_for(i: usize) -> Category {
    match i % 10 {
        0 => Category::Error,
        1 | 2 => Category::Warning,
        3 => Category::Command,
        _ => Category::Log,
    }
}

fn message_for(i: usize) -> String {
    format!(
        "request {} served by worker-{} in {}ms (cache {})",
        i,
        i % 16,
        i % 997,
        if i % 3 == 0 { "miss" } else { "hit" }
    )
}

/// Store with ~100k mixed-category entries.
fn generate_store() -> EntityStore {
    let mut store = EntityStore::new();
    for i in 0..NUM_ENTRIES {
        store.push(NewEntry::new(message_for(i), "", category_for(i)));
    }
    store
}

fn bench_filter_records(c: &mut Criterion) {
    let store = generate_store();
    let snapshot = store.snapshot();
    let records = snapshot.records().expect("complete snapshot");

    let mut group = c.benchmark_group("filter_records");

    let all = FilterSettings::default().snapshot();
    group.bench_function("all_shown", |b| {
        b.iter(|| filter_records(black_box(records), black_box(&all)))
    });

    let hidden = FilterSettings {
        show_logs: false,
        ..FilterSettings::default()
    }
    .snapshot();
    group.bench_function("logs_hidden", |b| {
        b.iter(|| filter_records(black_box(records), black_box(&hidden)))
    });

    let search = FilterSettings {
        search: "worker-7 ".to_string(),
        ..FilterSettings::default()
    }
    .snapshot();
    group.bench_function("search_case_sensitive", |b| {
        b.iter(|| filter_records(black_box(records), black_box(&search)))
    });

    let folded = FilterSettings {
        search: "CACHE MISS".to_string(),
        case_insensitive: true,
        ..FilterSettings::default()
    }
    .snapshot();
    group.bench_function("search_case_insensitive", |b| {
        b.iter(|| filter_records(black_box(records), black_box(&folded)))
    });

    group.finish();
}

fn bench_console_refilter(c: &mut Criterion) {
    let mut console = ListDataSource::new(ConsoleOptions {
        filter_mode: FilterMode::Background,
        ..ConsoleOptions::default()
    });
    let mut surface = RecordingSurface::new();
    for i in 0..NUM_ENTRIES {
        console.append(message_for(i), "", category_for(i));
    }
    console
        .settle(&mut surface, Duration::from_secs(30))
        .expect("initial settle");

    let mut shown = true;
    c.bench_function("console_toggle_errors_and_settle", |b| {
        b.iter(|| {
            shown = !shown;
            console
                .set_filter(FilterDelta::class(FilterClass::Errors, shown), &mut surface)
                .expect("filter");
            console
                .settle(&mut surface, Duration::from_secs(30))
                .expect("settle");
            black_box(console.item_count())
        })
    });
}

criterion_group!(benches, bench_filter_records, bench_console_refilter);
criterion_main!(benches);
