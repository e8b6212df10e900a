//! Tests for HeightCache memoization and invalidation.

use super::*;
use crate::model::{Category, EntityId, NewEntry};
use std::cell::Cell;
use std::rc::Rc;

/// Counts calls; one line per started `width` bytes.
struct CountingMeasurer {
    calls: Rc<Cell<usize>>,
}

impl TextMeasurer for CountingMeasurer {
    fn line_count(&self, text: &str, width: u16) -> usize {
        self.calls.set(self.calls.get() + 1);
        if width == 0 {
            return 1;
        }
        text.len().div_ceil(usize::from(width)).max(1)
    }
}

fn counting_cache(width: u16) -> (HeightCache, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let measurer = CountingMeasurer {
        calls: Rc::clone(&calls),
    };
    (HeightCache::with_measurer(Box::new(measurer), width), calls)
}

fn store_with(message: &str, context: &str) -> (EntityStore, EntityId) {
    let mut store = EntityStore::new();
    let id = store.push(NewEntry::new(message, context, Category::Log));
    (store, id)
}

#[test]
fn second_lookup_uses_memoized_height() {
    let (cache, calls) = counting_cache(10);
    let (mut store, id) = store_with("twenty characters!!!", "");
    let entity = store.get_mut(id).expect("entity");

    let first = cache.height_for(entity);
    let second = cache.height_for(entity);

    assert_eq!(first.get(), 2);
    assert_eq!(first, second);
    assert_eq!(calls.get(), 1);
}

#[test]
fn expanded_row_adds_context_height() {
    let (cache, _calls) = counting_cache(10);
    let (mut store, id) = store_with("short", "0123456789abcdefghij0123");
    let entity = store.get_mut(id).expect("entity");

    assert_eq!(cache.height_for(entity).get(), 1);

    entity.set_expanded(true);

    assert_eq!(cache.height_for(entity).get(), 1 + 3);
}

#[test]
fn expanded_row_without_details_keeps_message_height() {
    let (cache, _calls) = counting_cache(10);
    let (mut store, id) = store_with("short", "");
    let entity = store.get_mut(id).expect("entity");
    entity.set_expanded(true);

    assert_eq!(cache.height_for(entity).get(), 1);
}

#[test]
fn invalidate_forces_remeasure() {
    let (cache, calls) = counting_cache(10);
    let (mut store, id) = store_with("abc", "");
    let entity = store.get_mut(id).expect("entity");
    cache.height_for(entity);

    cache.invalidate(entity);
    cache.height_for(entity);

    assert_eq!(calls.get(), 2);
}

#[test]
fn width_change_invalidates_every_row() {
    let (mut cache, _calls) = counting_cache(20);
    let mut store = EntityStore::new();
    for _ in 0..3 {
        store.push(NewEntry::new("0123456789", "", Category::Log));
    }
    for entity in store.iter_mut() {
        assert_eq!(cache.height_for(entity).get(), 1);
    }

    assert!(cache.set_reference_width(5, &mut store));

    for entity in store.iter() {
        assert!(entity.cached_height().is_unmeasured());
    }
    for entity in store.iter_mut() {
        assert_eq!(cache.height_for(entity).get(), 2);
    }
}

#[test]
fn same_width_is_not_a_change() {
    let (mut cache, _calls) = counting_cache(20);
    let (mut store, id) = store_with("abc", "");
    cache.height_for(store.get_mut(id).expect("entity"));

    assert!(!cache.set_reference_width(20, &mut store));
    assert!(!store.get(id).expect("entity").cached_height().is_unmeasured());
}

#[test]
fn separators_and_banner_bypass_measurement() {
    let (cache, calls) = counting_cache(10);
    let mut store = EntityStore::new();
    let banner = store.push(NewEntry::banner("a very long welcome banner text"));
    let separator = store.push(NewEntry::separator());

    let banner_height = cache.height_for(store.get_mut(banner).expect("banner"));
    let separator_height = cache.height_for(store.get_mut(separator).expect("separator"));

    assert_eq!(banner_height.get(), BANNER_HEIGHT);
    assert_eq!(separator_height, SEPARATOR_HEIGHT);
    assert_eq!(calls.get(), 0);
}

#[test]
fn line_height_multiplies_line_count() {
    let cache = HeightCache::new(10).with_line_height(3);
    let (mut store, id) = store_with("one\ntwo", "");

    assert_eq!(cache.height_for(store.get_mut(id).expect("entity")).get(), 6);
}

#[test]
fn zero_width_is_one_line_per_logical_line() {
    let cache = HeightCache::new(0);
    let (mut store, id) = store_with("a long message that would wrap", "");

    assert_eq!(cache.height_for(store.get_mut(id).expect("entity")).get(), 1);
}
