//! Contract between the console core and a virtualized list renderer.
//!
//! The renderer pulls heights and row contents by index; the console pushes
//! item-count changes and relayout requests.

use crate::model::{LogEntity, RowHeight};

/// Push side of the renderer contract.
pub trait VirtualizationSurface {
    /// The filtered view changed and now has `count` rows.
    fn set_item_count(&mut self, count: usize);

    /// Scroll so the last row is visible.
    fn scroll_to_bottom(&mut self);

    /// Every row height may have changed.
    fn force_full_relayout(&mut self);

    /// The height of the row at `index` may have changed.
    fn request_relayout(&mut self, index: usize);
}

/// Everything a row widget needs to draw one entity.
#[derive(Debug, Clone, Copy)]
pub struct RowBinding<'a> {
    /// Position in the filtered view.
    pub index: usize,
    /// The entity to draw.
    pub entity: &'a LogEntity,
    /// Height the row was measured at.
    pub height: RowHeight,
    /// Current search string, for highlighting.
    pub search: &'a str,
    /// Whether `search` matches ignoring case.
    pub case_insensitive: bool,
    /// Whether selection checkboxes are shown.
    pub selection_mode: bool,
}

/// A row widget that can be bound to an entity.
pub trait RowHandle {
    /// Bind the widget to the given row.
    fn bind(&mut self, binding: RowBinding<'_>);
}

/// Surface that records every call. Used by headless mode and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSurface {
    /// Last published item count.
    pub item_count: Option<usize>,
    /// Number of `set_item_count` calls.
    pub item_count_updates: usize,
    /// Number of `scroll_to_bottom` calls.
    pub scrolls_to_bottom: usize,
    /// Number of `force_full_relayout` calls.
    pub full_relayouts: usize,
    /// Indices passed to `request_relayout`, in call order.
    pub relayout_requests: Vec<usize>,
}

impl RecordingSurface {
    /// Fresh surface with no recorded calls.
    pub fn new() -> Self {
        Self::default()
    }
}

impl VirtualizationSurface for RecordingSurface {
    fn set_item_count(&mut self, count: usize) {
        self.item_count = Some(count);
        self.item_count_updates += 1;
    }

    fn scroll_to_bottom(&mut self) {
        self.scrolls_to_bottom += 1;
    }

    fn force_full_relayout(&mut self) {
        self.full_relayouts += 1;
    }

    fn request_relayout(&mut self, index: usize) {
        self.relayout_requests.push(index);
    }
}
