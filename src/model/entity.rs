//! Console rows and their identifiers.

use super::Category;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Identifier of a row inside the [`EntityStore`](super::EntityStore) arena.
///
/// Identifiers are positions in the authoritative collection and are only
/// meaningful for the store epoch they were issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntityId(usize);

impl EntityId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position in the authoritative collection.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rendered height of a row in layout units.
///
/// Measured heights are always >= 1. [`RowHeight::UNMEASURED`] is the sentinel
/// stored on an entity whose height has not been computed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowHeight(u16);

/// Error returned when building a measured [`RowHeight`] of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("row height must be >= 1 (got {0})")]
pub struct InvalidRowHeight(pub u16);

impl RowHeight {
    /// Sentinel: height not computed.
    pub const UNMEASURED: Self = Self(0);

    /// Smallest measured height.
    pub const ONE: Self = Self(1);

    /// Smart constructor for measured heights.
    pub fn new(height: u16) -> Result<Self, InvalidRowHeight> {
        if height == 0 {
            Err(InvalidRowHeight(height))
        } else {
            Ok(Self(height))
        }
    }

    /// Measured height, rounding zero up to one.
    pub(crate) fn at_least_one(height: u16) -> Self {
        Self(height.max(1))
    }

    /// Raw value.
    pub fn get(self) -> u16 {
        self.0
    }

    /// Whether this is the "not computed" sentinel.
    pub fn is_unmeasured(self) -> bool {
        self.0 == 0
    }
}

/// What a row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    /// A logged or echoed entry.
    Entry,
    /// Horizontal separator.
    Separator,
    /// Welcome banner shown at startup.
    Banner,
}

/// An entry waiting to be flushed into the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    /// Primary text.
    pub message: String,
    /// Detail payload (stack trace, extra fields). Empty when there is none.
    pub context: String,
    /// Category.
    pub category: Category,
    /// Arrival time.
    pub timestamp: DateTime<Local>,
    pub(crate) kind: RowKind,
}

impl NewEntry {
    /// A regular entry stamped with the current time.
    pub fn new(message: impl Into<String>, context: impl Into<String>, category: Category) -> Self {
        Self {
            message: message.into(),
            context: context.into(),
            category,
            timestamp: Local::now(),
            kind: RowKind::Entry,
        }
    }

    pub(crate) fn separator() -> Self {
        Self {
            kind: RowKind::Separator,
            ..Self::new("", "", Category::Internal)
        }
    }

    pub(crate) fn banner(text: impl Into<String>) -> Self {
        Self {
            kind: RowKind::Banner,
            ..Self::new(text, "", Category::Info)
        }
    }

    /// Row kind this entry becomes.
    pub fn kind(&self) -> RowKind {
        self.kind
    }
}

/// One logical console row.
///
/// Text is held behind `Arc<str>` so filter snapshots can share it without
/// copying. Selection, expansion and the cached height are mutated only by the
/// owner of the store.
#[derive(Debug, Clone)]
pub struct LogEntity {
    id: EntityId,
    kind: RowKind,
    category: Category,
    message: Arc<str>,
    context: Arc<str>,
    timestamp: DateTime<Local>,
    selectable: bool,
    selected: bool,
    expanded: bool,
    cached_height: RowHeight,
}

impl LogEntity {
    pub(crate) fn from_new(id: EntityId, entry: NewEntry) -> Self {
        Self {
            id,
            kind: entry.kind,
            category: entry.category,
            message: Arc::from(entry.message),
            context: Arc::from(entry.context),
            timestamp: entry.timestamp,
            selectable: entry.kind == RowKind::Entry,
            selected: false,
            expanded: false,
            cached_height: RowHeight::UNMEASURED,
        }
    }

    /// Arena identifier.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Row kind.
    pub fn kind(&self) -> RowKind {
        self.kind
    }

    /// Category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Primary text.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn message_arc(&self) -> Arc<str> {
        Arc::clone(&self.message)
    }

    /// Detail payload.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Arrival time.
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Whether the row has a detail section to expand.
    pub fn has_details(&self) -> bool {
        !self.context.is_empty()
    }

    /// Whether selection operations apply to this row.
    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    /// Selection flag.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Set the selection flag. Ignored for rows that are not selectable.
    pub fn set_selected(&mut self, selected: bool) {
        if self.selectable {
            self.selected = selected;
        }
    }

    /// Whether the detail section is shown.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Show or hide the detail section. Changing the flag drops the cached height.
    pub fn set_expanded(&mut self, expanded: bool) {
        if self.expanded != expanded {
            self.expanded = expanded;
            self.invalidate_height();
        }
    }

    /// Replace the message. Drops the cached height.
    pub(crate) fn set_message(&mut self, message: Arc<str>) {
        self.message = message;
        self.invalidate_height();
    }

    /// Memoized height, or [`RowHeight::UNMEASURED`].
    pub fn cached_height(&self) -> RowHeight {
        self.cached_height
    }

    pub(crate) fn store_height(&mut self, height: RowHeight) {
        self.cached_height = height;
    }

    /// Reset the memoized height to the sentinel.
    pub fn invalidate_height(&mut self) {
        self.cached_height = RowHeight::UNMEASURED;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(message: &str, context: &str) -> LogEntity {
        LogEntity::from_new(EntityId::new(0), NewEntry::new(message, context, Category::Log))
    }

    #[test]
    fn row_height_rejects_zero() {
        assert_eq!(RowHeight::new(0), Err(InvalidRowHeight(0)));
        assert_eq!(RowHeight::new(3).map(RowHeight::get), Ok(3));
    }

    #[test]
    fn row_height_at_least_one_rounds_up() {
        assert_eq!(RowHeight::at_least_one(0), RowHeight::ONE);
        assert_eq!(RowHeight::at_least_one(7).get(), 7);
    }

    #[test]
    fn new_entity_starts_unmeasured_and_unselected() {
        let e = entity("hello", "");
        assert!(e.cached_height().is_unmeasured());
        assert!(!e.is_selected());
        assert!(!e.is_expanded());
        assert!(e.is_selectable());
    }

    #[test]
    fn has_details_follows_context() {
        assert!(!entity("m", "").has_details());
        assert!(entity("m", "at main.rs:1").has_details());
    }

    #[test]
    fn toggling_expanded_invalidates_height() {
        let mut e = entity("m", "ctx");
        e.store_height(RowHeight::ONE);

        e.set_expanded(true);

        assert!(e.cached_height().is_unmeasured());
    }

    #[test]
    fn setting_same_expanded_value_keeps_height() {
        let mut e = entity("m", "ctx");
        e.store_height(RowHeight::ONE);

        e.set_expanded(false);

        assert_eq!(e.cached_height(), RowHeight::ONE);
    }

    #[test]
    fn changing_message_invalidates_height() {
        let mut e = entity("m", "");
        e.store_height(RowHeight::ONE);

        e.set_message(Arc::from("another"));

        assert_eq!(e.message(), "another");
        assert!(e.cached_height().is_unmeasured());
    }

    #[test]
    fn separators_and_banners_are_not_selectable() {
        let mut sep = LogEntity::from_new(EntityId::new(0), NewEntry::separator());
        let mut banner = LogEntity::from_new(EntityId::new(1), NewEntry::banner("hi"));

        sep.set_selected(true);
        banner.set_selected(true);

        assert!(!sep.is_selected());
        assert!(!banner.is_selected());
        assert_eq!(sep.kind(), RowKind::Separator);
        assert_eq!(banner.kind(), RowKind::Banner);
    }
}
