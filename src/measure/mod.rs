//! Row height measurement and memoization.
//!
//! Heights are memoized on the entity itself ([`LogEntity::cached_height`]) and
//! recomputed only after the entity's message, its expansion state, or the
//! global reference width changes.

pub mod wrap;

pub use wrap::{TextMeasurer, WrappedTextMeasurer};

use crate::model::{EntityStore, LogEntity, RowHeight, RowKind};
use std::fmt;

/// Height of a separator row.
pub const SEPARATOR_HEIGHT: RowHeight = RowHeight::ONE;

/// Height of the welcome banner: the banner text plus a blank line.
pub const BANNER_HEIGHT: u16 = 2;

/// Measures entities against a reference width and memoizes the result.
pub struct HeightCache {
    measurer: Box<dyn TextMeasurer>,
    reference_width: u16,
    line_height: u16,
}

impl fmt::Debug for HeightCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeightCache")
            .field("reference_width", &self.reference_width)
            .field("line_height", &self.line_height)
            .finish_non_exhaustive()
    }
}

impl HeightCache {
    /// Cache using [`WrappedTextMeasurer`] at the given width.
    pub fn new(reference_width: u16) -> Self {
        Self::with_measurer(Box::new(WrappedTextMeasurer), reference_width)
    }

    /// Cache using a custom measurer.
    pub fn with_measurer(measurer: Box<dyn TextMeasurer>, reference_width: u16) -> Self {
        Self {
            measurer,
            reference_width,
            line_height: 1,
        }
    }

    /// Set layout units per text line. Zero is treated as one.
    pub fn with_line_height(mut self, line_height: u16) -> Self {
        self.line_height = line_height.max(1);
        self
    }

    /// Width rows are measured against.
    pub fn reference_width(&self) -> u16 {
        self.reference_width
    }

    /// Layout units per text line.
    pub fn line_height(&self) -> u16 {
        self.line_height
    }

    /// Memoized height of `entity`, measuring it first if needed.
    pub fn height_for(&self, entity: &mut LogEntity) -> RowHeight {
        let cached = entity.cached_height();
        if !cached.is_unmeasured() {
            return cached;
        }
        let height = self.measure(entity);
        entity.store_height(height);
        height
    }

    /// Measure `entity` without consulting or updating its cache.
    pub fn measure(&self, entity: &LogEntity) -> RowHeight {
        match entity.kind() {
            RowKind::Separator => SEPARATOR_HEIGHT,
            RowKind::Banner => RowHeight::at_least_one(BANNER_HEIGHT),
            RowKind::Entry => {
                let mut lines = self
                    .measurer
                    .line_count(entity.message(), self.reference_width);
                if entity.is_expanded() && entity.has_details() {
                    lines += self
                        .measurer
                        .line_count(entity.context(), self.reference_width);
                }
                let units = lines.saturating_mul(usize::from(self.line_height));
                RowHeight::at_least_one(u16::try_from(units).unwrap_or(u16::MAX))
            }
        }
    }

    /// Drop one entity's memoized height.
    pub fn invalidate(&self, entity: &mut LogEntity) {
        entity.invalidate_height();
    }

    /// Drop every memoized height in the store.
    pub fn invalidate_all(&self, store: &mut EntityStore) {
        for entity in store.iter_mut() {
            entity.invalidate_height();
        }
    }

    /// Change the reference width. Returns `true` (and invalidates every
    /// height) if the width actually changed.
    pub fn set_reference_width(&mut self, width: u16, store: &mut EntityStore) -> bool {
        if width == self.reference_width {
            return false;
        }
        self.reference_width = width;
        self.invalidate_all(store);
        true
    }
}

#[cfg(test)]
#[path = "measure_tests.rs"]
mod tests;
