//! Scroll state of the console list.
//!
//! [`TerminalSurface`] is the console's [`VirtualizationSurface`] in the
//! terminal: it receives item-count changes and relayout requests, tracks the
//! cursor and the first visible row, and keeps a [`RowOffsets`] index so
//! line-based movement (paging, the scrollbar) works without measuring every
//! row.

use super::row_offsets::RowOffsets;
use crate::console::{ListDataSource, VirtualizationSurface};
use crate::filter::FilteredView;
use crate::model::{ConsoleError, EntityId};
use tracing::debug;

/// A row that fits (at least partly) in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    /// Position in the filtered view.
    pub index: usize,
    /// Measured height in lines.
    pub height: u16,
}

/// Terminal-side scroll and layout state.
#[derive(Debug, Clone)]
pub struct TerminalSurface {
    offsets: RowOffsets,
    top: usize,
    cursor: usize,
    follow: bool,
    viewport_height: u16,
    dirty: bool,
    /// View the offsets and positions refer to.
    view: FilteredView,
    /// Rows under the cursor and at the top when the item count first
    /// changed after the last sync.
    anchors: Option<(Option<EntityId>, Option<EntityId>)>,
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalSurface {
    /// Empty surface following new output.
    pub fn new() -> Self {
        Self {
            offsets: RowOffsets::new(),
            top: 0,
            cursor: 0,
            follow: true,
            viewport_height: 0,
            dirty: true,
            view: FilteredView::empty(),
            anchors: None,
        }
    }

    /// Rows in the list.
    pub fn item_count(&self) -> usize {
        self.offsets.len()
    }

    /// Row under the cursor, if any.
    pub fn cursor(&self) -> Option<usize> {
        (!self.offsets.is_empty()).then_some(self.cursor)
    }

    /// First visible row.
    pub fn top(&self) -> usize {
        self.top
    }

    /// Whether new rows scroll into view automatically.
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Whether something changed since the last [`TerminalSurface::take_dirty`].
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Lines available to rows.
    pub fn set_viewport_height(&mut self, height: u16) {
        if height != self.viewport_height {
            self.viewport_height = height;
            self.dirty = true;
        }
    }

    /// Line offset of the first visible row and total list height, for the
    /// scrollbar.
    pub fn scroll_position(&self) -> (usize, usize) {
        (self.offsets.offset_of(self.top), self.offsets.total())
    }

    /// Move the cursor by `delta` rows. Moving off the last row is allowed
    /// and resumes following.
    pub fn move_cursor(&mut self, delta: isize) {
        let Some(last) = self.offsets.len().checked_sub(1) else {
            return;
        };
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
        self.follow = self.cursor == last && delta > 0;
        self.dirty = true;
    }

    /// Move the cursor by one viewport height of lines.
    pub fn page(&mut self, down: bool) {
        if self.offsets.is_empty() {
            return;
        }
        let page = usize::from(self.viewport_height.max(1));
        let start = self.offsets.offset_of(self.cursor);
        let target = if down {
            start.saturating_add(page)
        } else {
            start.saturating_sub(page)
        };
        let last = self.offsets.len() - 1;
        self.cursor = self.offsets.row_at(target).unwrap_or(last);
        self.follow = down && self.cursor == last;
        self.dirty = true;
    }

    /// Jump to the first row and stop following.
    pub fn to_top(&mut self) {
        self.cursor = 0;
        self.top = 0;
        self.follow = false;
        self.dirty = true;
    }

    /// Jump to the last row and follow.
    pub fn to_bottom(&mut self) {
        self.cursor = self.offsets.len().saturating_sub(1);
        self.follow = true;
        self.dirty = true;
    }

    /// Catch up with the console's filtered view.
    ///
    /// A pure append keeps every measured height. Any other change forgets
    /// them, and the cursor and top row move to the rows that held them
    /// before (or the next visible row if those were filtered out).
    pub fn sync_view(&mut self, current: &FilteredView) {
        let anchors = self.anchors.take();
        if std::ptr::eq(self.view.as_slice(), current.as_slice()) {
            return;
        }
        let appended = current.as_slice().starts_with(self.view.as_slice());
        if !appended {
            let (cursor_id, top_id) =
                anchors.unwrap_or_else(|| (self.view.get(self.cursor), self.view.get(self.top)));
            self.offsets.reset(current.len());
            let last = current.len().saturating_sub(1);
            let position = |id: Option<EntityId>, fallback: usize| match id {
                Some(id) => match current.as_slice().binary_search(&id) {
                    Ok(index) | Err(index) => index.min(last),
                },
                None => fallback.min(last),
            };
            if self.follow {
                self.cursor = last;
            } else {
                self.cursor = position(cursor_id, self.cursor);
                self.top = position(top_id, self.top).min(self.cursor);
            }
            debug!(rows = current.len(), cursor = self.cursor, "View replaced");
        }
        self.offsets.resize(current.len());
        self.view = current.clone();
        self.dirty = true;
    }

    /// Measure the rows around the cursor, scroll so the cursor is visible,
    /// and return the rows that fit in the viewport, top to bottom.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::IndexOutOfRange`] if the console and the surface
    /// disagree about the item count.
    pub fn layout(&mut self, console: &mut ListDataSource) -> Result<Vec<VisibleRow>, ConsoleError> {
        self.sync_view(console.filtered_view());
        let len = self.offsets.len();
        if len == 0 || self.viewport_height == 0 {
            return Ok(Vec::new());
        }
        let viewport = usize::from(self.viewport_height);

        if self.follow {
            self.cursor = len - 1;
        }
        self.cursor = self.cursor.min(len - 1);

        // Scroll up to the cursor, or down until the cursor row ends inside
        // the viewport.
        if self.cursor < self.top || self.top >= len {
            self.top = self.cursor;
        } else {
            let mut used = 0;
            for index in (self.top..=self.cursor).rev() {
                used += usize::from(self.measure(console, index)?);
                if used > viewport && index < self.cursor {
                    self.top = index + 1;
                    break;
                }
            }
        }

        // Pull earlier rows in while there is room below the last one.
        let mut used: usize = 0;
        let mut visible = Vec::new();
        for index in self.top..len {
            let height = self.measure(console, index)?;
            visible.push(VisibleRow { index, height });
            used += usize::from(height);
            if used >= viewport {
                break;
            }
        }
        while used < viewport && self.top > 0 {
            let height = self.measure(console, self.top - 1)?;
            if used + usize::from(height) > viewport {
                break;
            }
            self.top -= 1;
            used += usize::from(height);
            visible.insert(
                0,
                VisibleRow {
                    index: self.top,
                    height,
                },
            );
        }

        Ok(visible)
    }

    fn measure(&mut self, console: &mut ListDataSource, index: usize) -> Result<u16, ConsoleError> {
        let height = console.height_for_index(index)?.get();
        self.offsets.set(index, height);
        Ok(height)
    }
}

impl VirtualizationSurface for TerminalSurface {
    fn set_item_count(&mut self, count: usize) {
        if self.anchors.is_none() {
            self.anchors = Some((self.view.get(self.cursor), self.view.get(self.top)));
        }
        self.offsets.resize(count);
        let last = count.saturating_sub(1);
        if self.follow {
            self.cursor = last;
        }
        self.cursor = self.cursor.min(last);
        self.top = self.top.min(last);
        self.dirty = true;
    }

    fn scroll_to_bottom(&mut self) {
        self.to_bottom();
    }

    fn force_full_relayout(&mut self) {
        debug!(rows = self.offsets.len(), "Full relayout");
        self.offsets.reset(self.offsets.len());
        self.dirty = true;
    }

    fn request_relayout(&mut self, _index: usize) {
        // Visible rows are re-measured on every layout pass.
        self.dirty = true;
    }
}
