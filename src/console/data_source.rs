//! The console orchestrator.
//!
//! [`ListDataSource`] buffers appended entries, flushes them into the store
//! once per tick, keeps the filtered view in step with the filter engine, and
//! answers the renderer's index-based queries.
//!
//! # Tick protocol
//!
//! 1. Drain entries queued through [`LogSender`]s into the pending batch.
//! 2. Flush the pending batch into the store and submit a filter job.
//! 3. Poll the engine; on a result from the current store epoch, swap the
//!    filtered view and publish the new item count.
//!
//! A flushed command echo scrolls the surface to the bottom once a filtered
//! view covering that echo has been swapped in.

use super::{LogSender, RowBinding, RowHandle, VirtualizationSurface};
use crate::counter::LogCounter;
use crate::filter::{
    EngineStats, FilterDelta, FilterEngine, FilterJob, FilterMode, FilterSettings, FilteredView,
};
use crate::measure::HeightCache;
use crate::model::{Category, ConsoleError, EntityId, EntityStore, LogEntity, NewEntry, RowHeight};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Default welcome banner text.
pub const DEFAULT_BANNER: &str = "diagcon - press : for commands, / to search, ? for help";

/// Construction parameters for [`ListDataSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleOptions {
    /// Initial filter settings.
    pub settings: FilterSettings,
    /// Where filter jobs run.
    pub filter_mode: FilterMode,
    /// Width rows are measured against.
    pub reference_width: u16,
    /// Layout units per text line.
    pub line_height: u16,
    /// Banner shown above a separator at startup. `None` starts empty.
    pub welcome_banner: Option<String>,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            settings: FilterSettings::default(),
            filter_mode: FilterMode::Background,
            reference_width: 80,
            line_height: 1,
            welcome_banner: Some(DEFAULT_BANNER.to_string()),
        }
    }
}

/// What a tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Entries moved from the pending batch into the store.
    pub flushed: usize,
    /// Whether a new filtered view was swapped in.
    pub swapped: bool,
}

/// Data source behind a virtualized console list.
#[derive(Debug)]
pub struct ListDataSource {
    store: EntityStore,
    pending: Vec<NewEntry>,
    filtered: FilteredView,
    settings: FilterSettings,
    engine: FilterEngine,
    counter: LogCounter,
    heights: HeightCache,
    selection_mode: bool,
    /// Store length covering the newest flushed command echo.
    scroll_target: Option<usize>,
    inbox: Receiver<NewEntry>,
    inbox_tx: Sender<NewEntry>,
    initial_rows: usize,
}

impl ListDataSource {
    /// Build a console, seed the banner rows, and submit the first filter job.
    pub fn new(options: ConsoleOptions) -> Self {
        let engine = FilterEngine::new(options.filter_mode);
        Self::with_engine(options, engine)
    }

    pub(crate) fn with_engine(options: ConsoleOptions, engine: FilterEngine) -> Self {
        let (inbox_tx, inbox) = mpsc::channel();
        let mut store = EntityStore::new();
        if let Some(banner) = options.welcome_banner {
            store.push(NewEntry::banner(banner));
            store.push(NewEntry::separator());
        }
        let initial_rows = store.len();
        let heights =
            HeightCache::new(options.reference_width).with_line_height(options.line_height);

        let mut console = Self {
            store,
            pending: Vec::new(),
            filtered: FilteredView::empty(),
            settings: options.settings,
            engine,
            counter: LogCounter::new(),
            heights,
            selection_mode: false,
            scroll_target: None,
            inbox,
            inbox_tx,
            initial_rows,
        };
        console.submit_filter();
        console
    }

    // ===== Ingestion =====

    /// Queue an entry for the next tick and count it now.
    pub fn append(
        &mut self,
        message: impl Into<String>,
        context: impl Into<String>,
        category: Category,
    ) {
        self.append_entry(NewEntry::new(message, context, category));
    }

    /// Queue a prepared entry for the next tick and count it now.
    pub fn append_entry(&mut self, entry: NewEntry) {
        self.counter.append_log(entry.category);
        self.pending.push(entry);
    }

    /// Handle for appending from other threads.
    pub fn sender(&self) -> LogSender {
        LogSender::new(self.inbox_tx.clone())
    }

    /// Advance the console by one frame. See the module docs.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::Filter`] if the delivered filter job was corrupt. The
    /// error is logged before it is returned and the previous view stays.
    pub fn tick(
        &mut self,
        surface: &mut dyn VirtualizationSurface,
    ) -> Result<TickReport, ConsoleError> {
        self.drain_inbox();
        let flushed = self.flush_pending();
        if flushed > 0 {
            self.submit_filter();
        }
        let swapped = self.poll_filter(surface)?;
        Ok(TickReport { flushed, swapped })
    }

    /// Tick until no filtering work remains.
    ///
    /// # Errors
    ///
    /// Propagates tick errors; [`ConsoleError::SettleTimeout`] if work is
    /// still outstanding after `timeout`.
    pub fn settle(
        &mut self,
        surface: &mut dyn VirtualizationSurface,
        timeout: Duration,
    ) -> Result<(), ConsoleError> {
        let deadline = Instant::now() + timeout;
        loop {
            self.tick(surface)?;
            if self.pending.is_empty() && !self.engine.is_busy() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ConsoleError::SettleTimeout(timeout));
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn drain_inbox(&mut self) {
        while let Ok(entry) = self.inbox.try_recv() {
            self.append_entry(entry);
        }
    }

    fn flush_pending(&mut self) -> usize {
        let flushed = self.pending.len();
        let mut saw_command = false;
        for entry in self.pending.drain(..) {
            saw_command |= entry.category.is_command_echo();
            self.store.push(entry);
        }
        if saw_command {
            self.scroll_target = Some(self.store.len());
        }
        flushed
    }

    fn submit_filter(&mut self) {
        let job = FilterJob::new(self.store.snapshot(), self.settings.snapshot());
        self.engine.submit(job);
    }

    fn poll_filter(&mut self, surface: &mut dyn VirtualizationSurface) -> Result<bool, ConsoleError> {
        let Some(result) = self.engine.poll() else {
            return Ok(false);
        };
        let outcome = result.map_err(|err| {
            error!(error = %err, "Filter job failed");
            ConsoleError::from(err)
        })?;

        if outcome.epoch != self.store.epoch() {
            debug!(
                job_epoch = outcome.epoch,
                store_epoch = self.store.epoch(),
                "Discarding filter result from before clear"
            );
            return Ok(false);
        }

        self.filtered = outcome.view;
        debug!(
            rows = self.filtered.len(),
            scanned = outcome.scanned,
            "Swapped filtered view"
        );
        surface.set_item_count(self.filtered.len());

        if let Some(target) = self.scroll_target {
            if outcome.scanned >= target {
                self.scroll_target = None;
                surface.scroll_to_bottom();
            }
        }
        Ok(true)
    }

    // ===== Filtering =====

    /// Change filter settings and resubmit. In inline mode the new view is
    /// swapped in before this returns.
    ///
    /// Returns whether the settings changed.
    ///
    /// # Errors
    ///
    /// As for [`ListDataSource::tick`].
    pub fn set_filter(
        &mut self,
        delta: FilterDelta,
        surface: &mut dyn VirtualizationSurface,
    ) -> Result<bool, ConsoleError> {
        let changed = self.settings.apply(delta);
        self.submit_filter();
        self.poll_filter(surface)?;
        Ok(changed)
    }

    /// Current filter settings.
    pub fn settings(&self) -> &FilterSettings {
        &self.settings
    }

    /// Whether filter work is outstanding.
    pub fn is_filtering(&self) -> bool {
        self.engine.is_busy()
    }

    /// Where filter jobs currently run.
    pub fn filter_mode(&self) -> FilterMode {
        self.engine.mode()
    }

    /// Filter engine counters.
    pub fn engine_stats(&self) -> EngineStats {
        self.engine.stats()
    }

    // ===== Renderer queries =====

    /// Number of rows in the filtered view.
    pub fn item_count(&self) -> usize {
        self.filtered.len()
    }

    /// Rows seeded at construction (banner and separator).
    pub fn initial_rows(&self) -> usize {
        self.initial_rows
    }

    /// The current filtered view.
    pub fn filtered_view(&self) -> &FilteredView {
        &self.filtered
    }

    /// Number of rows in the store.
    pub fn store_len(&self) -> usize {
        self.store.len()
    }

    /// Entity at a position in the filtered view.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::IndexOutOfRange`] if `index >= item_count()`.
    pub fn item_at_index(&self, index: usize) -> Result<&LogEntity, ConsoleError> {
        let id = self.id_at(index)?;
        self.store.get(id).ok_or(ConsoleError::UnknownEntity(id))
    }

    /// Height of the row at a position in the filtered view.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::IndexOutOfRange`] if `index >= item_count()`.
    pub fn height_for_index(&mut self, index: usize) -> Result<RowHeight, ConsoleError> {
        let id = self.id_at(index)?;
        let entity = self
            .store
            .get_mut(id)
            .ok_or(ConsoleError::UnknownEntity(id))?;
        Ok(self.heights.height_for(entity))
    }

    /// Bind a row widget to the row at `index`.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::IndexOutOfRange`] if `index >= item_count()`.
    pub fn bind_row_at_index(
        &mut self,
        index: usize,
        row: &mut dyn RowHandle,
    ) -> Result<(), ConsoleError> {
        let height = self.height_for_index(index)?;
        let entity = self.item_at_index(index)?;
        row.bind(RowBinding {
            index,
            entity,
            height,
            search: &self.settings.search,
            case_insensitive: self.settings.case_insensitive,
            selection_mode: self.selection_mode,
        });
        Ok(())
    }

    fn id_at(&self, index: usize) -> Result<EntityId, ConsoleError> {
        self.filtered.get(index).ok_or(ConsoleError::IndexOutOfRange {
            index,
            len: self.filtered.len(),
        })
    }

    fn entity_mut(&mut self, index: usize) -> Result<&mut LogEntity, ConsoleError> {
        let id = self.id_at(index)?;
        self.store.get_mut(id).ok_or(ConsoleError::UnknownEntity(id))
    }

    // ===== Layout =====

    /// Toggle the detail section of a row. Rows without details are left alone.
    ///
    /// Returns the new expansion state.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::IndexOutOfRange`] if `index >= item_count()`.
    pub fn toggle_expanded(
        &mut self,
        index: usize,
        surface: &mut dyn VirtualizationSurface,
    ) -> Result<bool, ConsoleError> {
        let entity = self.entity_mut(index)?;
        if !entity.has_details() {
            return Ok(entity.is_expanded());
        }
        let expanded = !entity.is_expanded();
        entity.set_expanded(expanded);
        self.notify_item_expanded_or_collapsed(index, surface)?;
        Ok(expanded)
    }

    /// A row's expansion changed: drop its height and ask for relayout.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::IndexOutOfRange`] if `index >= item_count()`.
    pub fn notify_item_expanded_or_collapsed(
        &mut self,
        index: usize,
        surface: &mut dyn VirtualizationSurface,
    ) -> Result<(), ConsoleError> {
        let entity = self.entity_mut(index)?;
        entity.invalidate_height();
        surface.request_relayout(index);
        Ok(())
    }

    /// Change the width rows are measured against. A change invalidates every
    /// height and forces a full relayout.
    pub fn set_reference_width(
        &mut self,
        width: u16,
        surface: &mut dyn VirtualizationSurface,
    ) -> bool {
        let changed = self.heights.set_reference_width(width, &mut self.store);
        if changed {
            debug!(width, "Reference width changed");
            surface.force_full_relayout();
        }
        changed
    }

    /// Width rows are measured against.
    pub fn reference_width(&self) -> u16 {
        self.heights.reference_width()
    }

    // ===== Selection =====

    /// Whether selection checkboxes are shown.
    pub fn selection_mode(&self) -> bool {
        self.selection_mode
    }

    /// Show or hide selection checkboxes.
    pub fn set_selection_mode(&mut self, enabled: bool) {
        self.selection_mode = enabled;
    }

    /// Select every selectable row in the filtered view. Returns how many
    /// rows are selected afterwards.
    pub fn select_all(&mut self) -> usize {
        self.set_all_selected(true);
        self.selected_items().len()
    }

    /// Deselect every row in the filtered view.
    pub fn reset_selection(&mut self) {
        self.set_all_selected(false);
    }

    /// Flip the selection of one row. Returns the new state.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::IndexOutOfRange`] if `index >= item_count()`.
    pub fn toggle_selected(&mut self, index: usize) -> Result<bool, ConsoleError> {
        let entity = self.entity_mut(index)?;
        let selected = !entity.is_selected();
        entity.set_selected(selected);
        Ok(entity.is_selected())
    }

    /// Selected rows in the filtered view, in view order.
    pub fn selected_items(&self) -> Vec<&LogEntity> {
        self.filtered
            .iter()
            .filter_map(|id| self.store.get(id))
            .filter(|entity| entity.is_selected())
            .collect()
    }

    /// Selected rows as plain text, one message per line. Expanded rows
    /// include their details.
    pub fn selected_text(&self) -> String {
        let mut lines = Vec::new();
        for entity in self.selected_items() {
            lines.push(entity.message());
            if entity.is_expanded() && entity.has_details() {
                lines.push(entity.context());
            }
        }
        lines.join("\n")
    }

    fn set_all_selected(&mut self, selected: bool) {
        for id in self.filtered.iter() {
            if let Some(entity) = self.store.get_mut(id) {
                entity.set_selected(selected);
            }
        }
    }

    // ===== Mutation =====

    /// Ingestion counters.
    pub fn counter(&self) -> LogCounter {
        self.counter
    }

    /// Replace a row's message. Returns `false` if the row does not exist.
    ///
    /// The row's height is invalidated and filtering is resubmitted, since
    /// the new text may match differently.
    pub fn update_message(
        &mut self,
        id: EntityId,
        message: impl Into<String>,
        surface: &mut dyn VirtualizationSurface,
    ) -> bool {
        if !self.store.update_message(id, message) {
            return false;
        }
        // The view is a subsequence of the store, so it is sorted by id.
        if let Ok(index) = self.filtered.as_slice().binary_search(&id) {
            surface.request_relayout(index);
        }
        self.submit_filter();
        true
    }

    /// Drop every row, pending entry and count. No undo.
    pub fn clear(&mut self, surface: &mut dyn VirtualizationSurface) {
        self.store.clear();
        self.pending.clear();
        while self.inbox.try_recv().is_ok() {}
        self.counter.clear();
        self.scroll_target = None;
        self.filtered = FilteredView::empty();
        surface.set_item_count(0);
        self.submit_filter();
        debug!(epoch = self.store.epoch(), "Console cleared");
    }
}

#[cfg(test)]
#[path = "data_source_tests.rs"]
mod tests;
