//! Background filtering with a single pending slot.
//!
//! At most one job is in flight. Submissions that arrive while a job runs
//! replace the pending slot, so bursts of filter changes coalesce into a single
//! re-run. Results cross back to the main tick through an `mpsc` channel and
//! are observed by [`FilterEngine::poll`].

use super::predicate::filter_records;
use super::FilterSnapshot;
use crate::model::{EntityId, FilterError, StoreSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, warn};

/// Name of the filter worker thread.
pub const WORKER_THREAD_NAME: &str = "diagcon-filter";

/// Result of a filter job as handed to the main tick.
pub type JobResult = Result<FilterOutcome, FilterError>;

/// Immutable, order-preserving subsequence of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredView(Arc<[EntityId]>);

impl FilteredView {
    /// View with no rows.
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no row is visible.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Identifier at a view position.
    pub fn get(&self, index: usize) -> Option<EntityId> {
        self.0.get(index).copied()
    }

    /// Identifiers in view order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.0.iter().copied()
    }

    /// Identifiers as a slice.
    pub fn as_slice(&self) -> &[EntityId] {
        &self.0
    }
}

impl Default for FilteredView {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<EntityId>> for FilteredView {
    fn from(ids: Vec<EntityId>) -> Self {
        Self(Arc::from(ids))
    }
}

/// A store snapshot paired with the settings to filter it by.
#[derive(Debug, Clone)]
pub struct FilterJob {
    snapshot: StoreSnapshot,
    settings: FilterSnapshot,
}

impl FilterJob {
    /// Build a job.
    pub fn new(snapshot: StoreSnapshot, settings: FilterSnapshot) -> Self {
        Self { snapshot, settings }
    }

    /// Settings the job filters by.
    pub fn settings(&self) -> &FilterSnapshot {
        &self.settings
    }

    /// Store epoch the job was built in.
    pub fn epoch(&self) -> u64 {
        self.snapshot.epoch()
    }

    /// Run the predicate over the snapshot.
    ///
    /// # Errors
    ///
    /// [`FilterError::TornSnapshot`] if the snapshot boundary is past the
    /// records it carries.
    pub fn run(&self) -> JobResult {
        let records = self
            .snapshot
            .records()
            .ok_or(FilterError::TornSnapshot {
                claimed: self.snapshot.len(),
                available: self.snapshot.available(),
            })?;
        let ids = filter_records(records, &self.settings);
        Ok(FilterOutcome {
            view: FilteredView::from(ids),
            settings: self.settings.clone(),
            epoch: self.snapshot.epoch(),
            scanned: records.len(),
        })
    }
}

/// A completed filter job.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Matching rows in store order.
    pub view: FilteredView,
    /// Settings the job ran with.
    pub settings: FilterSnapshot,
    /// Store epoch the job ran against.
    pub epoch: u64,
    /// Number of store rows the job covered.
    pub scanned: usize,
}

/// Where filter jobs run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// On a dedicated worker thread.
    #[default]
    Background,
    /// Synchronously inside `submit`.
    Inline,
}

/// Error parsing a [`FilterMode`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter mode '{0}' (expected 'background' or 'inline')")]
pub struct UnknownFilterMode(pub String);

impl FromStr for FilterMode {
    type Err = UnknownFilterMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "background" => Ok(FilterMode::Background),
            "inline" => Ok(FilterMode::Inline),
            _ => Err(UnknownFilterMode(s.to_string())),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Background => f.write_str("background"),
            FilterMode::Inline => f.write_str("inline"),
        }
    }
}

/// Counters describing what the engine did with its submissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    /// Jobs actually run.
    pub dispatched: usize,
    /// Results handed out by [`FilterEngine::poll`].
    pub delivered: usize,
    /// Completed results discarded because the pending job had other settings.
    pub superseded: usize,
    /// Submissions that replaced a job waiting in the pending slot.
    pub coalesced: usize,
}

type JobHook = Box<dyn Fn() + Send>;

struct Worker {
    jobs: Option<Sender<FilterJob>>,
    results: Receiver<JobResult>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    fn spawn(hook: Option<JobHook>) -> io::Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<FilterJob>();
        // One job in flight means at most one result outstanding.
        let (result_tx, result_rx): (SyncSender<JobResult>, _) = mpsc::sync_channel(1);

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                for job in job_rx {
                    if let Some(hook) = &hook {
                        hook();
                    }
                    if result_tx.send(job.run()).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            jobs: Some(job_tx),
            results: result_rx,
            handle: Some(handle),
        })
    }

    fn send(&self, job: FilterJob) -> bool {
        self.jobs
            .as_ref()
            .is_some_and(|jobs| jobs.send(job).is_ok())
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop.
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                debug!("Filter worker had panicked before shutdown");
            }
        }
    }
}

/// Runs filter jobs off the main tick and hands results back exactly once.
pub struct FilterEngine {
    worker: Option<Worker>,
    running: Option<FilterJob>,
    pending: Option<FilterJob>,
    ready: Option<JobResult>,
    stats: EngineStats,
}

impl fmt::Debug for FilterEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterEngine")
            .field("mode", &self.mode())
            .field("running", &self.running.is_some())
            .field("pending", &self.pending.is_some())
            .field("stats", &self.stats)
            .finish()
    }
}

impl FilterEngine {
    /// Engine for the requested mode.
    pub fn new(mode: FilterMode) -> Self {
        match mode {
            FilterMode::Background => Self::background(),
            FilterMode::Inline => Self::inline(),
        }
    }

    /// Engine with a worker thread. Falls back to inline filtering if the
    /// thread cannot be spawned.
    pub fn background() -> Self {
        Self::spawned(None)
    }

    /// Engine that filters synchronously inside [`FilterEngine::submit`].
    pub fn inline() -> Self {
        Self {
            worker: None,
            running: None,
            pending: None,
            ready: None,
            stats: EngineStats::default(),
        }
    }

    /// Background engine whose worker calls `hook` before every job.
    #[cfg(test)]
    pub(crate) fn background_with_hook(hook: JobHook) -> Self {
        Self::spawned(Some(hook))
    }

    fn spawned(hook: Option<JobHook>) -> Self {
        let mut engine = Self::inline();
        match Worker::spawn(hook) {
            Ok(worker) => engine.worker = Some(worker),
            Err(err) => warn!(
                error = %err,
                "Could not start filter worker; filtering inline"
            ),
        }
        engine
    }

    /// Where jobs currently run.
    pub fn mode(&self) -> FilterMode {
        if self.worker.is_some() {
            FilterMode::Background
        } else {
            FilterMode::Inline
        }
    }

    /// Submit a job.
    ///
    /// Inline: runs now, result available on the next poll. Background: runs
    /// now if the worker is idle, otherwise replaces the pending slot.
    pub fn submit(&mut self, job: FilterJob) {
        if self.worker.is_none() {
            self.dispatch(job);
            return;
        }
        if self.running.is_some() {
            if self.pending.replace(job).is_some() {
                self.stats.coalesced += 1;
            }
        } else {
            self.dispatch(job);
        }
    }

    /// Next deliverable result, if any. Never blocks.
    pub fn poll(&mut self) -> Option<JobResult> {
        if let Some(result) = self.ready.take() {
            return Some(self.deliver(result));
        }

        let received = match &self.worker {
            Some(worker) => worker.results.try_recv(),
            None => return None,
        };

        match received {
            Ok(result) => {
                self.running = None;
                let next = self.pending.take();
                let superseded = match (&result, &next) {
                    (Ok(outcome), Some(next)) => outcome.settings != *next.settings(),
                    _ => false,
                };
                if let Some(next) = next {
                    self.dispatch(next);
                }
                if superseded {
                    self.stats.superseded += 1;
                    debug!("Discarding filter result superseded by newer settings");
                    return None;
                }
                Some(self.deliver(result))
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.worker_lost();
                self.ready.take().map(|result| self.deliver(result))
            }
        }
    }

    /// Whether a job is running, waiting, or has an undelivered result.
    pub fn is_busy(&self) -> bool {
        self.running.is_some() || self.pending.is_some() || self.ready.is_some()
    }

    /// Submission counters.
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    fn dispatch(&mut self, job: FilterJob) {
        self.stats.dispatched += 1;
        debug!(
            epoch = job.epoch(),
            search = %job.settings().settings().search,
            "Dispatching filter job"
        );
        let sent = match &self.worker {
            Some(worker) => {
                self.running = Some(job.clone());
                worker.send(job)
            }
            None => {
                if self.ready.replace(job.run()).is_some() {
                    self.stats.coalesced += 1;
                }
                return;
            }
        };
        if !sent {
            self.worker_lost();
        }
    }

    fn deliver(&mut self, result: JobResult) -> JobResult {
        self.stats.delivered += 1;
        result
    }

    /// Downgrade to inline mode and re-run the newest outstanding job.
    fn worker_lost(&mut self) {
        error!("Filter worker is gone; switching to inline filtering");
        self.worker = None;
        let running = self.running.take();
        if let Some(job) = self.pending.take().or(running) {
            self.ready = Some(job.run());
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
