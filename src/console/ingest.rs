//! Cross-thread ingestion.

use crate::model::{Category, NewEntry};
use std::sync::mpsc::Sender;

/// Handle for appending entries from any thread.
///
/// Sends never block. Entries are picked up at the start of the console's
/// next tick and counted then.
#[derive(Debug, Clone)]
pub struct LogSender {
    tx: Sender<NewEntry>,
}

impl LogSender {
    pub(crate) fn new(tx: Sender<NewEntry>) -> Self {
        Self { tx }
    }

    /// Queue an entry. Returns `false` once the console has been dropped.
    pub fn send(
        &self,
        message: impl Into<String>,
        context: impl Into<String>,
        category: Category,
    ) -> bool {
        self.send_entry(NewEntry::new(message, context, category))
    }

    /// Queue a prepared entry. Returns `false` once the console has been dropped.
    pub fn send_entry(&self, entry: NewEntry) -> bool {
        self.tx.send(entry).is_ok()
    }
}
