//! Arena that owns every console row.
//!
//! The authoritative collection is the store itself, in insertion order. The
//! filtered view and the filter worker only ever see [`EntityId`]s.

use super::{Category, EntityId, LogEntity, NewEntry};
use std::sync::Arc;

/// Immutable, filter-relevant part of a row.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRecord {
    /// Row identifier.
    pub id: EntityId,
    /// Category.
    pub category: Category,
    /// Message text, shared with the entity.
    pub message: Arc<str>,
}

/// Read-only view of the store handed to a filter job.
///
/// Holds the record list observed at submission time together with the
/// length that was current then.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    records: Arc<Vec<IndexRecord>>,
    len: usize,
    epoch: u64,
}

impl StoreSnapshot {
    /// Build a snapshot from parts. A `len` larger than `records` is a torn
    /// snapshot and will be rejected by the filter job.
    pub fn from_parts(records: Arc<Vec<IndexRecord>>, len: usize, epoch: u64) -> Self {
        Self {
            records,
            len,
            epoch,
        }
    }

    /// Records inside the submission boundary, or `None` if the boundary is
    /// past the end of the records.
    pub fn records(&self) -> Option<&[IndexRecord]> {
        self.records.get(..self.len)
    }

    /// Length observed at submission.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the snapshot has no rows.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of records actually carried.
    pub fn available(&self) -> usize {
        self.records.len()
    }

    /// Store epoch the snapshot was taken in.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Arena of [`LogEntity`] rows.
///
/// Append-only except for [`EntityStore::clear`], which bumps the epoch so
/// identifiers and snapshots from before the clear can be recognised as stale.
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: Vec<LogEntity>,
    // Copy-on-write: cloned only if a filter job still holds the previous Arc.
    index: Arc<Vec<IndexRecord>>,
    epoch: u64,
}

impl EntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row and return its identifier.
    pub fn push(&mut self, entry: NewEntry) -> EntityId {
        let id = EntityId::new(self.entities.len());
        let entity = LogEntity::from_new(id, entry);
        Arc::make_mut(&mut self.index).push(IndexRecord {
            id,
            category: entity.category(),
            message: entity.message_arc(),
        });
        self.entities.push(entity);
        id
    }

    /// Row by identifier.
    pub fn get(&self, id: EntityId) -> Option<&LogEntity> {
        self.entities.get(id.index())
    }

    /// Mutable row by identifier.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut LogEntity> {
        self.entities.get_mut(id.index())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntity> {
        self.entities.iter()
    }

    /// Mutable rows in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LogEntity> {
        self.entities.iter_mut()
    }

    /// Snapshot for a filter job.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot::from_parts(Arc::clone(&self.index), self.index.len(), self.epoch)
    }

    /// Replace a row's message, keeping the filter index in sync.
    ///
    /// Returns `false` if the identifier is unknown.
    pub fn update_message(&mut self, id: EntityId, message: impl Into<String>) -> bool {
        let Some(entity) = self.entities.get_mut(id.index()) else {
            return false;
        };
        let message: Arc<str> = Arc::from(message.into());
        entity.set_message(Arc::clone(&message));
        if let Some(record) = Arc::make_mut(&mut self.index).get_mut(id.index()) {
            record.message = message;
        }
        true
    }

    /// Drop every row and start a new epoch.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.index = Arc::new(Vec::new());
        self.epoch += 1;
    }

    /// Current epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
