//! The visibility predicate.

use super::FilterSnapshot;
use crate::model::{Category, EntityId, IndexRecord};

/// Whether a row with this category and message is visible under `snapshot`.
///
/// Categories without a filter class (informational, internal) always match.
/// Otherwise the class must be shown and, if the search string is non-empty,
/// the message must contain it.
pub fn matches(category: Category, message: &str, snapshot: &FilterSnapshot) -> bool {
    let Some(class) = category.filter_class() else {
        return true;
    };
    if !snapshot.settings().shows(class) {
        return false;
    }
    let needle = snapshot.needle();
    if needle.is_empty() {
        return true;
    }
    if snapshot.settings().case_insensitive {
        message.to_lowercase().contains(needle)
    } else {
        message.contains(needle)
    }
}

/// Identifiers of the matching records, in record order.
pub fn filter_records(records: &[IndexRecord], snapshot: &FilterSnapshot) -> Vec<EntityId> {
    records
        .iter()
        .filter(|record| matches(record.category, &record.message, snapshot))
        .map(|record| record.id)
        .collect()
}
