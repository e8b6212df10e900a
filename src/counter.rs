//! Rolling ingestion tally by counter bucket.

use crate::model::{Bucket, Category};
use serde::Serialize;

/// Four monotonically increasing counters over the store's lifetime.
///
/// Reflects ingestion, not visibility: filtering never changes it. Reset only
/// by [`LogCounter::clear`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LogCounter {
    debug: usize,
    warning: usize,
    error: usize,
    command: usize,
}

impl LogCounter {
    /// All counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one ingested row. Categories without a bucket count nothing.
    pub fn append_log(&mut self, category: Category) {
        if let Some(bucket) = category.bucket() {
            *self.slot(bucket) += 1;
        }
    }

    /// Zero every bucket.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Value of one bucket.
    pub fn get(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::Debug => self.debug,
            Bucket::Warning => self.warning,
            Bucket::Error => self.error,
            Bucket::Command => self.command,
        }
    }

    /// Debug/log lines ingested.
    pub fn debug(&self) -> usize {
        self.debug
    }

    /// Warnings ingested.
    pub fn warning(&self) -> usize {
        self.warning
    }

    /// Errors ingested.
    pub fn error(&self) -> usize {
        self.error
    }

    /// Command echoes ingested.
    pub fn command(&self) -> usize {
        self.command
    }

    fn slot(&mut self, bucket: Bucket) -> &mut usize {
        match bucket {
            Bucket::Debug => &mut self.debug,
            Bucket::Warning => &mut self.warning,
            Bucket::Error => &mut self.error,
            Bucket::Command => &mut self.command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_category_increments_its_bucket_only() {
        let mut counter = LogCounter::new();

        counter.append_log(Category::Log);
        counter.append_log(Category::Warning);
        counter.append_log(Category::Warning);
        counter.append_log(Category::Error);
        counter.append_log(Category::Command);

        assert_eq!(counter.debug(), 1);
        assert_eq!(counter.warning(), 2);
        assert_eq!(counter.error(), 1);
        assert_eq!(counter.command(), 1);
    }

    #[test]
    fn info_and_internal_count_nothing() {
        let mut counter = LogCounter::new();

        counter.append_log(Category::Info);
        counter.append_log(Category::Internal);

        assert_eq!(counter, LogCounter::default());
    }

    #[test]
    fn get_matches_named_accessors() {
        let mut counter = LogCounter::new();
        counter.append_log(Category::Error);

        assert_eq!(counter.get(Bucket::Error), counter.error());
        assert_eq!(counter.get(Bucket::Debug), 0);
    }

    #[test]
    fn clear_zeroes_every_bucket() {
        let mut counter = LogCounter::new();
        for category in Category::ALL {
            counter.append_log(category);
        }

        counter.clear();

        assert_eq!(counter, LogCounter::default());
    }
}
