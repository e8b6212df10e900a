//! RowOffsets - O(log n) row offsets and offset lookup via Fenwick tree
//!
//! Maps between row indices and line offsets in the rendered list. Rows that
//! have not been measured yet count as [`ESTIMATED_ROW_HEIGHT`]; the estimate
//! is corrected when the row is actually measured.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `offset_of`: O(log n)
//! - `row_at`: O(log² n)
//! - `resize`: O(n)
//! - `total`: O(log n)

/// Height assumed for a row until it is measured.
pub const ESTIMATED_ROW_HEIGHT: u16 = 1;

/// Cumulative row heights for the filtered view.
#[derive(Debug, Clone, Default)]
pub struct RowOffsets {
    /// Fenwick tree over `heights` (0-indexed API of `fenwick::array`).
    tree: Vec<isize>,
    /// Current height of each row, measured or estimated.
    heights: Vec<u16>,
}

impl RowOffsets {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Returns true if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Current height of a row, if it exists.
    pub fn height(&self, index: usize) -> Option<u16> {
        self.heights.get(index).copied()
    }

    /// Change the number of rows. Heights of rows that remain are kept; new
    /// rows start at the estimate.
    pub fn resize(&mut self, len: usize) {
        if len == self.heights.len() {
            return;
        }
        self.heights.resize(len, ESTIMATED_ROW_HEIGHT);
        self.rebuild();
    }

    /// Forget every measurement.
    pub fn reset(&mut self, len: usize) {
        self.heights.clear();
        self.heights.resize(len, ESTIMATED_ROW_HEIGHT);
        self.rebuild();
    }

    /// Record the height of a row. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, height: u16) {
        let Some(current) = self.heights.get_mut(index) else {
            return;
        };
        let delta = height as isize - *current as isize;
        if delta != 0 {
            *current = height;
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Line offset at which the row at `index` starts.
    ///
    /// `offset_of(len())` is the total height.
    pub fn offset_of(&self, index: usize) -> usize {
        let index = index.min(self.len());
        if index == 0 {
            0
        } else {
            self.prefix(index - 1)
        }
    }

    /// Total height of all rows.
    pub fn total(&self) -> usize {
        self.offset_of(self.len())
    }

    /// Row covering line `offset`, or `None` past the end.
    ///
    /// Row `i` covers `[offset_of(i), offset_of(i + 1))`.
    pub fn row_at(&self, offset: usize) -> Option<usize> {
        let mut left = 0;
        let mut right = self.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix(mid) > offset {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len()).then_some(left)
    }

    fn prefix(&self, index: usize) -> usize {
        usize::try_from(fenwick::array::prefix_sum(&self.tree, index)).unwrap_or(0)
    }

    // Linear-time construction: each node adds itself into its parent.
    fn rebuild(&mut self) {
        let len = self.heights.len();
        self.tree.clear();
        self.tree
            .extend(self.heights.iter().map(|&h| h as isize));
        for i in 0..len {
            let parent = i | (i + 1);
            if parent < len {
                self.tree[parent] += self.tree[i];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn offsets(heights: &[u16]) -> RowOffsets {
        let mut index = RowOffsets::new();
        index.resize(heights.len());
        for (i, &h) in heights.iter().enumerate() {
            index.set(i, h);
        }
        index
    }

    #[test]
    fn empty_index() {
        let index = RowOffsets::new();
        assert!(index.is_empty());
        assert_eq!(index.total(), 0);
        assert_eq!(index.row_at(0), None);
    }

    #[test]
    fn new_rows_use_estimate() {
        let mut index = RowOffsets::new();
        index.resize(4);
        assert_eq!(index.total(), 4 * usize::from(ESTIMATED_ROW_HEIGHT));
        assert_eq!(index.height(3), Some(ESTIMATED_ROW_HEIGHT));
    }

    #[test]
    fn offsets_accumulate() {
        let index = offsets(&[3, 4, 5]);
        assert_eq!(index.offset_of(0), 0);
        assert_eq!(index.offset_of(1), 3);
        assert_eq!(index.offset_of(2), 7);
        assert_eq!(index.offset_of(3), 12);
        assert_eq!(index.total(), 12);
    }

    #[test]
    fn row_at_finds_covering_row() {
        let index = offsets(&[10, 20, 15]);
        assert_eq!(index.row_at(0), Some(0));
        assert_eq!(index.row_at(9), Some(0));
        assert_eq!(index.row_at(10), Some(1));
        assert_eq!(index.row_at(29), Some(1));
        assert_eq!(index.row_at(30), Some(2));
        assert_eq!(index.row_at(44), Some(2));
        assert_eq!(index.row_at(45), None);
    }

    #[test]
    fn set_corrects_estimate() {
        let mut index = offsets(&[1, 1, 1]);
        index.set(1, 6);
        assert_eq!(index.offset_of(2), 7);
        index.set(1, 2);
        assert_eq!(index.total(), 4);
    }

    #[test]
    fn resize_keeps_measured_prefix() {
        let mut index = offsets(&[5, 2]);
        index.resize(4);
        assert_eq!(index.height(0), Some(5));
        assert_eq!(index.height(1), Some(2));
        assert_eq!(index.total(), 5 + 2 + 2 * usize::from(ESTIMATED_ROW_HEIGHT));

        index.resize(1);
        assert_eq!(index.total(), 5);
    }

    #[test]
    fn reset_forgets_measurements() {
        let mut index = offsets(&[5, 2]);
        index.reset(2);
        assert_eq!(index.total(), 2 * usize::from(ESTIMATED_ROW_HEIGHT));
    }

    #[test]
    fn set_out_of_range_is_ignored() {
        let mut index = offsets(&[2]);
        index.set(5, 9);
        assert_eq!(index.total(), 2);
    }

    proptest! {
        #[test]
        fn offsets_match_naive_sums(
            heights in prop::collection::vec(1u16..40, 0..200),
            extra in 0usize..50,
        ) {
            let mut index = RowOffsets::new();
            index.resize(heights.len() / 2);
            index.resize(heights.len());
            for (i, &h) in heights.iter().enumerate() {
                index.set(i, h);
            }

            let mut running = 0usize;
            for (i, &h) in heights.iter().enumerate() {
                prop_assert_eq!(index.offset_of(i), running);
                prop_assert_eq!(index.row_at(running), Some(i));
                prop_assert_eq!(index.row_at(running + usize::from(h) - 1), Some(i));
                running += usize::from(h);
            }
            prop_assert_eq!(index.total(), running);
            prop_assert_eq!(index.row_at(running + extra), None);
        }
    }
}
