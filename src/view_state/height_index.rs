//! HeightIndex - O(log n) row offsets via Fenwick tree
//!
//! Maps row positions to vertical offsets (and back) for a projected row
//! list. Heights are fractional layout units; the tree stores them as whole
//! hundredths so prefix sums stay exact.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `top` / `bottom`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `push`: O(n log n) (the tree is rebuilt when it grows)
//! - `from_heights`: O(n log n)
//! - `total`: O(log n)

use crate::view_state::types::RowHeight;

/// Hundredths of a layout unit per stored tree unit.
const SCALE: f64 = 100.0;

// `RowHeight::MAX_VALUE` rows of 1e11 units each sum past `isize::MAX` only
// beyond ~9e7 rows on 64-bit targets.

fn to_units(height: RowHeight) -> isize {
    (height.get() * SCALE).round() as isize
}

fn from_units(units: isize) -> f64 {
    units.max(0) as f64 / SCALE
}

/// Prefix sums of row heights.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree (0-indexed API over the `fenwick` crate's layout).
    tree: Vec<isize>,
    /// Per-row heights in tree units.
    heights: Vec<isize>,
}

impl HeightIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index over `heights`, in row order.
    ///
    /// ```
    /// # use convo_timeline::view_state::height_index::HeightIndex;
    /// # use convo_timeline::view_state::types::RowHeight;
    /// let h = |v| RowHeight::new(v).unwrap();
    /// let index = HeightIndex::from_heights([h(10.0), h(20.5), h(15.0)]);
    /// assert_eq!(index.top(1), 10.0);
    /// assert_eq!(index.bottom(1), 30.5);
    /// assert_eq!(index.total(), 45.5);
    /// ```
    pub fn from_heights<I>(heights: I) -> Self
    where
        I: IntoIterator<Item = RowHeight>,
    {
        let heights: Vec<isize> = heights.into_iter().map(to_units).collect();
        let mut index = Self {
            tree: Vec::new(),
            heights,
        };
        index.rebuild();
        index
    }

    /// Append a row.
    pub fn push(&mut self, height: RowHeight) {
        self.heights.push(to_units(height));
        // Fenwick nodes cover ranges fixed by the array length, so growing
        // in place would leave new nodes missing earlier contributions.
        self.rebuild();
    }

    /// Replace the height of row `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, height: RowHeight) {
        let Some(current) = self.heights.get_mut(index) else {
            return;
        };
        let units = to_units(height);
        let delta = units - *current;
        *current = units;
        if delta != 0 {
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Height of row `index`, if present.
    pub fn height(&self, index: usize) -> Option<f64> {
        self.heights.get(index).map(|&units| from_units(units))
    }

    /// Offset of the top edge of row `index`. Indices past the end map to the
    /// total height.
    pub fn top(&self, index: usize) -> f64 {
        if index == 0 || self.heights.is_empty() {
            return 0.0;
        }
        self.sum_through(index.min(self.len()) - 1)
    }

    /// Offset of the bottom edge of row `index` (clamped to the last row).
    pub fn bottom(&self, index: usize) -> f64 {
        if self.heights.is_empty() {
            return 0.0;
        }
        self.sum_through(index.min(self.len() - 1))
    }

    /// Row containing vertical `offset`: the first row whose bottom edge lies
    /// below it. `None` when the index is empty or `offset >= total()`.
    ///
    /// ```
    /// # use convo_timeline::view_state::height_index::HeightIndex;
    /// # use convo_timeline::view_state::types::RowHeight;
    /// let h = |v| RowHeight::new(v).unwrap();
    /// let index = HeightIndex::from_heights([h(10.0), h(20.0), h(15.0)]);
    /// assert_eq!(index.lower_bound(0.0), Some(0));
    /// assert_eq!(index.lower_bound(10.0), Some(1));
    /// assert_eq!(index.lower_bound(29.9), Some(1));
    /// assert_eq!(index.lower_bound(45.0), None);
    /// ```
    pub fn lower_bound(&self, offset: f64) -> Option<usize> {
        if self.heights.is_empty() {
            return None;
        }
        let target = (offset.max(0.0) * SCALE).round() as isize;

        let mut left = 0;
        let mut right = self.len();
        while left < right {
            let mid = left + (right - left) / 2;
            if fenwick::array::prefix_sum(&self.tree, mid) > target {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len()).then_some(left)
    }

    /// Total height of all rows.
    pub fn total(&self) -> f64 {
        if self.heights.is_empty() {
            0.0
        } else {
            self.sum_through(self.len() - 1)
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Whether the index has no rows.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    fn sum_through(&self, index: usize) -> f64 {
        from_units(fenwick::array::prefix_sum(&self.tree, index))
    }

    fn rebuild(&mut self) {
        self.tree = vec![0; self.heights.len()];
        for (i, &units) in self.heights.iter().enumerate() {
            if units != 0 {
                fenwick::array::update(&mut self.tree, i, units);
            }
        }
    }
}
