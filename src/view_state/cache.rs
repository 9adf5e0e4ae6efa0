//! Row height cache with a one-correction-per-version guard.
//!
//! Heights are memoized per `(row id, width bucket, layout hash)`. A row has at
//! most one live key: storing under a new key evicts the stale entry and
//! resets the row's correction budget. Intrinsic-size corrections replayed by
//! the rendering layer are accepted once per key; later ones are dropped so a
//! measure/correct cycle cannot oscillate.

use crate::view_state::row::Row;
use crate::view_state::types::{RowHeight, RowId, WidthBucket};
use std::collections::{HashMap, HashSet};

/// Cache key: a row's content version at a given width.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeightCacheKey {
    /// Row identifier.
    pub row_id: RowId,
    /// Width bucket the height was measured at.
    pub width_bucket: WidthBucket,
    /// Layout hash of the measured row.
    pub layout_hash: u64,
}

impl HeightCacheKey {
    /// Create a key.
    pub fn new(row_id: RowId, width_bucket: WidthBucket, layout_hash: u64) -> Self {
        Self {
            row_id,
            width_bucket,
            layout_hash,
        }
    }

    /// Key of `row` as currently projected at `width_bucket`.
    pub fn for_row(row: &Row, width_bucket: WidthBucket) -> Self {
        Self::new(row.id().clone(), width_bucket, row.layout_hash())
    }
}

/// Cached height plus whether a correction has already been accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightCacheEntry {
    /// Last stored height.
    pub height: RowHeight,
    /// A correction was accepted for this key.
    pub corrected: bool,
}

/// Height memo outliving individual projections.
#[derive(Debug, Clone, Default)]
pub struct HeightCache {
    entries: HashMap<HeightCacheKey, HeightCacheEntry>,
    current_keys: HashMap<RowId, HeightCacheKey>,
}

impl HeightCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached height for `key`.
    pub fn height(&self, key: &HeightCacheKey) -> Option<RowHeight> {
        self.entries.get(key).map(|entry| entry.height)
    }

    /// Cached entry for `key`.
    pub fn entry(&self, key: &HeightCacheKey) -> Option<&HeightCacheEntry> {
        self.entries.get(key)
    }

    /// Store a measured height.
    ///
    /// Re-storing under the row's current key overwrites the height and keeps
    /// the correction flag; a different key evicts the row's stale entry.
    pub fn store(&mut self, height: RowHeight, key: HeightCacheKey) {
        self.rekey(&key);
        self.entries
            .entry(key)
            .and_modify(|entry| entry.height = height)
            .or_insert(HeightCacheEntry {
                height,
                corrected: false,
            });
    }

    /// Replay an intrinsic-size correction. Returns whether it was accepted.
    ///
    /// The first correction for a key is accepted (and stored even if the key
    /// was never measured). Every later correction for the same key is
    /// rejected and leaves the cache unchanged.
    pub fn store_correction(&mut self, height: RowHeight, key: HeightCacheKey) -> bool {
        if self.entries.get(&key).is_some_and(|entry| entry.corrected) {
            return false;
        }
        self.rekey(&key);
        self.entries.insert(
            key,
            HeightCacheEntry {
                height,
                corrected: true,
            },
        );
        true
    }

    /// Drop everything cached for `row_id`.
    pub fn invalidate(&mut self, row_id: &RowId) {
        if let Some(key) = self.current_keys.remove(row_id) {
            self.entries.remove(&key);
        }
    }

    /// Keep only rows in `valid_ids`.
    pub fn prune<'a, I>(&mut self, valid_ids: I)
    where
        I: IntoIterator<Item = &'a RowId>,
    {
        let valid: HashSet<&RowId> = valid_ids.into_iter().collect();
        self.current_keys.retain(|id, _| valid.contains(id));
        self.entries.retain(|key, _| valid.contains(&key.row_id));
    }

    /// Height of `rows[index]` at `width_bucket`, or the placeholder when the
    /// index is out of range or the row is unmeasured.
    pub fn height_at_index(&self, rows: &[Row], index: usize, width_bucket: WidthBucket) -> RowHeight {
        rows.get(index)
            .and_then(|row| self.height(&HeightCacheKey::for_row(row, width_bucket)))
            .unwrap_or(RowHeight::PLACEHOLDER)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_keys.clear();
    }

    /// Make `key` the row's current key, evicting a stale one.
    fn rekey(&mut self, key: &HeightCacheKey) {
        match self.current_keys.get(&key.row_id) {
            Some(current) if current == key => {}
            Some(stale) => {
                self.entries.remove(stale);
                self.current_keys.insert(key.row_id.clone(), key.clone());
            }
            None => {
                self.current_keys.insert(key.row_id.clone(), key.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view_state::row::RowPayload;

    fn h(value: f64) -> RowHeight {
        RowHeight::new(value).expect("valid test height")
    }

    fn key(id: &str, bucket: u32, layout: u64) -> HeightCacheKey {
        HeightCacheKey::new(RowId::rollup(id), WidthBucket::new(bucket), layout)
    }

    // ===== store / height =====

    #[test]
    fn store_then_lookup() {
        let mut cache = HeightCache::new();
        cache.store(h(42.0), key("a", 20, 1));
        assert_eq!(cache.height(&key("a", 20, 1)), Some(h(42.0)));
        assert_eq!(cache.height(&key("a", 21, 1)), None);
    }

    #[test]
    fn new_key_for_same_row_evicts_stale_entry() {
        let mut cache = HeightCache::new();
        cache.store(h(10.0), key("a", 20, 1));
        cache.store(h(30.0), key("a", 20, 2));
        assert_eq!(cache.height(&key("a", 20, 1)), None);
        assert_eq!(cache.height(&key("a", 20, 2)), Some(h(30.0)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn keys_of_different_rows_coexist() {
        let mut cache = HeightCache::new();
        cache.store(h(10.0), key("a", 20, 1));
        cache.store(h(12.0), key("b", 20, 1));
        assert_eq!(cache.len(), 2);
    }

    // ===== Corrections =====

    #[test]
    fn first_correction_accepted_second_rejected() {
        let mut cache = HeightCache::new();
        let k = key("a", 20, 1);
        cache.store(h(40.0), k.clone());
        assert!(cache.store_correction(h(44.0), k.clone()));
        assert!(!cache.store_correction(h(40.0), k.clone()));
        assert_eq!(cache.height(&k), Some(h(44.0)));
        assert!(cache.entry(&k).is_some_and(|e| e.corrected));
    }

    #[test]
    fn correction_without_prior_measurement_is_accepted() {
        let mut cache = HeightCache::new();
        let k = key("a", 20, 1);
        assert!(cache.store_correction(h(12.0), k.clone()));
        assert_eq!(cache.height(&k), Some(h(12.0)));
    }

    #[test]
    fn restore_under_same_key_keeps_correction_budget_spent() {
        let mut cache = HeightCache::new();
        let k = key("a", 20, 1);
        cache.store(h(40.0), k.clone());
        assert!(cache.store_correction(h(44.0), k.clone()));
        cache.store(h(41.0), k.clone());
        assert!(!cache.store_correction(h(45.0), k.clone()));
        assert_eq!(cache.height(&k), Some(h(41.0)));
    }

    #[test]
    fn key_change_resets_correction_budget() {
        let mut cache = HeightCache::new();
        assert!(cache.store_correction(h(10.0), key("a", 20, 1)));
        cache.store(h(20.0), key("a", 20, 2));
        assert!(cache.store_correction(h(22.0), key("a", 20, 2)));
        assert!(!cache.store_correction(h(23.0), key("a", 20, 2)));
    }

    // ===== invalidate / prune =====

    #[test]
    fn invalidate_removes_row() {
        let mut cache = HeightCache::new();
        cache.store(h(10.0), key("a", 20, 1));
        cache.store(h(10.0), key("b", 20, 1));
        cache.invalidate(&RowId::rollup("a"));
        assert_eq!(cache.height(&key("a", 20, 1)), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn prune_keeps_only_valid_rows() {
        let mut cache = HeightCache::new();
        for id in ["a", "b", "c"] {
            cache.store(h(10.0), key(id, 20, 1));
        }
        let keep = [RowId::rollup("b")];
        cache.prune(keep.iter());
        assert_eq!(cache.len(), 1);
        assert!(cache.height(&key("b", 20, 1)).is_some());
    }

    #[test]
    fn clear_empties_cache() {
        let mut cache = HeightCache::new();
        cache.store(h(10.0), key("a", 20, 1));
        cache.clear();
        assert!(cache.is_empty());
    }

    // ===== height_at_index =====

    #[test]
    fn height_at_index_falls_back_to_placeholder() {
        let mut cache = HeightCache::new();
        let rows = vec![Row::new(RowId::bottom_spacer(), RowPayload::BottomSpacer, 1, 2)];
        let bucket = WidthBucket::new(20);
        assert_eq!(cache.height_at_index(&rows, 0, bucket), RowHeight::PLACEHOLDER);
        assert_eq!(cache.height_at_index(&rows, 7, bucket), RowHeight::PLACEHOLDER);

        cache.store(h(16.0), HeightCacheKey::for_row(&rows[0], bucket));
        assert_eq!(cache.height_at_index(&rows, 0, bucket), h(16.0));
    }
}
