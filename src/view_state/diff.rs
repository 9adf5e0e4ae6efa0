//! Identity-based structural diff between two row lists.
//!
//! Rows are matched by [`RowId`], never by position:
//! - ids only in `next` are insertions (dirty)
//! - ids only in `previous` are deletions
//! - shared ids with a different render hash are reloads (dirty)
//! - shared ids with only a different layout hash are dirty, not reloaded
//! - shared ids whose relative order changed are moves

use crate::view_state::row::Row;
use crate::view_state::types::RowId;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// A shared row that changed relative order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowMove {
    /// Position in the previous list.
    pub from: usize,
    /// Position in the next list.
    pub to: usize,
}

/// Positional edit script derived from identity matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowDiff {
    /// Positions in the next list, ascending.
    pub insertions: Vec<usize>,
    /// Positions in the previous list, descending.
    pub deletions: Vec<usize>,
    /// Positions in the next list, ascending.
    pub reloads: Vec<usize>,
    /// Reordered shared rows, ascending by `to`.
    pub moves: Vec<RowMove>,
}

impl RowDiff {
    /// No change at all.
    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty()
            && self.deletions.is_empty()
            && self.reloads.is_empty()
            && self.moves.is_empty()
    }

    /// Whether the row set or its order changed.
    pub fn is_structural(&self) -> bool {
        !self.insertions.is_empty() || !self.deletions.is_empty() || !self.moves.is_empty()
    }
}

/// Diff `previous` against `next`, returning the edit script and the ids of
/// rows whose height must be re-measured.
pub fn diff_rows(previous: &[Row], next: &[Row]) -> (RowDiff, BTreeSet<RowId>) {
    let mut diff = RowDiff::default();
    let mut dirty = BTreeSet::new();

    if previous.is_empty() {
        diff.insertions = (0..next.len()).collect();
        dirty.extend(next.iter().map(|row| row.id().clone()));
        return (diff, dirty);
    }

    let previous_index: HashMap<&RowId, usize> = previous
        .iter()
        .enumerate()
        .map(|(i, row)| (row.id(), i))
        .collect();
    let next_index: HashMap<&RowId, usize> = next
        .iter()
        .enumerate()
        .map(|(i, row)| (row.id(), i))
        .collect();

    // Old positions of shared rows, in next-list order.
    let mut shared: Vec<(usize, usize)> = Vec::new();

    for (new_pos, row) in next.iter().enumerate() {
        match previous_index.get(row.id()) {
            None => {
                diff.insertions.push(new_pos);
                dirty.insert(row.id().clone());
            }
            Some(&old_pos) => {
                let old = &previous[old_pos];
                if old.render_hash() != row.render_hash() {
                    diff.reloads.push(new_pos);
                    dirty.insert(row.id().clone());
                } else if old.layout_hash() != row.layout_hash() {
                    dirty.insert(row.id().clone());
                }
                shared.push((old_pos, new_pos));
            }
        }
    }

    diff.deletions = previous
        .iter()
        .enumerate()
        .filter(|(_, row)| !next_index.contains_key(row.id()))
        .map(|(i, _)| i)
        .rev()
        .collect();

    diff.moves = moved_rows(&shared);

    (diff, dirty)
}

/// Shared rows outside the longest run whose old positions increase in
/// next-list order. Those are the minimal set of rows that moved.
fn moved_rows(shared: &[(usize, usize)]) -> Vec<RowMove> {
    if shared.len() < 2 {
        return Vec::new();
    }

    // Patience-style LIS over old positions; `tails[k]` is the index into
    // `shared` ending the best run of length k + 1.
    let mut tails: Vec<usize> = Vec::new();
    let mut parent: Vec<Option<usize>> = vec![None; shared.len()];

    for (i, &(old_pos, _)) in shared.iter().enumerate() {
        let k = tails.partition_point(|&t| shared[t].0 < old_pos);
        if k > 0 {
            parent[i] = Some(tails[k - 1]);
        }
        if k == tails.len() {
            tails.push(i);
        } else {
            tails[k] = i;
        }
    }

    let mut stable = vec![false; shared.len()];
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        stable[i] = true;
        cursor = parent[i];
    }

    shared
        .iter()
        .zip(stable)
        .filter(|(_, keep)| !keep)
        .map(|(&(from, to), _)| RowMove { from, to })
        .collect()
}
