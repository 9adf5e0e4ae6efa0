//! Timeline engine: the impure shell around the pure core.
//!
//! Owns one conversation view (state, last projection, height cache and the
//! per-frame correction batch) and wires reducer, projector, height cache and
//! scroll-anchor math together. This is the only layer that logs.

use crate::config::TimelinePolicy;
use crate::state::{reduce_with, SourceState, TimelineAction, UiState};
use crate::view_state::cache::{HeightCache, HeightCacheKey};
use crate::view_state::height_index::HeightIndex;
use crate::view_state::projector::{project_with, ProjectionResult};
use crate::view_state::row::RowKind;
use crate::view_state::scroll::{
    capture_delta, is_prepend_transition, max_offset, restored_viewport_top, ScrollReason,
    ScrollTarget,
};
use crate::view_state::types::{RowHeight, RowId};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, trace};

/// Visible window of the timeline, in layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Offset of the viewport top from the content top.
    pub top: f64,
    /// Viewport height.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport.
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// Result of replaying a correction batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlushOutcome {
    /// Corrections stored.
    pub accepted: usize,
    /// Corrections dropped (already corrected, or row no longer projected).
    pub rejected: usize,
    /// Where to scroll so the first visible row stays put, if anything moved.
    pub scroll: Option<ScrollTarget>,
}

/// Row the viewport is visually attached to.
struct Capture {
    row_id: RowId,
    delta: f64,
}

/// One conversation view.
#[derive(Debug, Clone)]
pub struct TimelineEngine {
    policy: TimelinePolicy,
    source: SourceState,
    ui: UiState,
    projection: ProjectionResult,
    heights: HeightCache,
    pending: BTreeMap<RowId, RowHeight>,
}

impl Default for TimelineEngine {
    fn default() -> Self {
        Self::new(TimelinePolicy::default())
    }
}

impl TimelineEngine {
    /// Engine over an empty conversation.
    pub fn new(policy: TimelinePolicy) -> Self {
        Self::with_state(policy, SourceState::default(), UiState::default())
    }

    /// Engine over existing state; projects it immediately.
    pub fn with_state(policy: TimelinePolicy, source: SourceState, ui: UiState) -> Self {
        let projection = project_with(&policy, &source, &ui, None);
        debug!(rows = projection.rows().len(), "initial projection");
        Self {
            policy,
            source,
            ui,
            projection,
            heights: HeightCache::new(),
            pending: BTreeMap::new(),
        }
    }

    /// Active policy.
    pub fn policy(&self) -> &TimelinePolicy {
        &self.policy
    }

    /// Current source state.
    pub fn source(&self) -> &SourceState {
        &self.source
    }

    /// Current UI state.
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Latest projection.
    pub fn projection(&self) -> &ProjectionResult {
        &self.projection
    }

    /// Height cache.
    pub fn height_cache(&self) -> &HeightCache {
        &self.heights
    }

    /// Reduce `action`, re-project against the previous rows, and prune the
    /// height cache when the row set changed.
    pub fn dispatch(&mut self, action: TimelineAction) -> &ProjectionResult {
        let name = action.name();
        let source = std::mem::take(&mut self.source);
        let ui = std::mem::take(&mut self.ui);
        let (source, ui) = reduce_with(&self.policy, source, ui, action);
        self.source = source;
        self.ui = ui;

        let projection = project_with(&self.policy, &self.source, &self.ui, Some(&self.projection));
        let diff = projection.diff();
        debug!(
            action = name,
            rows = projection.rows().len(),
            insertions = diff.insertions.len(),
            deletions = diff.deletions.len(),
            reloads = diff.reloads.len(),
            moves = diff.moves.len(),
            dirty = projection.dirty_row_ids().len(),
            "projected"
        );

        if diff.is_structural() {
            let before = self.heights.len();
            self.heights.prune(projection.rows().iter().map(|row| row.id()));
            let live: HashSet<&RowId> = projection.rows().iter().map(|row| row.id()).collect();
            self.pending.retain(|id, _| live.contains(id));
            trace!(pruned = before - self.heights.len(), "height cache pruned");
        }

        self.projection = projection;
        &self.projection
    }

    /// [`dispatch`](Self::dispatch) plus the scroll target that keeps the
    /// view stable:
    /// - pinned to bottom: the bottom offset
    /// - after a prepend: the first visible row kept in place
    /// - with a scroll anchor set: the anchored row restored
    pub fn dispatch_anchored(
        &mut self,
        action: TimelineAction,
        viewport: Viewport,
    ) -> Option<ScrollTarget> {
        let before_ids = body_ids(&self.projection);
        let capture = self.capture(viewport);

        self.dispatch(action);

        let offsets = self.row_offsets();
        let content = offsets.total();

        if self.ui.pinned_to_bottom {
            return Some(ScrollTarget {
                offset: max_offset(content, viewport.height),
                reason: ScrollReason::Pinned,
            });
        }

        let after_ids = body_ids(&self.projection);
        if is_prepend_transition(&before_ids, &after_ids) {
            if let Some(capture) = capture {
                if let Some(index) = self.projection.index_of(&capture.row_id) {
                    let offset =
                        restored_viewport_top(offsets.top(index), capture.delta, content, viewport.height);
                    debug!(row = %capture.row_id, offset, "restoring scroll after prepend");
                    return Some(ScrollTarget {
                        offset,
                        reason: ScrollReason::Prepend,
                    });
                }
            }
        }

        let anchor = self.ui.scroll_anchor.as_ref()?;
        let index = self.projection.index_of(&anchor.row_id)?;
        Some(ScrollTarget {
            offset: restored_viewport_top(offsets.top(index), -anchor.offset, content, viewport.height),
            reason: ScrollReason::Anchor,
        })
    }

    /// Cached height of the row at `index`, or the placeholder when out of
    /// range or unmeasured.
    pub fn height_at(&self, index: usize) -> RowHeight {
        self.heights
            .height_at_index(self.projection.rows(), index, self.ui.width_bucket)
    }

    /// Store a measured height for the row's current version. Returns `false`
    /// if the row is not projected.
    pub fn store_measured(&mut self, row_id: &RowId, height: RowHeight) -> bool {
        match self.current_key(row_id) {
            Some(key) => {
                self.heights.store(height, key);
                true
            }
            None => false,
        }
    }

    /// Queue an intrinsic-size correction for the next flush. Within one
    /// batch the last value per row wins.
    pub fn queue_correction(&mut self, row_id: RowId, height: RowHeight) {
        self.pending.insert(row_id, height);
    }

    /// Corrections waiting for the next flush.
    pub fn pending_corrections(&self) -> usize {
        self.pending.len()
    }

    /// Replay the queued corrections through the height cache and return the
    /// scroll target that keeps the first visible row in place.
    pub fn flush_corrections(&mut self, viewport: Viewport) -> FlushOutcome {
        let capture = self.capture(viewport);
        let batch = std::mem::take(&mut self.pending);

        let mut accepted = 0;
        let mut rejected = 0;
        for (row_id, height) in batch {
            let accepted_now = match self.current_key(&row_id) {
                Some(key) => self.heights.store_correction(height, key),
                None => false,
            };
            if accepted_now {
                accepted += 1;
            } else {
                rejected += 1;
                trace!(row = %row_id, height = height.get(), "correction rejected");
            }
        }
        debug!(accepted, rejected, "flushed corrections");

        if accepted == 0 {
            return FlushOutcome {
                accepted,
                rejected,
                scroll: None,
            };
        }

        let offsets = self.row_offsets();
        let content = offsets.total();
        let scroll = if self.ui.pinned_to_bottom {
            Some(ScrollTarget {
                offset: max_offset(content, viewport.height),
                reason: ScrollReason::Pinned,
            })
        } else {
            capture.and_then(|capture| {
                let index = self.projection.index_of(&capture.row_id)?;
                let offset =
                    restored_viewport_top(offsets.top(index), capture.delta, content, viewport.height);
                (offset != viewport.top).then_some(ScrollTarget {
                    offset,
                    reason: ScrollReason::Correction,
                })
            })
        };

        FlushOutcome {
            accepted,
            rejected,
            scroll,
        }
    }

    /// Row tops from cached heights (placeholder for unmeasured rows).
    pub fn row_offsets(&self) -> HeightIndex {
        HeightIndex::from_heights((0..self.projection.rows().len()).map(|i| self.height_at(i)))
    }

    fn current_key(&self, row_id: &RowId) -> Option<HeightCacheKey> {
        self.projection
            .row(row_id)
            .map(|row| HeightCacheKey::for_row(row, self.ui.width_bucket))
    }

    /// First row intersecting the viewport top, with its offset below it.
    fn capture(&self, viewport: Viewport) -> Option<Capture> {
        let offsets = self.row_offsets();
        let index = offsets.lower_bound(viewport.top)?;
        let row = self.projection.rows().get(index)?;
        Some(Capture {
            row_id: row.id().clone(),
            delta: capture_delta(viewport.top, offsets.top(index)),
        })
    }
}

/// Row ids excluding the leading history chrome, whose presence does not
/// depend on where new rows were inserted.
fn body_ids(projection: &ProjectionResult) -> Vec<RowId> {
    projection
        .rows()
        .iter()
        .filter(|row| !matches!(row.kind(), RowKind::LoadMore | RowKind::MessageCount))
        .map(|row| row.id().clone())
        .collect()
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
