//! UI toggles that shape the projection.

use crate::view_state::types::{RowId, WidthBucket};
use std::collections::HashSet;

/// Scroll position expressed relative to a row.
///
/// `offset` is the distance from the row's top edge to the viewport top, in
/// layout units (fractional values allowed).
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnchor {
    /// Row the viewport is anchored to.
    pub row_id: RowId,
    /// Offset from that row's top edge.
    pub offset: f64,
}

impl ScrollAnchor {
    /// Create an anchor.
    pub fn new(row_id: RowId, offset: f64) -> Self {
        Self { row_id, offset }
    }
}

/// UI state of one conversation view. Pure data, mutated only by the reducer.
///
/// The expanded sets are keyed by plain strings: tool cards and markdown
/// blocks by message id, rollups by work-group id
/// (see [`crate::view_state::projector::rollup_group_id`]).
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// Tool cards the user expanded.
    pub expanded_tool_cards: HashSet<String>,
    /// Work groups the user expanded.
    pub expanded_rollups: HashSet<String>,
    /// Markdown blocks the user expanded.
    pub expanded_markdown: HashSet<String>,
    /// Whether the view follows new content.
    pub pinned_to_bottom: bool,
    /// Quantized viewport width.
    pub width_bucket: WidthBucket,
    /// Requested scroll anchor, if any.
    pub scroll_anchor: Option<ScrollAnchor>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            expanded_tool_cards: HashSet::new(),
            expanded_rollups: HashSet::new(),
            expanded_markdown: HashSet::new(),
            pinned_to_bottom: true,
            width_bucket: WidthBucket::MIN,
            scroll_anchor: None,
        }
    }
}

impl UiState {
    /// Whether the tool card for `message_id` is expanded.
    pub fn is_tool_card_expanded(&self, message_id: &str) -> bool {
        self.expanded_tool_cards.contains(message_id)
    }

    /// Whether the work group `group_id` is expanded.
    pub fn is_rollup_expanded(&self, group_id: &str) -> bool {
        self.expanded_rollups.contains(group_id)
    }

    /// Whether the markdown block `block_id` is expanded.
    pub fn is_markdown_expanded(&self, block_id: &str) -> bool {
        self.expanded_markdown.contains(block_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_pinned_with_min_bucket_and_nothing_expanded() {
        let ui = UiState::default();
        assert!(ui.pinned_to_bottom);
        assert_eq!(ui.width_bucket, WidthBucket::MIN);
        assert!(ui.expanded_tool_cards.is_empty());
        assert!(ui.expanded_rollups.is_empty());
        assert!(ui.expanded_markdown.is_empty());
        assert!(ui.scroll_anchor.is_none());
    }

    #[test]
    fn membership_queries_read_the_right_set() {
        let mut ui = UiState::default();
        ui.expanded_rollups.insert("t1#0".to_string());
        assert!(ui.is_rollup_expanded("t1#0"));
        assert!(!ui.is_tool_card_expanded("t1#0"));
        assert!(!ui.is_markdown_expanded("t1#0"));
    }
}
