//! Scroll-anchor geometry
//!
//! Keeps a chosen row visually fixed across content changes:
//! capture the row's position relative to the viewport before the change,
//! then resolve the viewport top that puts it back afterwards.
//!
//! # Clamping Behavior
//! Every resolved offset is clamped to `[0, max(0, content_height - viewport_height)]`,
//! so a restore never scrolls past either end of the content.

/// Why a scroll target was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollReason {
    /// Following new content at the bottom.
    Pinned,
    /// History was prepended above the visible rows.
    Prepend,
    /// Restoring an explicit scroll anchor.
    Anchor,
    /// Measurement corrections shifted rows above the viewport.
    Correction,
}

/// Viewport top the rendering layer should scroll to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTarget {
    /// Offset of the viewport top from the content top.
    pub offset: f64,
    /// What produced it.
    pub reason: ScrollReason,
}

/// Whether `new` is `old` with rows added in front only: strictly longer and
/// ending with exactly the rows of `old`.
///
/// ```
/// # use convo_timeline::view_state::scroll::is_prepend_transition;
/// assert!(is_prepend_transition(&["c", "d"], &["a", "b", "c", "d"]));
/// assert!(!is_prepend_transition(&["c", "d"], &["c", "d", "e"]));
/// assert!(!is_prepend_transition(&["c", "d"], &["c", "d"]));
/// ```
pub fn is_prepend_transition<T: PartialEq>(old: &[T], new: &[T]) -> bool {
    new.len() > old.len() && new.ends_with(old)
}

/// Distance from the viewport top down to a row's top edge.
pub fn capture_delta(viewport_top: f64, row_top: f64) -> f64 {
    row_top - viewport_top
}

/// Largest valid viewport top.
pub fn max_offset(content_height: f64, viewport_height: f64) -> f64 {
    (content_height - viewport_height).max(0.0)
}

/// Clamp `offset` into the scrollable range.
pub fn clamp_offset(offset: f64, content_height: f64, viewport_height: f64) -> f64 {
    offset.clamp(0.0, max_offset(content_height, viewport_height))
}

/// Viewport top that puts the anchored row (now at `row_top`) back at the
/// captured `delta` below the viewport top.
pub fn restored_viewport_top(
    row_top: f64,
    delta: f64,
    content_height: f64,
    viewport_height: f64,
) -> f64 {
    clamp_offset(row_top - delta, content_height, viewport_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepend_to_empty_is_a_prepend() {
        let old: [&str; 0] = [];
        assert!(is_prepend_transition(&old, &["a"]));
        assert!(!is_prepend_transition(&old, &old));
    }

    #[test]
    fn insertion_in_the_middle_is_not_a_prepend() {
        assert!(!is_prepend_transition(&["a", "c"], &["x", "a", "b", "c"]));
    }

    #[test]
    fn replacement_is_not_a_prepend() {
        assert!(!is_prepend_transition(&["a", "b"], &["x", "y", "z"]));
    }

    #[test]
    fn capture_delta_is_row_minus_viewport() {
        assert_eq!(capture_delta(100.0, 130.0), 30.0);
        assert_eq!(capture_delta(100.0, 90.0), -10.0);
    }

    #[test]
    fn restore_round_trips_after_prepend() {
        let viewport_top = 120.0;
        let row_top = 150.0;
        let delta = capture_delta(viewport_top, row_top);

        let prepended_height = 400.0;
        let restored = restored_viewport_top(row_top + prepended_height, delta, 2_000.0, 300.0);
        assert_eq!(restored, viewport_top + prepended_height);
    }

    #[test]
    fn restore_clamps_to_top() {
        assert_eq!(restored_viewport_top(10.0, 50.0, 1_000.0, 200.0), 0.0);
    }

    #[test]
    fn restore_clamps_to_bottom() {
        assert_eq!(restored_viewport_top(990.0, 0.0, 1_000.0, 200.0), 800.0);
    }

    #[test]
    fn short_content_always_restores_to_zero() {
        assert_eq!(restored_viewport_top(40.0, 5.0, 100.0, 300.0), 0.0);
        assert_eq!(max_offset(100.0, 300.0), 0.0);
    }

    #[test]
    fn fractional_offsets_are_preserved() {
        let delta = capture_delta(10.25, 12.75);
        assert_eq!(restored_viewport_top(112.75, delta, 1_000.0, 100.0), 110.25);
    }
}
