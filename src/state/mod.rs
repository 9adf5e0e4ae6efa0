//! Timeline state and transitions (pure).
//!
//! All state transitions go through [`reduce`] and are testable without any
//! rendering layer.

pub mod action;
pub mod reducer;
pub mod source_state;
pub mod ui_state;

// Re-export for convenience
pub use action::TimelineAction;
pub use reducer::{reduce, reduce_with};
pub use source_state::SourceState;
pub use ui_state::{ScrollAnchor, UiState};
