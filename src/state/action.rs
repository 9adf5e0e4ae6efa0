//! Discrete timeline events applied by the reducer.

use crate::model::{Message, SessionMeta, Turn};
use crate::state::ui_state::ScrollAnchor;

/// One UI or data event.
///
/// Each variant touches exactly the state slice its name implies.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineAction {
    // Source data
    /// Replace the whole message log (reconnection snapshot).
    ReplaceMessages(Vec<Message>),
    /// Append newer messages at the end of the log.
    AppendMessages(Vec<Message>),
    /// Prepend older messages (history paging).
    PrependMessages(Vec<Message>),
    /// Replace a message with the same id in place, or append it if unknown.
    /// Used for streaming deltas of an in-progress message.
    UpsertMessage(Message),
    /// Replace the turn grouping.
    ReplaceTurns(Vec<Turn>),
    /// Replace the session flags.
    ReplaceSession(SessionMeta),

    // UI toggles
    /// Toggle a tool card by message id.
    ToggleToolCard(String),
    /// Toggle a work group's rollup by group id.
    ToggleRollup(String),
    /// Toggle a markdown block by block id.
    ToggleMarkdown(String),
    /// Follow / stop following new content.
    SetPinnedToBottom(bool),
    /// Record a scroll anchor to preserve across the next change.
    SetScrollAnchor(ScrollAnchor),
    /// Drop the scroll anchor.
    ClearScrollAnchor,
    /// Viewport width changed (raw, unquantized).
    WidthChanged(f64),
}

impl TimelineAction {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReplaceMessages(_) => "replace_messages",
            Self::AppendMessages(_) => "append_messages",
            Self::PrependMessages(_) => "prepend_messages",
            Self::UpsertMessage(_) => "upsert_message",
            Self::ReplaceTurns(_) => "replace_turns",
            Self::ReplaceSession(_) => "replace_session",
            Self::ToggleToolCard(_) => "toggle_tool_card",
            Self::ToggleRollup(_) => "toggle_rollup",
            Self::ToggleMarkdown(_) => "toggle_markdown",
            Self::SetPinnedToBottom(_) => "set_pinned_to_bottom",
            Self::SetScrollAnchor(_) => "set_scroll_anchor",
            Self::ClearScrollAnchor => "clear_scroll_anchor",
            Self::WidthChanged(_) => "width_changed",
        }
    }
}
