//! Timeline reducer.
//!
//! Pure, total transition `(SourceState, UiState, action) -> (SourceState', UiState')`.
//! No clock, no randomness, no side effects: the same prior state and action
//! always produce the same result.

use crate::config::TimelinePolicy;
use crate::state::{SourceState, TimelineAction, UiState};
use crate::view_state::types::WidthBucket;
use std::collections::HashSet;

/// Apply one action using the default [`TimelinePolicy`].
pub fn reduce(source: SourceState, ui: UiState, action: TimelineAction) -> (SourceState, UiState) {
    reduce_with(&TimelinePolicy::default(), source, ui, action)
}

/// Apply one action.
///
/// Only `WidthChanged` reads the policy (for the bucket size). A width that
/// lands in the current bucket leaves the state untouched.
pub fn reduce_with(
    policy: &TimelinePolicy,
    mut source: SourceState,
    mut ui: UiState,
    action: TimelineAction,
) -> (SourceState, UiState) {
    match action {
        TimelineAction::ReplaceMessages(messages) => {
            source.messages = messages;
        }
        TimelineAction::AppendMessages(messages) => {
            source.messages.extend(messages);
        }
        TimelineAction::PrependMessages(mut messages) => {
            messages.append(&mut source.messages);
            source.messages = messages;
        }
        TimelineAction::UpsertMessage(message) => {
            match source.messages.iter_mut().find(|m| m.id() == message.id()) {
                Some(existing) => *existing = message,
                None => source.messages.push(message),
            }
        }
        TimelineAction::ReplaceTurns(turns) => {
            source.turns = turns;
        }
        TimelineAction::ReplaceSession(session) => {
            source.session = session;
        }
        TimelineAction::ToggleToolCard(key) => {
            toggle(&mut ui.expanded_tool_cards, key);
        }
        TimelineAction::ToggleRollup(key) => {
            toggle(&mut ui.expanded_rollups, key);
        }
        TimelineAction::ToggleMarkdown(key) => {
            toggle(&mut ui.expanded_markdown, key);
        }
        TimelineAction::SetPinnedToBottom(pinned) => {
            ui.pinned_to_bottom = pinned;
        }
        TimelineAction::SetScrollAnchor(anchor) => {
            ui.scroll_anchor = Some(anchor);
        }
        TimelineAction::ClearScrollAnchor => {
            ui.scroll_anchor = None;
        }
        TimelineAction::WidthChanged(width) => {
            ui.width_bucket = WidthBucket::quantize(width, policy.width_bucket_size);
        }
    }

    (source, ui)
}

/// Present → removed, absent → added.
fn toggle(set: &mut HashSet<String>, key: String) {
    if !set.remove(&key) {
        set.insert(key);
    }
}

#[cfg(test)]
#[path = "reducer_tests.rs"]
mod tests;
