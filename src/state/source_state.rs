//! Caller-supplied timeline data: messages, turns and session flags.

use crate::model::{Message, MessageId, SessionMeta, Turn};
use serde::{Deserialize, Serialize};

/// Message log, turn grouping and session metadata of one conversation view.
///
/// Mutated only through the reducer. Also the on-disk shape of a snapshot
/// (`{"messages": [...], "turns": [...], "session": {...}}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceState {
    /// Messages in log order.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Turns in order.
    #[serde(default)]
    pub turns: Vec<Turn>,
    /// Session flags.
    #[serde(default)]
    pub session: SessionMeta,
}

impl SourceState {
    /// Create source state from its three slices.
    pub fn new(messages: Vec<Message>, turns: Vec<Turn>, session: SessionMeta) -> Self {
        Self {
            messages,
            turns,
            session,
        }
    }

    /// Find a message by id (first occurrence).
    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == id)
    }
}
