//! Turn grouping supplied by the session layer.

use crate::model::{MessageId, TurnId};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    /// Still running.
    #[default]
    Active,
    /// Finished normally.
    Completed,
    /// Finished with an error or was interrupted.
    Failed,
}

impl TurnStatus {
    /// Canonical lowercase name (folded into hashes).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// One user-initiated exchange grouping consecutive messages.
///
/// The engine treats turns as opaque grouping boundaries; `message_ids`
/// lists the grouped messages in log order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Turn identifier.
    pub id: TurnId,
    /// 1-based ordinal shown in the header.
    pub number: u32,
    /// Lifecycle status.
    #[serde(default)]
    pub status: TurnStatus,
    /// Names of tools invoked during the turn.
    #[serde(default)]
    pub tools_used: Vec<String>,
    /// Paths changed during the turn.
    #[serde(default)]
    pub changed_files: Vec<String>,
    /// Tokens consumed by the turn.
    #[serde(default)]
    pub token_delta: u64,
    /// Grouped message identifiers, in log order.
    #[serde(default)]
    pub message_ids: Vec<MessageId>,
}

impl Turn {
    /// Create an active turn with no messages or stats.
    pub fn new(id: TurnId, number: u32) -> Self {
        Self {
            id,
            number,
            status: TurnStatus::Active,
            tools_used: Vec::new(),
            changed_files: Vec::new(),
            token_delta: 0,
            message_ids: Vec::new(),
        }
    }

    /// Set the grouped messages.
    pub fn with_messages(mut self, message_ids: Vec<MessageId>) -> Self {
        self.message_ids = message_ids;
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: TurnStatus) -> Self {
        self.status = status;
        self
    }
}
