//! Session metadata flags supplied by the session layer.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the timeline is projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// One row per message, tool traffic inline.
    Verbose,
    /// Turn headers with collapsible tool work groups.
    #[default]
    Focused,
}

impl ViewMode {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verbose => "verbose",
            Self::Focused => "focused",
        }
    }
}

/// Error parsing a [`ViewMode`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view mode '{0}' (expected 'verbose' or 'focused')")]
pub struct UnknownViewMode(pub String);

impl FromStr for ViewMode {
    type Err = UnknownViewMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verbose" => Ok(Self::Verbose),
            "focused" => Ok(Self::Focused),
            _ => Err(UnknownViewMode(s.to_string())),
        }
    }
}

/// What a pending approval asks the user to allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalKind {
    /// Running a command.
    CommandExecution,
    /// Applying a file change.
    FileChange,
    /// Anything else the agent asks permission for.
    Other,
}

impl ApprovalKind {
    /// Canonical lowercase name (folded into hashes).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CommandExecution => "command_execution",
            Self::FileChange => "file_change",
            Self::Other => "other",
        }
    }
}

/// An approval the agent is waiting on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingApproval {
    /// Approval request identifier.
    pub id: String,
    /// Approval kind.
    pub kind: ApprovalKind,
}

/// Session-level flags that shape the projection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionMeta {
    /// Verbose or focused projection.
    #[serde(default)]
    pub view_mode: ViewMode,
    /// Whether the agent is currently working.
    #[serde(default)]
    pub is_active: bool,
    /// Tool currently running, if any.
    #[serde(default)]
    pub current_tool: Option<String>,
    /// Approval the agent is blocked on, if any.
    #[serde(default)]
    pub pending_approval: Option<PendingApproval>,
    /// Total messages in the session, including ones not yet loaded.
    #[serde(default)]
    pub total_message_count: Option<usize>,
    /// Whether older history can still be paged in.
    #[serde(default)]
    pub has_more_history: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_mode_parses_case_insensitively() {
        assert_eq!("Verbose".parse::<ViewMode>(), Ok(ViewMode::Verbose));
        assert_eq!(" focused ".parse::<ViewMode>(), Ok(ViewMode::Focused));
    }

    #[test]
    fn view_mode_rejects_unknown() {
        assert!("compact".parse::<ViewMode>().is_err());
    }

    #[test]
    fn session_meta_defaults_to_idle_focused() {
        let meta = SessionMeta::default();
        assert_eq!(meta.view_mode, ViewMode::Focused);
        assert!(!meta.is_active);
        assert!(meta.pending_approval.is_none());
    }

    #[test]
    fn session_meta_deserializes_from_empty_object() {
        let meta: SessionMeta = serde_json::from_str("{}").expect("valid json");
        assert_eq!(meta, SessionMeta::default());
    }
}
