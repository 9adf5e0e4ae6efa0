//! Tool categorization for rollup breakdowns.

use serde::{Deserialize, Serialize};

/// Coarse category of a tool, used to pick an icon for rollup breakdowns.
///
/// Unknown or custom tool names fall into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    /// Command execution (bash, shell, exec).
    Shell,
    /// File reads.
    Read,
    /// File writes, edits and patches.
    Edit,
    /// Content or file-name search.
    Search,
    /// Web search and fetch.
    Web,
    /// Subagent / task delegation.
    Task,
    /// Plan and todo bookkeeping.
    Plan,
    /// Anything else.
    Other,
}

impl ToolCategory {
    /// Classify a tool by name (case-insensitive).
    pub fn classify(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "bash" | "shell" | "exec" | "exec_command" | "local_shell" | "run_command" => {
                Self::Shell
            }
            "read" | "read_file" | "view_image" | "notebookread" => Self::Read,
            "write" | "edit" | "multiedit" | "apply_patch" | "write_file" | "notebookedit" => {
                Self::Edit
            }
            "grep" | "glob" | "ls" | "list_dir" | "search" | "find" => Self::Search,
            "websearch" | "webfetch" | "web_search" | "fetch" => Self::Web,
            "task" | "agent" | "spawn_agent" => Self::Task,
            "todowrite" | "update_plan" | "exitplanmode" => Self::Plan,
            _ => Self::Other,
        }
    }

    /// Icon key handed to the rendering layer.
    pub fn icon_key(&self) -> &'static str {
        match self {
            Self::Shell => "terminal",
            Self::Read => "doc.text",
            Self::Edit => "pencil",
            Self::Search => "magnifyingglass",
            Self::Web => "globe",
            Self::Task => "person.2",
            Self::Plan => "checklist",
            Self::Other => "wrench",
        }
    }
}
