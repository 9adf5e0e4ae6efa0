//! Display rows produced by the projector.

use crate::model::{ApprovalKind, MessageId, ToolCategory, TurnId, TurnStatus};
use crate::view_state::hash::StableHasher;
use crate::view_state::types::RowId;
use serde::Serialize;

/// Discriminant of a row's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Conversational message (or any message in verbose mode).
    Message,
    /// Entry of a work group in focused mode.
    Tool,
    /// Turn header.
    TurnHeader,
    /// Summary of a collapsed work group's hidden prefix.
    RollupSummary,
    /// "Load earlier messages".
    LoadMore,
    /// Message-count banner.
    MessageCount,
    /// Agent-is-working indicator.
    LiveIndicator,
    /// Pending approval card.
    ApprovalCard,
    /// Trailing spacer.
    BottomSpacer,
}

impl RowKind {
    /// Canonical name (folded into hashes).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Tool => "tool",
            Self::TurnHeader => "turn_header",
            Self::RollupSummary => "rollup_summary",
            Self::LoadMore => "load_more",
            Self::MessageCount => "message_count",
            Self::LiveIndicator => "live_indicator",
            Self::ApprovalCard => "approval_card",
            Self::BottomSpacer => "bottom_spacer",
        }
    }
}

/// One tool name in a rollup breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BreakdownEntry {
    /// Tool name as reported by the message.
    pub tool_name: String,
    /// Category the icon is chosen from.
    pub category: ToolCategory,
    /// Occurrences in the hidden prefix.
    pub count: usize,
}

impl BreakdownEntry {
    /// Icon key for the rendering layer.
    pub fn icon_key(&self) -> &'static str {
        self.category.icon_key()
    }
}

/// Payload of a rollup-summary row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RollupSummary {
    /// Work-group identifier (key of `UiState::expanded_rollups`).
    pub group_id: String,
    /// Tool calls hidden behind the rollup.
    pub hidden_count: usize,
    /// Tool calls in the whole work group.
    pub total_tool_count: usize,
    /// Hidden tool names grouped by name, most frequent first.
    pub breakdown: Vec<BreakdownEntry>,
    /// Whether the group is expanded. Rollup rows are only emitted for
    /// collapsed groups, so this is `false` on every projected row.
    pub expanded: bool,
}

/// Per-kind row data. Lightweight: entities are referenced by id and
/// resolved by the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowPayload {
    /// A message row.
    Message {
        /// Message shown.
        message_id: MessageId,
        /// Markdown block expanded.
        markdown_expanded: bool,
        /// Tool card expanded (tool messages in verbose mode).
        card_expanded: bool,
    },
    /// A work-group entry.
    Tool {
        /// Message shown.
        message_id: MessageId,
        /// Tool card expanded.
        card_expanded: bool,
        /// Set on the first entry of an expanded, collapsible work group:
        /// the group the rendering layer offers to collapse again.
        collapse_group: Option<String>,
    },
    /// A turn header.
    TurnHeader {
        /// Turn shown.
        turn_id: TurnId,
        /// Turn ordinal.
        number: u32,
        /// Turn status.
        status: TurnStatus,
    },
    /// A rollup summary.
    RollupSummary(RollupSummary),
    /// Load earlier history.
    LoadMore,
    /// Message-count banner.
    MessageCount {
        /// Messages currently loaded.
        loaded: usize,
        /// Messages in the session.
        total: usize,
    },
    /// Live activity.
    LiveIndicator {
        /// Tool currently running.
        current_tool: Option<String>,
    },
    /// Pending approval.
    ApprovalCard {
        /// Approval request identifier.
        approval_id: String,
        /// Approval kind.
        kind: ApprovalKind,
    },
    /// Trailing spacer.
    BottomSpacer,
}

impl RowPayload {
    /// Row kind implied by the payload.
    pub fn kind(&self) -> RowKind {
        match self {
            Self::Message { .. } => RowKind::Message,
            Self::Tool { .. } => RowKind::Tool,
            Self::TurnHeader { .. } => RowKind::TurnHeader,
            Self::RollupSummary(_) => RowKind::RollupSummary,
            Self::LoadMore => RowKind::LoadMore,
            Self::MessageCount { .. } => RowKind::MessageCount,
            Self::LiveIndicator { .. } => RowKind::LiveIndicator,
            Self::ApprovalCard { .. } => RowKind::ApprovalCard,
            Self::BottomSpacer => RowKind::BottomSpacer,
        }
    }

    /// Feed every payload field into `h` in declaration order.
    pub(crate) fn write_fingerprint(&self, h: &mut StableHasher) {
        match self {
            Self::Message {
                message_id,
                markdown_expanded,
                card_expanded,
            } => {
                h.write_str(message_id.as_str());
                h.write_bool(*markdown_expanded);
                h.write_bool(*card_expanded);
            }
            Self::Tool {
                message_id,
                card_expanded,
                collapse_group,
            } => {
                h.write_str(message_id.as_str());
                h.write_bool(*card_expanded);
                h.write_opt_str(collapse_group.as_deref());
            }
            Self::TurnHeader {
                turn_id,
                number,
                status,
            } => {
                h.write_str(turn_id.as_str());
                h.write_u64(u64::from(*number));
                h.write_str(status.as_str());
            }
            Self::RollupSummary(summary) => {
                h.write_str(&summary.group_id);
                h.write_bool(summary.expanded);
                h.write_usize(summary.hidden_count);
                h.write_usize(summary.total_tool_count);
                h.write_usize(summary.breakdown.len());
                for entry in &summary.breakdown {
                    h.write_str(&entry.tool_name);
                    h.write_str(entry.icon_key());
                    h.write_usize(entry.count);
                }
            }
            Self::LoadMore | Self::BottomSpacer => {}
            Self::MessageCount { loaded, total } => {
                h.write_usize(*loaded);
                h.write_usize(*total);
            }
            Self::LiveIndicator { current_tool } => {
                h.write_opt_str(current_tool.as_deref());
            }
            Self::ApprovalCard { approval_id, kind } => {
                h.write_str(approval_id);
                h.write_str(kind.as_str());
            }
        }
    }
}

/// One display row. Immutable once projected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Row {
    id: RowId,
    kind: RowKind,
    payload: RowPayload,
    #[serde(serialize_with = "serialize_hash")]
    render_hash: u64,
    #[serde(serialize_with = "serialize_hash")]
    layout_hash: u64,
}

/// Hashes are emitted as 16-digit hex so JSON consumers never lose precision.
fn serialize_hash<S: serde::Serializer>(hash: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{hash:016x}"))
}

impl Row {
    pub(crate) fn new(id: RowId, payload: RowPayload, render_hash: u64, layout_hash: u64) -> Self {
        Self {
            id,
            kind: payload.kind(),
            payload,
            render_hash,
            layout_hash,
        }
    }

    /// Stable row identifier.
    pub fn id(&self) -> &RowId {
        &self.id
    }

    /// Row kind.
    pub fn kind(&self) -> RowKind {
        self.kind
    }

    /// Row payload.
    pub fn payload(&self) -> &RowPayload {
        &self.payload
    }

    /// Visible-content fingerprint.
    pub fn render_hash(&self) -> u64 {
        self.render_hash
    }

    /// Content + viewport fingerprint; height cache discriminator.
    pub fn layout_hash(&self) -> u64 {
        self.layout_hash
    }
}
