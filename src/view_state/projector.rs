//! Timeline projector: `(SourceState, UiState, previous) -> ProjectionResult`.
//!
//! Pure and total. The same inputs always produce the same rows, hashes and
//! diff; nothing here logs, allocates ids from a counter, or reads a clock.

use crate::config::TimelinePolicy;
use crate::model::{Message, MessageId, SessionMeta, ToolCategory, Turn, TurnId, ViewMode};
use crate::state::{SourceState, UiState};
use crate::view_state::diff::{diff_rows, RowDiff};
use crate::view_state::focused::{segment, ZoneItem};
use crate::view_state::hash;
use crate::view_state::row::{BreakdownEntry, Row, RowKind, RowPayload, RollupSummary};
use crate::view_state::types::RowId;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Display rows plus the changes relative to the previous projection.
///
/// Immutable once returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectionResult {
    rows: Vec<Row>,
    diff: RowDiff,
    dirty_row_ids: BTreeSet<RowId>,
}

impl ProjectionResult {
    /// A result with no rows; useful as the "previous" of a first projection.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Edit script against the previous projection.
    pub fn diff(&self) -> &RowDiff {
        &self.diff
    }

    /// Rows whose height must be re-measured.
    pub fn dirty_row_ids(&self) -> &BTreeSet<RowId> {
        &self.dirty_row_ids
    }

    /// Row ids in display order.
    pub fn row_ids(&self) -> Vec<&RowId> {
        self.rows.iter().map(Row::id).collect()
    }

    /// Position of `id`, if present.
    pub fn index_of(&self, id: &RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    /// Row with `id`, if present.
    pub fn row(&self, id: &RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id() == id)
    }
}

/// Identifier of the `ordinal`-th (0-based) work group of a turn.
///
/// This is the key stored in [`UiState::expanded_rollups`].
pub fn rollup_group_id(turn_id: &TurnId, ordinal: usize) -> String {
    format!("{turn_id}#{ordinal}")
}

/// Project with the default [`TimelinePolicy`].
pub fn project(
    source: &SourceState,
    ui: &UiState,
    previous: Option<&ProjectionResult>,
) -> ProjectionResult {
    project_with(&TimelinePolicy::default(), source, ui, previous)
}

/// Project `source` and `ui` into display rows and diff them against
/// `previous` (`None` means every row is an insertion).
pub fn project_with(
    policy: &TimelinePolicy,
    source: &SourceState,
    ui: &UiState,
    previous: Option<&ProjectionResult>,
) -> ProjectionResult {
    let mut builder = RowBuilder::new(policy, ui);

    let session = &source.session;
    if session.has_more_history {
        builder.push_payload(RowId::load_more(), RowPayload::LoadMore);
    }

    let total = session
        .total_message_count
        .unwrap_or(source.messages.len());
    if total > policy.message_count_threshold {
        builder.push_payload(
            RowId::message_count(),
            RowPayload::MessageCount {
                loaded: source.messages.len(),
                total,
            },
        );
    }

    match session.view_mode {
        ViewMode::Focused if !source.turns.is_empty() => project_focused(&mut builder, source),
        _ => project_verbose(&mut builder, source),
    }

    project_session_tail(&mut builder, session);
    builder.push_payload(RowId::bottom_spacer(), RowPayload::BottomSpacer);

    let rows = builder.finish();
    let previous_rows = previous.map(ProjectionResult::rows).unwrap_or(&[]);
    let (diff, dirty_row_ids) = diff_rows(previous_rows, &rows);

    ProjectionResult {
        rows,
        diff,
        dirty_row_ids,
    }
}

fn project_verbose(builder: &mut RowBuilder<'_>, source: &SourceState) {
    for message in source.messages.iter().filter(|m| !m.is_system_noise()) {
        builder.push_message(message);
    }
}

fn project_focused(builder: &mut RowBuilder<'_>, source: &SourceState) {
    // First occurrence of a duplicated id wins.
    let mut by_id: HashMap<&MessageId, &Message> = HashMap::with_capacity(source.messages.len());
    for message in &source.messages {
        by_id.entry(message.id()).or_insert(message);
    }

    let mut claimed: HashSet<&MessageId> = HashSet::new();
    for turn in &source.turns {
        let messages: Vec<&Message> = turn
            .message_ids
            .iter()
            .filter_map(|id| by_id.get(id).copied())
            .filter(|m| !m.is_system_noise())
            .filter(|m| claimed.insert(m.id()))
            .collect();
        project_turn(builder, turn, &messages);
    }
}

fn project_turn(builder: &mut RowBuilder<'_>, turn: &Turn, messages: &[&Message]) {
    builder.push_turn_header(turn);

    let segments = segment(messages);
    for message in &segments.leading {
        builder.push_message(message);
    }

    let mut ordinal = 0;
    for item in &segments.zone {
        match item {
            ZoneItem::Breaker(message) => builder.push_message(message),
            ZoneItem::WorkGroup(group) => {
                builder.push_work_group(&rollup_group_id(&turn.id, ordinal), group);
                ordinal += 1;
            }
        }
    }

    for message in &segments.trailing {
        builder.push_message(message);
    }
}

fn project_session_tail(builder: &mut RowBuilder<'_>, session: &SessionMeta) {
    if let Some(approval) = &session.pending_approval {
        builder.push_session(
            RowId::approval_card(),
            RowPayload::ApprovalCard {
                approval_id: approval.id.clone(),
                kind: approval.kind,
            },
            session,
        );
    } else if session.is_active {
        builder.push_session(
            RowId::live_indicator(),
            RowPayload::LiveIndicator {
                current_tool: session.current_tool.clone(),
            },
            session,
        );
    }
}

/// Tool-name breakdown of the tool calls in `hidden`: most frequent first,
/// ties broken by name.
fn breakdown(hidden: &[&Message]) -> Vec<BreakdownEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for message in hidden.iter().filter(|m| m.kind().is_tool_call()) {
        *counts.entry(message.tool_name().unwrap_or("tool")).or_default() += 1;
    }

    let mut entries: Vec<BreakdownEntry> = counts
        .into_iter()
        .map(|(name, count)| BreakdownEntry {
            tool_name: name.to_string(),
            category: ToolCategory::classify(name),
            count,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tool_name.cmp(&b.tool_name)));
    entries
}

fn count_tool_calls(messages: &[&Message]) -> usize {
    messages.iter().filter(|m| m.kind().is_tool_call()).count()
}

/// Accumulates rows, computing hashes and dropping duplicate ids.
struct RowBuilder<'a> {
    policy: &'a TimelinePolicy,
    ui: &'a UiState,
    rows: Vec<Row>,
    seen: HashSet<RowId>,
}

impl<'a> RowBuilder<'a> {
    fn new(policy: &'a TimelinePolicy, ui: &'a UiState) -> Self {
        Self {
            policy,
            ui,
            rows: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn finish(self) -> Vec<Row> {
        self.rows
    }

    fn push(&mut self, id: RowId, payload: RowPayload, render_hash: u64) {
        if !self.seen.insert(id.clone()) {
            return;
        }
        let layout_hash = hash::layout_hash(
            payload.kind(),
            &payload,
            render_hash,
            self.ui.width_bucket,
        );
        self.rows.push(Row::new(id, payload, render_hash, layout_hash));
    }

    fn push_payload(&mut self, id: RowId, payload: RowPayload) {
        let render = hash::payload_render_hash(payload.kind(), &payload);
        self.push(id, payload, render);
    }

    fn push_session(&mut self, id: RowId, payload: RowPayload, session: &SessionMeta) {
        let render = hash::session_render_hash(payload.kind(), &payload, session);
        self.push(id, payload, render);
    }

    fn push_turn_header(&mut self, turn: &Turn) {
        let payload = RowPayload::TurnHeader {
            turn_id: turn.id.clone(),
            number: turn.number,
            status: turn.status,
        };
        let render = hash::turn_render_hash(RowKind::TurnHeader, &payload, turn);
        self.push(RowId::turn_header(&turn.id), payload, render);
    }

    fn push_message(&mut self, message: &Message) {
        let id = message.id();
        let payload = RowPayload::Message {
            message_id: id.clone(),
            markdown_expanded: self.ui.is_markdown_expanded(id.as_str()),
            card_expanded: self.ui.is_tool_card_expanded(id.as_str()),
        };
        let render = hash::message_render_hash(
            RowKind::Message,
            &payload,
            message,
            self.policy.text_signature_sample,
        );
        self.push(RowId::message(id), payload, render);
    }

    fn push_tool(&mut self, message: &Message, collapse_group: Option<String>) {
        let id = message.id();
        let payload = RowPayload::Tool {
            message_id: id.clone(),
            card_expanded: self.ui.is_tool_card_expanded(id.as_str()),
            collapse_group,
        };
        let render = hash::message_render_hash(
            RowKind::Tool,
            &payload,
            message,
            self.policy.text_signature_sample,
        );
        self.push(RowId::tool(id), payload, render);
    }

    fn push_work_group(&mut self, group_id: &str, group: &[&Message]) {
        if group.len() < self.policy.rollup_min_group_size {
            for message in group {
                self.push_tool(message, None);
            }
            return;
        }

        if self.ui.is_rollup_expanded(group_id) {
            for (i, message) in group.iter().enumerate() {
                let collapse = (i == 0).then(|| group_id.to_string());
                self.push_tool(message, collapse);
            }
            return;
        }

        let split = group.len().saturating_sub(self.policy.rollup_visible_tail);
        let (hidden, visible) = group.split_at(split);
        let summary = RollupSummary {
            group_id: group_id.to_string(),
            hidden_count: count_tool_calls(hidden),
            total_tool_count: count_tool_calls(group),
            breakdown: breakdown(hidden),
            expanded: false,
        };
        self.push_payload(RowId::rollup(group_id), RowPayload::RollupSummary(summary));
        for message in visible {
            self.push_tool(message, None);
        }
    }
}

#[cfg(test)]
#[path = "projector_tests.rs"]
mod tests;
