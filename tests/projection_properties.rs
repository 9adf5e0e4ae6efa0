//! Property-based tests for the timeline projector.
//!
//! Tests validate:
//! 1. Projection is deterministic (rows, hashes and diff)
//! 2. Row ids are unique
//! 3. The diff is identity-based: insertions/deletions are exactly the
//!    added/removed ids, reloads are exactly the shared rows whose render
//!    hash changed, and non-moved shared rows keep their relative order
//! 4. Rollup summaries are consistent with the rows they hide

use convo_timeline::model::{
    ApprovalKind, Message, MessageId, MessageKind, PendingApproval, SessionMeta, Turn, TurnId,
    ViewMode,
};
use convo_timeline::state::{SourceState, UiState};
use convo_timeline::view_state::{project, ProjectionResult, Row, RowId, RowPayload, WidthBucket};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

// ===== Arbitrary Strategies =====

const KINDS: [MessageKind; 7] = [
    MessageKind::User,
    MessageKind::Assistant,
    MessageKind::Reasoning,
    MessageKind::ToolCall,
    MessageKind::ToolResult,
    MessageKind::Steer,
    MessageKind::Shell,
];

const TOOLS: [&str; 5] = ["Read", "Bash", "Edit", "Grep", "WebFetch"];

/// (kind index, tool index, starts a new turn, text length)
fn arb_message_spec() -> impl Strategy<Value = (usize, usize, bool, usize)> {
    (0..KINDS.len(), 0..TOOLS.len(), prop::bool::weighted(0.15), 0usize..300)
}

fn build_source(
    specs: &[(usize, usize, bool, usize)],
    focused: bool,
    active: bool,
    approval: bool,
    more: bool,
) -> SourceState {
    let mut messages = Vec::new();
    let mut turns: Vec<Turn> = Vec::new();

    for (i, &(kind, tool, new_turn, len)) in specs.iter().enumerate() {
        let id = MessageId::new(format!("m{i}")).expect("non-empty id");
        let kind = KINDS[kind];
        let message = if kind == MessageKind::ToolCall {
            Message::tool_call(id.clone(), TOOLS[tool], "x".repeat(len))
        } else {
            Message::new(id.clone(), kind, "y".repeat(len))
        };
        messages.push(message);

        if new_turn || turns.is_empty() {
            let number = turns.len() as u32 + 1;
            let turn_id = TurnId::new(format!("t{number}")).expect("non-empty id");
            turns.push(Turn::new(turn_id, number));
        }
        if let Some(turn) = turns.last_mut() {
            turn.message_ids.push(id);
        }
    }

    SourceState {
        messages,
        turns,
        session: SessionMeta {
            view_mode: if focused { ViewMode::Focused } else { ViewMode::Verbose },
            is_active: active,
            current_tool: active.then(|| "Bash".to_string()),
            pending_approval: approval.then(|| PendingApproval {
                id: "approval-1".into(),
                kind: ApprovalKind::FileChange,
            }),
            total_message_count: None,
            has_more_history: more,
        },
    }
}

prop_compose! {
    fn arb_source()(
        specs in prop::collection::vec(arb_message_spec(), 0..40),
        focused in any::<bool>(),
        active in any::<bool>(),
        approval in any::<bool>(),
        more in any::<bool>(),
    ) -> SourceState {
        build_source(&specs, focused, active, approval, more)
    }
}

prop_compose! {
    fn arb_ui()(
        rollups in prop::collection::hash_set((1u32..6, 0usize..4), 0..6),
        cards in prop::collection::hash_set(0usize..40, 0..6),
        bucket in 1u32..60,
    ) -> UiState {
        UiState {
            expanded_rollups: rollups
                .into_iter()
                .map(|(turn, group)| format!("t{turn}#{group}"))
                .collect(),
            expanded_tool_cards: cards.into_iter().map(|i| format!("m{i}")).collect(),
            width_bucket: WidthBucket::new(bucket),
            ..UiState::default()
        }
    }
}

// ===== Helpers =====

fn id_set(rows: &[Row]) -> HashSet<&RowId> {
    rows.iter().map(Row::id).collect()
}

fn ids_at<'a>(rows: &'a [Row], positions: &[usize]) -> HashSet<&'a RowId> {
    positions.iter().map(|&p| rows[p].id()).collect()
}

fn check_diff(previous: &ProjectionResult, next: &ProjectionResult) -> Result<(), TestCaseError> {
    let old = previous.rows();
    let new = next.rows();
    let diff = next.diff();
    let old_ids = id_set(old);
    let new_ids = id_set(new);

    let added: HashSet<&RowId> = new_ids.difference(&old_ids).copied().collect();
    let removed: HashSet<&RowId> = old_ids.difference(&new_ids).copied().collect();
    prop_assert_eq!(ids_at(new, &diff.insertions), added.clone());
    prop_assert_eq!(ids_at(old, &diff.deletions), removed.clone());

    prop_assert!(diff.insertions.windows(2).all(|w| w[0] < w[1]));
    prop_assert!(diff.deletions.windows(2).all(|w| w[0] > w[1]));
    prop_assert!(diff.reloads.windows(2).all(|w| w[0] < w[1]));

    let old_by_id: HashMap<&RowId, (usize, &Row)> =
        old.iter().enumerate().map(|(i, r)| (r.id(), (i, r))).collect();
    let expected_reloads: HashSet<&RowId> = new
        .iter()
        .filter(|r| {
            old_by_id
                .get(r.id())
                .is_some_and(|(_, o)| o.render_hash() != r.render_hash())
        })
        .map(Row::id)
        .collect();
    prop_assert_eq!(ids_at(new, &diff.reloads), expected_reloads.clone());

    for id in added.iter().chain(expected_reloads.iter()) {
        prop_assert!(next.dirty_row_ids().contains(*id));
    }

    // Shared rows that did not move keep their relative order.
    let moved: HashSet<usize> = diff.moves.iter().map(|m| m.to).collect();
    let stable_old_positions: Vec<usize> = new
        .iter()
        .enumerate()
        .filter(|(i, _)| !moved.contains(i))
        .filter_map(|(_, r)| old_by_id.get(r.id()).map(|(pos, _)| *pos))
        .collect();
    prop_assert!(stable_old_positions.windows(2).all(|w| w[0] < w[1]));
    Ok(())
}

// ===== Properties =====

proptest! {
    #[test]
    fn projection_is_deterministic(source in arb_source(), ui in arb_ui()) {
        prop_assert_eq!(project(&source, &ui, None), project(&source, &ui, None));
    }

    #[test]
    fn row_ids_are_unique(source in arb_source(), ui in arb_ui()) {
        let result = project(&source, &ui, None);
        prop_assert_eq!(id_set(result.rows()).len(), result.rows().len());
    }

    #[test]
    fn reprojection_of_same_state_is_empty_diff(source in arb_source(), ui in arb_ui()) {
        let first = project(&source, &ui, None);
        let second = project(&source, &ui, Some(&first));
        prop_assert!(second.diff().is_empty());
        prop_assert!(second.dirty_row_ids().is_empty());
    }

    #[test]
    fn diff_is_identity_based(
        before in arb_source(),
        after in arb_source(),
        ui_before in arb_ui(),
        ui_after in arb_ui(),
    ) {
        let previous = project(&before, &ui_before, None);
        let next = project(&after, &ui_after, Some(&previous));
        check_diff(&previous, &next)?;
    }

    #[test]
    fn ui_toggles_diff_consistently(source in arb_source(), ui_before in arb_ui(), ui_after in arb_ui()) {
        let previous = project(&source, &ui_before, None);
        let next = project(&source, &ui_after, Some(&previous));
        check_diff(&previous, &next)?;
    }

    #[test]
    fn rollup_summaries_are_consistent(source in arb_source(), ui in arb_ui()) {
        let result = project(&source, &ui, None);
        for row in result.rows() {
            if let RowPayload::RollupSummary(summary) = row.payload() {
                prop_assert!(summary.hidden_count <= summary.total_tool_count);
                let breakdown_total: usize = summary.breakdown.iter().map(|e| e.count).sum();
                prop_assert_eq!(breakdown_total, summary.hidden_count);
                prop_assert!(!ui.expanded_rollups.contains(&summary.group_id));
                prop_assert!(!summary.expanded);
                prop_assert!(summary
                    .breakdown
                    .windows(2)
                    .all(|w| w[0].count > w[1].count
                        || (w[0].count == w[1].count && w[0].tool_name < w[1].tool_name)));
            }
        }
    }

    #[test]
    fn chrome_rows_frame_the_body(source in arb_source(), ui in arb_ui()) {
        let result = project(&source, &ui, None);
        let rows = result.rows();
        prop_assert_eq!(rows.last().map(|r| r.id().as_str()), Some("bottom-spacer"));
        let has_approval = rows.iter().any(|r| r.id().as_str() == "approval-card");
        let has_live = rows.iter().any(|r| r.id().as_str() == "live-indicator");
        prop_assert!(!(has_approval && has_live));
        prop_assert_eq!(has_approval, source.session.pending_approval.is_some());
        if source.session.has_more_history {
            prop_assert_eq!(rows[0].id().as_str(), "load-more");
        }
    }
}
