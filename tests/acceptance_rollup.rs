//! Acceptance: collapsing and expanding a tool-heavy turn.
//!
//! A turn with five tool calls collapses to a header, a rollup summary hiding
//! three calls, and the two most recent calls. Expanding the rollup replaces
//! the summary with the three hidden calls without touching the visible tail.

use convo_timeline::listing::format_rows;
use convo_timeline::model::{Message, MessageId, SessionMeta, Turn, TurnId};
use convo_timeline::state::{SourceState, TimelineAction, UiState};
use convo_timeline::view_state::{rollup_group_id, RowKind, RowPayload};
use convo_timeline::TimelineEngine;

fn tool_turn() -> SourceState {
    let tools = [("c1", "Read"), ("c2", "Read"), ("c3", "Bash"), ("c4", "Edit"), ("c5", "Bash")];
    let messages: Vec<Message> = tools
        .iter()
        .map(|(id, tool)| {
            Message::tool_call(
                MessageId::new(*id).expect("valid id"),
                *tool,
                format!("{tool} input"),
            )
        })
        .collect();
    let turn = Turn::new(t1(), 1)
        .with_messages(messages.iter().map(|m| m.id().clone()).collect());
    SourceState::new(messages, vec![turn], SessionMeta::default())
}

fn t1() -> TurnId {
    TurnId::new("t1").expect("valid id")
}

fn engine() -> TimelineEngine {
    TimelineEngine::with_state(Default::default(), tool_turn(), UiState::default())
}

#[test]
fn collapsed_turn_shows_header_rollup_and_tail() {
    let engine = engine();
    let rows = engine.projection().rows();

    let kinds: Vec<RowKind> = rows.iter().map(|r| r.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            RowKind::TurnHeader,
            RowKind::RollupSummary,
            RowKind::Tool,
            RowKind::Tool,
            RowKind::BottomSpacer
        ]
    );

    let RowPayload::RollupSummary(summary) = rows[1].payload() else {
        panic!("second row is the rollup");
    };
    assert_eq!(summary.hidden_count, 3);
    assert_eq!(summary.total_tool_count, 5);

    insta::assert_snapshot!(format_rows(rows).trim_end(), @r"
    0     turn_header     turn:t1  #1 active
    1     rollup_summary  rollup:t1#0  3 hidden of 5 tools (Read x2, Bash x1)
    2     tool            tool:c4
    3     tool            tool:c5
    4     bottom_spacer   bottom-spacer
    ");
}

#[test]
fn expanding_rollup_deletes_summary_and_inserts_hidden_calls() {
    let mut engine = engine();
    let group = rollup_group_id(&t1(), 0);
    let result = engine.dispatch(TimelineAction::ToggleRollup(group));

    let ids: Vec<&str> = result.rows().iter().map(|r| r.id().as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "turn:t1",
            "tool:c1",
            "tool:c2",
            "tool:c3",
            "tool:c4",
            "tool:c5",
            "bottom-spacer"
        ]
    );

    let diff = result.diff();
    assert_eq!(diff.deletions, vec![1], "rollup row removed");
    assert_eq!(diff.insertions, vec![1, 2, 3], "hidden calls inserted");
    assert!(diff.reloads.is_empty(), "visible tail untouched");
    assert!(diff.moves.is_empty());
}

#[test]
fn collapsing_again_restores_original_rows() {
    let mut engine = engine();
    let original = engine.projection().rows().to_vec();
    let group = rollup_group_id(&t1(), 0);

    engine.dispatch(TimelineAction::ToggleRollup(group.clone()));
    let result = engine.dispatch(TimelineAction::ToggleRollup(group));

    assert_eq!(result.rows(), original.as_slice());
    assert_eq!(result.diff().insertions, vec![1]);
    assert_eq!(result.diff().deletions, vec![3, 2, 1]);
}

