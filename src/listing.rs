//! Plain-text and JSON listings of a projection.
//!
//! Used by the binary; handy in tests because a listing shows row order,
//! kinds and payload summaries at a glance.

use crate::view_state::projector::ProjectionResult;
use crate::view_state::row::{Row, RowPayload};

/// One line per row: position, kind, id and a short payload summary.
pub fn format_rows(rows: &[Row]) -> String {
    let mut out = String::new();
    for (index, row) in rows.iter().enumerate() {
        let summary = summarize(row.payload());
        out.push_str(&format!("{index:<4}  {:<14}  {}", row.kind().as_str(), row.id()));
        if !summary.is_empty() {
            out.push_str("  ");
            out.push_str(&summary);
        }
        out.push('\n');
    }
    out
}

/// Diff counts as a single line, e.g. `+3 -1 ~0 >0 dirty=4`.
pub fn format_diff_summary(result: &ProjectionResult) -> String {
    let diff = result.diff();
    format!(
        "+{} -{} ~{} >{} dirty={}",
        diff.insertions.len(),
        diff.deletions.len(),
        diff.reloads.len(),
        diff.moves.len(),
        result.dirty_row_ids().len()
    )
}

/// Pretty JSON of the whole projection.
///
/// # Errors
///
/// Propagates serializer failures.
pub fn to_json(result: &ProjectionResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

fn summarize(payload: &RowPayload) -> String {
    match payload {
        RowPayload::Message {
            markdown_expanded,
            card_expanded,
            ..
        } => flags(&[("markdown", *markdown_expanded), ("card", *card_expanded)]),
        RowPayload::Tool {
            card_expanded,
            collapse_group,
            ..
        } => {
            let mut summary = flags(&[("card", *card_expanded)]);
            if let Some(group) = collapse_group {
                if !summary.is_empty() {
                    summary.push(' ');
                }
                summary.push_str(&format!("[collapse {group}]"));
            }
            summary
        }
        RowPayload::TurnHeader { number, status, .. } => {
            format!("#{number} {}", status.as_str())
        }
        RowPayload::RollupSummary(summary) => {
            let breakdown: Vec<String> = summary
                .breakdown
                .iter()
                .map(|entry| format!("{} x{}", entry.tool_name, entry.count))
                .collect();
            format!(
                "{} hidden of {} tools ({})",
                summary.hidden_count,
                summary.total_tool_count,
                breakdown.join(", ")
            )
        }
        RowPayload::MessageCount { loaded, total } => format!("{loaded}/{total}"),
        RowPayload::LiveIndicator { current_tool } => current_tool.clone().unwrap_or_default(),
        RowPayload::ApprovalCard { approval_id, kind } => {
            format!("{approval_id} {}", kind.as_str())
        }
        RowPayload::LoadMore | RowPayload::BottomSpacer => String::new(),
    }
}

fn flags(pairs: &[(&str, bool)]) -> String {
    pairs
        .iter()
        .filter(|(_, on)| *on)
        .map(|(name, _)| format!("[{name}]"))
        .collect::<Vec<_>>()
        .join(" ")
}
