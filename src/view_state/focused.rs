//! Focused-mode segmentation of a turn's messages.
//!
//! A turn splits into a leading span (before the first tool call), a tool
//! zone (first through last tool call) and a trailing span. Inside the zone,
//! conversational messages break the flow and maximal runs of work items form
//! work groups.

use crate::model::Message;

/// One element of a turn's tool zone.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ZoneItem<'a> {
    /// A non-work message shown as its own message row.
    Breaker(&'a Message),
    /// A maximal run of tool calls, tool results and reasoning.
    WorkGroup(Vec<&'a Message>),
}

/// A turn's messages split for focused display.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TurnSegments<'a> {
    pub leading: Vec<&'a Message>,
    pub zone: Vec<ZoneItem<'a>>,
    pub trailing: Vec<&'a Message>,
}

/// Split `messages` (already resolved, in turn order) into segments.
///
/// A turn without any tool call is entirely leading.
pub(crate) fn segment<'a>(messages: &[&'a Message]) -> TurnSegments<'a> {
    let first = messages.iter().position(|m| m.kind().is_tool_call());
    let last = messages.iter().rposition(|m| m.kind().is_tool_call());

    let (first, last) = match (first, last) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return TurnSegments {
                leading: messages.to_vec(),
                ..TurnSegments::default()
            }
        }
    };

    let mut zone = Vec::new();
    let mut group: Vec<&'a Message> = Vec::new();
    for &message in &messages[first..=last] {
        if message.kind().is_work_item() {
            group.push(message);
        } else {
            if !group.is_empty() {
                zone.push(ZoneItem::WorkGroup(std::mem::take(&mut group)));
            }
            zone.push(ZoneItem::Breaker(message));
        }
    }
    if !group.is_empty() {
        zone.push(ZoneItem::WorkGroup(group));
    }

    TurnSegments {
        leading: messages[..first].to_vec(),
        zone,
        trailing: messages[last + 1..].to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MessageId, MessageKind};

    fn m(id: &str, kind: MessageKind) -> Message {
        Message::new(MessageId::new(id).unwrap(), kind, id)
    }

    fn ids(messages: &[&Message]) -> Vec<String> {
        messages.iter().map(|m| m.id().to_string()).collect()
    }

    #[test]
    fn turn_without_tools_is_all_leading() {
        let a = m("u", MessageKind::User);
        let b = m("a", MessageKind::Assistant);
        let seg = segment(&[&a, &b]);
        assert_eq!(ids(&seg.leading), vec!["u", "a"]);
        assert!(seg.zone.is_empty());
        assert!(seg.trailing.is_empty());
    }

    #[test]
    fn reasoning_before_first_tool_call_is_leading() {
        let u = m("u", MessageKind::User);
        let r = m("r", MessageKind::Reasoning);
        let c = m("c", MessageKind::ToolCall);
        let seg = segment(&[&u, &r, &c]);
        assert_eq!(ids(&seg.leading), vec!["u", "r"]);
        assert_eq!(seg.zone, vec![ZoneItem::WorkGroup(vec![&c])]);
    }

    #[test]
    fn breakers_split_work_groups() {
        let u = m("u", MessageKind::User);
        let c1 = m("c1", MessageKind::ToolCall);
        let r1 = m("r1", MessageKind::ToolResult);
        let a = m("a", MessageKind::Assistant);
        let c2 = m("c2", MessageKind::ToolCall);
        let done = m("done", MessageKind::Assistant);
        let seg = segment(&[&u, &c1, &r1, &a, &c2, &done]);

        assert_eq!(ids(&seg.leading), vec!["u"]);
        assert_eq!(
            seg.zone,
            vec![
                ZoneItem::WorkGroup(vec![&c1, &r1]),
                ZoneItem::Breaker(&a),
                ZoneItem::WorkGroup(vec![&c2]),
            ]
        );
        assert_eq!(ids(&seg.trailing), vec!["done"]);
    }

    #[test]
    fn tool_result_after_last_call_is_trailing() {
        let c = m("c", MessageKind::ToolCall);
        let r = m("r", MessageKind::ToolResult);
        let seg = segment(&[&c, &r]);
        assert_eq!(seg.zone, vec![ZoneItem::WorkGroup(vec![&c])]);
        assert_eq!(ids(&seg.trailing), vec!["r"]);
    }

    #[test]
    fn shell_message_breaks_a_group() {
        let c1 = m("c1", MessageKind::ToolCall);
        let s = m("s", MessageKind::Shell);
        let c2 = m("c2", MessageKind::ToolCall);
        let seg = segment(&[&c1, &s, &c2]);
        assert_eq!(seg.zone.len(), 3);
        assert_eq!(seg.zone[1], ZoneItem::Breaker(&s));
    }
}
