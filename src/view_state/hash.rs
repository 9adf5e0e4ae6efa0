//! Stable row fingerprints.
//!
//! FNV-1a over a canonical field traversal. Integers are written
//! little-endian at fixed width and strings are length-prefixed, so the same
//! row hashes identically on every platform and every run.

use crate::model::{Message, SessionMeta, Turn};
use crate::view_state::row::{RowKind, RowPayload};
use crate::view_state::types::WidthBucket;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Incremental 64-bit FNV-1a hasher with canonical field encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StableHasher {
    state: u64,
}

impl Default for StableHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl StableHasher {
    /// Fresh hasher at the FNV offset basis.
    pub fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }

    /// Feed raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= u64::from(b);
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }

    /// Feed a u64 as 8 little-endian bytes.
    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Feed a usize widened to u64.
    pub fn write_usize(&mut self, value: usize) {
        self.write_u64(value as u64);
    }

    /// Feed a bool as one byte.
    pub fn write_bool(&mut self, value: bool) {
        self.write_bytes(&[u8::from(value)]);
    }

    /// Feed a length-prefixed string.
    pub fn write_str(&mut self, value: &str) {
        self.write_usize(value.len());
        self.write_bytes(value.as_bytes());
    }

    /// Feed an optional string (presence byte, then the string).
    pub fn write_opt_str(&mut self, value: Option<&str>) {
        match value {
            Some(s) => {
                self.write_bool(true);
                self.write_str(s);
            }
            None => self.write_bool(false),
        }
    }

    /// Feed an optional u64 (presence byte, then the value).
    pub fn write_opt_u64(&mut self, value: Option<u64>) {
        match value {
            Some(v) => {
                self.write_bool(true);
                self.write_u64(v);
            }
            None => self.write_bool(false),
        }
    }

    /// Feed a bounded signature of `text`: byte length, then up to `sample`
    /// bytes from the start and up to `sample` bytes from the end.
    ///
    /// Texts no longer than `2 * sample` bytes are hashed in full.
    pub fn write_text_signature(&mut self, text: &str, sample: usize) {
        let bytes = text.as_bytes();
        self.write_usize(bytes.len());
        if bytes.len() <= sample.saturating_mul(2) {
            self.write_bytes(bytes);
            return;
        }
        self.write_bytes(&bytes[..sample]);
        self.write_bytes(&bytes[bytes.len() - sample..]);
    }

    /// Optional variant of [`StableHasher::write_text_signature`].
    pub fn write_opt_text_signature(&mut self, text: Option<&str>, sample: usize) {
        match text {
            Some(t) => {
                self.write_bool(true);
                self.write_text_signature(t, sample);
            }
            None => self.write_bool(false),
        }
    }

    /// Current hash value.
    pub fn finish(&self) -> u64 {
        self.state
    }
}

/// Start a render hash: kind tag plus payload fingerprint.
fn begin(kind: RowKind, payload: &RowPayload) -> StableHasher {
    let mut h = StableHasher::new();
    h.write_str(kind.as_str());
    payload.write_fingerprint(&mut h);
    h
}

/// Render hash of a row whose payload is its whole visible content
/// (load-more, message-count, bottom spacer, rollup summary).
pub fn payload_render_hash(kind: RowKind, payload: &RowPayload) -> u64 {
    begin(kind, payload).finish()
}

/// Render hash of a message or tool row.
pub fn message_render_hash(
    kind: RowKind,
    payload: &RowPayload,
    message: &Message,
    sample: usize,
) -> u64 {
    let mut h = begin(kind, payload);
    h.write_str(message.id().as_str());
    h.write_str(message.kind().as_str());
    h.write_text_signature(message.text(), sample);
    h.write_opt_str(message.tool_name());
    h.write_opt_text_signature(message.tool_input(), sample);
    h.write_opt_text_signature(message.tool_output(), sample);
    h.write_opt_u64(message.duration_ms());
    match message.usage() {
        Some(usage) => {
            h.write_bool(true);
            h.write_u64(usage.input);
            h.write_u64(usage.output);
        }
        None => h.write_bool(false),
    }
    h.write_bool(message.is_in_progress());
    h.write_opt_text_signature(message.thinking(), sample);
    h.write_usize(message.images().len());
    for image in message.images() {
        h.write_str(&image.id);
        h.write_str(&image.mime_type);
        h.write_u64(image.byte_size);
    }
    h.finish()
}

/// Render hash of a turn header row.
pub fn turn_render_hash(kind: RowKind, payload: &RowPayload, turn: &Turn) -> u64 {
    let mut h = begin(kind, payload);
    h.write_u64(u64::from(turn.number));
    h.write_usize(turn.tools_used.len());
    for tool in &turn.tools_used {
        h.write_str(tool);
    }
    h.write_usize(turn.changed_files.len());
    for file in &turn.changed_files {
        h.write_str(file);
    }
    h.write_u64(turn.token_delta);
    h.write_str(turn.status.as_str());
    h.finish()
}

/// Render hash of a live-indicator or approval-card row.
pub fn session_render_hash(kind: RowKind, payload: &RowPayload, session: &SessionMeta) -> u64 {
    let mut h = begin(kind, payload);
    h.write_bool(session.is_active);
    h.write_opt_str(session.current_tool.as_deref());
    match &session.pending_approval {
        Some(approval) => {
            h.write_bool(true);
            h.write_str(&approval.id);
            h.write_str(approval.kind.as_str());
        }
        None => h.write_bool(false),
    }
    h.finish()
}

/// Layout hash: render identity refined by the viewport width bucket.
pub fn layout_hash(
    kind: RowKind,
    payload: &RowPayload,
    render_hash: u64,
    width_bucket: WidthBucket,
) -> u64 {
    let mut h = begin(kind, payload);
    h.write_u64(render_hash);
    h.write_u64(u64::from(width_bucket.get()));
    h.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MessageId, MessageKind};

    fn hash_of(f: impl FnOnce(&mut StableHasher)) -> u64 {
        let mut h = StableHasher::new();
        f(&mut h);
        h.finish()
    }

    #[test]
    fn empty_input_is_offset_basis() {
        assert_eq!(StableHasher::new().finish(), FNV_OFFSET_BASIS);
    }

    #[test]
    fn known_fnv1a_vector() {
        // FNV-1a 64 of "a"
        assert_eq!(hash_of(|h| h.write_bytes(b"a")), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn length_prefix_separates_adjacent_strings() {
        let ab_c = hash_of(|h| {
            h.write_str("ab");
            h.write_str("c");
        });
        let a_bc = hash_of(|h| {
            h.write_str("a");
            h.write_str("bc");
        });
        assert_ne!(ab_c, a_bc);
    }

    #[test]
    fn none_and_empty_string_differ() {
        assert_ne!(
            hash_of(|h| h.write_opt_str(None)),
            hash_of(|h| h.write_opt_str(Some("")))
        );
    }

    #[test]
    fn text_signature_detects_edit_at_either_end() {
        let body = "x".repeat(10_000);
        let base = hash_of(|h| h.write_text_signature(&body, 64));
        let edited_end = format!("{body}!");
        let edited_start = format!("!{}", &body[1..]);
        assert_ne!(base, hash_of(|h| h.write_text_signature(&edited_end, 64)));
        assert_ne!(base, hash_of(|h| h.write_text_signature(&edited_start, 64)));
    }

    #[test]
    fn text_signature_ignores_same_length_middle_edit_on_long_text() {
        let mut a = "a".repeat(1_000);
        let b = a.clone();
        a.replace_range(500..501, "b");
        assert_eq!(
            hash_of(|h| h.write_text_signature(&a, 64)),
            hash_of(|h| h.write_text_signature(&b, 64)),
            "only the bounded prefix/suffix and the length are sampled"
        );
    }

    #[test]
    fn short_text_is_hashed_in_full() {
        let a = "abcdefgh";
        let b = "abcdXfgh";
        assert_ne!(
            hash_of(|h| h.write_text_signature(a, 4)),
            hash_of(|h| h.write_text_signature(b, 4))
        );
    }

    #[test]
    fn message_hash_changes_with_in_progress_flag() {
        let id = MessageId::new("m1").unwrap();
        let payload = RowPayload::Message {
            message_id: id.clone(),
            markdown_expanded: false,
            card_expanded: false,
        };
        let streaming = Message::new(id.clone(), MessageKind::Assistant, "hi").with_in_progress(true);
        let done = Message::new(id, MessageKind::Assistant, "hi");
        assert_ne!(
            message_render_hash(RowKind::Message, &payload, &streaming, 64),
            message_render_hash(RowKind::Message, &payload, &done, 64)
        );
    }

    #[test]
    fn layout_hash_refines_render_hash_with_width() {
        let payload = RowPayload::BottomSpacer;
        let render = payload_render_hash(RowKind::BottomSpacer, &payload);
        let narrow = layout_hash(RowKind::BottomSpacer, &payload, render, WidthBucket::new(10));
        let wide = layout_hash(RowKind::BottomSpacer, &payload, render, WidthBucket::new(40));
        assert_ne!(narrow, wide);
        assert_eq!(
            narrow,
            layout_hash(RowKind::BottomSpacer, &payload, render, WidthBucket::new(10))
        );
    }
}
