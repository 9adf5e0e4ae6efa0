//! Message types for the conversation log.
//!
//! Messages are owned by the caller; the engine only reads them.
//! Raw constructors are never exported - use smart constructors only.

use crate::model::MessageId;
use serde::{Deserialize, Serialize};

/// Content markers identifying injected system context rather than conversation.
///
/// A user/assistant/steer message whose trimmed text starts with one of these
/// is never projected.
pub const SYSTEM_NOISE_MARKERS: &[&str] = &[
    "<environment_context>",
    "<user_instructions>",
    "<system-reminder>",
    "<turn_aborted>",
    "# AGENTS.md instructions",
];

// ===== MessageKind =====

/// Role/kind of a message in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Text typed by the user.
    User,
    /// Visible assistant output.
    Assistant,
    /// Assistant reasoning summary.
    Reasoning,
    /// Tool invocation.
    ToolCall,
    /// Tool output delivered as its own message.
    ToolResult,
    /// Mid-turn steering input from the user.
    Steer,
    /// Shell command run directly by the user.
    Shell,
}

impl MessageKind {
    /// Canonical lowercase name, stable across releases (folded into hashes).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Reasoning => "reasoning",
            Self::ToolCall => "tool_call",
            Self::ToolResult => "tool_result",
            Self::Steer => "steer",
            Self::Shell => "shell",
        }
    }

    /// Whether this kind anchors a turn's tool zone.
    pub fn is_tool_call(&self) -> bool {
        matches!(self, Self::ToolCall)
    }

    /// Whether this kind belongs inside a collapsible work group.
    pub fn is_work_item(&self) -> bool {
        matches!(self, Self::ToolCall | Self::ToolResult | Self::Reasoning)
    }

    /// Whether this kind carries free conversational text that may be noise.
    fn is_conversational(&self) -> bool {
        matches!(self, Self::User | Self::Assistant | Self::Steer)
    }
}

// ===== TokenUsage =====

/// Token counts attributed to a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt-side tokens.
    #[serde(default)]
    pub input: u64,
    /// Completion-side tokens.
    #[serde(default)]
    pub output: u64,
}

// ===== ImageAttachment =====

/// Image attached to a message. Only identity and size reach the hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageAttachment {
    /// Attachment identifier.
    pub id: String,
    /// MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// Encoded size in bytes.
    pub byte_size: u64,
}

// ===== Message =====

/// Immutable record in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    kind: MessageKind,
    #[serde(default)]
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    usage: Option<TokenUsage>,
    #[serde(default)]
    in_progress: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    images: Vec<ImageAttachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thinking: Option<String>,
}

impl Message {
    /// Create a message with the given kind and text; all optional fields empty.
    pub fn new(id: MessageId, kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            text: text.into(),
            tool_name: None,
            tool_input: None,
            tool_output: None,
            duration_ms: None,
            usage: None,
            in_progress: false,
            images: Vec::new(),
            thinking: None,
        }
    }

    /// Create a tool-call message for `tool_name` with serialized `input`.
    pub fn tool_call(id: MessageId, tool_name: impl Into<String>, input: impl Into<String>) -> Self {
        let mut message = Self::new(id, MessageKind::ToolCall, "");
        message.tool_name = Some(tool_name.into());
        message.tool_input = Some(input.into());
        message
    }

    /// Attach tool output.
    pub fn with_tool_output(mut self, output: impl Into<String>) -> Self {
        self.tool_output = Some(output.into());
        self
    }

    /// Attach a tool name (for tool results or shell messages).
    pub fn with_tool_name(mut self, name: impl Into<String>) -> Self {
        self.tool_name = Some(name.into());
        self
    }

    /// Attach a wall-clock duration in milliseconds.
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Attach token usage.
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Mark the message as still streaming / running.
    pub fn with_in_progress(mut self, in_progress: bool) -> Self {
        self.in_progress = in_progress;
        self
    }

    /// Attach an image.
    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.images.push(image);
        self
    }

    /// Attach thinking text.
    pub fn with_thinking(mut self, thinking: impl Into<String>) -> Self {
        self.thinking = Some(thinking.into());
        self
    }

    /// Message identifier.
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Message kind.
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Free text body.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Tool name, if any.
    pub fn tool_name(&self) -> Option<&str> {
        self.tool_name.as_deref()
    }

    /// Serialized tool input, if any.
    pub fn tool_input(&self) -> Option<&str> {
        self.tool_input.as_deref()
    }

    /// Tool output, if any.
    pub fn tool_output(&self) -> Option<&str> {
        self.tool_output.as_deref()
    }

    /// Duration in milliseconds, if reported.
    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    /// Token usage, if reported.
    pub fn usage(&self) -> Option<TokenUsage> {
        self.usage
    }

    /// Whether the message is still streaming / running.
    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    /// Attached images in attachment order.
    pub fn images(&self) -> &[ImageAttachment] {
        &self.images
    }

    /// Thinking text, if any.
    pub fn thinking(&self) -> Option<&str> {
        self.thinking.as_deref()
    }

    /// Whether this message is injected system context that is never shown.
    pub fn is_system_noise(&self) -> bool {
        if !self.kind.is_conversational() {
            return false;
        }
        let trimmed = self.text.trim_start();
        SYSTEM_NOISE_MARKERS
            .iter()
            .any(|marker| trimmed.starts_with(marker))
    }
}
