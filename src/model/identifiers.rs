//! Core identifier newtypes with smart constructors.
//!
//! All identifiers validate non-empty strings at construction time.
//! Raw constructors are never exported - use smart constructors only.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a message in the conversation log.
/// NEVER export the constructor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageId(String);

impl MessageId {
    /// Smart constructor: validates non-empty message ID
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidMessageId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidMessageId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MessageId {
    type Error = InvalidMessageId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<MessageId> for String {
    fn from(id: MessageId) -> Self {
        id.0
    }
}

/// Identifier of a turn (one user-initiated exchange).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TurnId(String);

impl TurnId {
    /// Smart constructor: validates non-empty turn ID
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidTurnId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidTurnId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TurnId {
    type Error = InvalidTurnId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<TurnId> for String {
    fn from(id: TurnId) -> Self {
        id.0
    }
}

// ===== Error Types =====

/// Rejected message identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMessageId {
    /// The identifier was the empty string.
    #[error("Message ID cannot be empty")]
    Empty,
}

/// Rejected turn identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTurnId {
    /// The identifier was the empty string.
    #[error("Turn ID cannot be empty")]
    Empty,
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_id_accepts_valid_string() {
        assert!(MessageId::new("msg_01HZX").is_ok());
    }

    #[test]
    fn message_id_rejects_empty_string() {
        assert_eq!(MessageId::new(""), Err(InvalidMessageId::Empty));
    }

    #[test]
    fn message_id_display_returns_inner_string() {
        let id = MessageId::new("msg-42").expect("valid id");
        assert_eq!(id.to_string(), "msg-42");
        assert_eq!(id.as_str(), "msg-42");
    }

    #[test]
    fn turn_id_rejects_empty_string() {
        assert_eq!(TurnId::new(""), Err(InvalidTurnId::Empty));
    }

    #[test]
    fn message_id_deserializes_from_plain_string() {
        let id: MessageId = serde_json::from_str("\"abc\"").expect("valid json");
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn message_id_deserialization_rejects_empty_string() {
        let result: Result<MessageId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err(), "empty id must not deserialize");
    }

    #[test]
    fn turn_id_serializes_as_plain_string() {
        let id = TurnId::new("turn-7").expect("valid id");
        assert_eq!(serde_json::to_string(&id).expect("serializes"), "\"turn-7\"");
    }
}
