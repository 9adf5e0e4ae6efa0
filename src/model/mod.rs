//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.
//! Messages and turns are owned by the caller; the engine only reads them.

pub mod error;
pub mod identifiers;
pub mod message;
pub mod session;
pub mod tool;
pub mod turn;

// Re-export for convenience
pub use identifiers::{InvalidMessageId, InvalidTurnId, MessageId, TurnId};
pub use message::{ImageAttachment, Message, MessageKind, TokenUsage, SYSTEM_NOISE_MARKERS};
pub use session::{ApprovalKind, PendingApproval, SessionMeta, UnknownViewMode, ViewMode};
pub use tool::ToolCategory;
pub use turn::{Turn, TurnStatus};
