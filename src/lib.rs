//! Conversation Timeline
//!
//! Deterministic projection of a conversation log into stably identified
//! display rows, with identity-based diffing, a row-height cache that
//! tolerates late measurement corrections, and scroll-anchor math.
//!
//! Pure Core / Impure Shell: `state` and `view_state` never perform I/O or
//! log; `engine`, `source`, `logging` and the binary do.

pub mod config;
pub mod engine;
pub mod listing;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view_state;

pub use engine::{FlushOutcome, TimelineEngine, Viewport};
