//! View-state layer - projection, diffing, height caching and scroll anchoring
//!
//! Everything here is pure: no I/O, no logging, no clock.
//!
//! # Module Structure
//!
//! - `types`: Core newtypes (RowId, WidthBucket, RowHeight)
//! - `row`: Row, RowKind, RowPayload - one display row
//! - `hash`: StableHasher - FNV-1a render/layout fingerprints
//! - `focused`: Focused-mode segmentation of a turn
//! - `projector`: ProjectionResult - state to rows plus diff
//! - `diff`: RowDiff - identity-based edit script
//! - `cache`: HeightCache - memoized heights with correction guard
//! - `height_index`: HeightIndex - O(log n) row offsets via Fenwick tree
//! - `scroll`: Scroll-anchor geometry

pub mod cache;
pub mod diff;
mod focused;
pub mod hash;
pub mod height_index;
pub mod projector;
pub mod row;
pub mod scroll;
pub mod types;

pub use cache::{HeightCache, HeightCacheEntry, HeightCacheKey};
pub use diff::{diff_rows, RowDiff, RowMove};
pub use height_index::HeightIndex;
pub use projector::{project, project_with, rollup_group_id, ProjectionResult};
pub use row::{BreakdownEntry, Row, RowKind, RowPayload, RollupSummary};
pub use scroll::{ScrollReason, ScrollTarget};
pub use types::{InvalidRowHeight, RowHeight, RowId, WidthBucket};
