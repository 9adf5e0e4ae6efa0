//! Core view-state newtypes

use crate::model::{MessageId, TurnId};
use serde::Serialize;
use std::fmt;

/// Stable, content-independent key of a display row.
///
/// Encodes the row role plus the underlying entity identifier, e.g.
/// `message:<id>`, `tool:<id>`, `turn:<id>`, `rollup:<group>`. Singleton
/// roles (`load-more`, `message-count`, `live-indicator`, `approval-card`,
/// `bottom-spacer`) carry no entity part.
///
/// Two projections of the same entity always yield the same `RowId`; the
/// identity diff relies on this.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Row showing a conversational message.
    pub fn message(id: &MessageId) -> Self {
        Self(format!("message:{id}"))
    }

    /// Row showing a tool/reasoning entry of a work group.
    pub fn tool(id: &MessageId) -> Self {
        Self(format!("tool:{id}"))
    }

    /// Header row of a turn.
    pub fn turn_header(id: &TurnId) -> Self {
        Self(format!("turn:{id}"))
    }

    /// Summary row of a collapsible work group.
    pub fn rollup(group_id: &str) -> Self {
        Self(format!("rollup:{group_id}"))
    }

    /// "Load earlier messages" row.
    pub fn load_more() -> Self {
        Self("load-more".to_string())
    }

    /// Message-count banner row.
    pub fn message_count() -> Self {
        Self("message-count".to_string())
    }

    /// Live activity row.
    pub fn live_indicator() -> Self {
        Self("live-indicator".to_string())
    }

    /// Pending approval row.
    pub fn approval_card() -> Self {
        Self("approval-card".to_string())
    }

    /// Trailing spacer row.
    pub fn bottom_spacer() -> Self {
        Self("bottom-spacer".to_string())
    }

    /// Borrow the raw key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Viewport width quantized into fixed-size bins. Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct WidthBucket(u32);

impl WidthBucket {
    /// Smallest bucket; used before any width is known.
    pub const MIN: Self = Self(1);

    /// Quantize a viewport width: `max(1, round(width / bucket_size))`.
    ///
    /// Non-finite or non-positive widths map to [`WidthBucket::MIN`]; a
    /// non-positive `bucket_size` is treated as 1.
    ///
    /// # Examples
    /// ```
    /// # use convo_timeline::view_state::types::WidthBucket;
    /// assert_eq!(WidthBucket::quantize(400.0, 20.0).get(), 20);
    /// assert_eq!(WidthBucket::quantize(409.0, 20.0).get(), 20);
    /// assert_eq!(WidthBucket::quantize(411.0, 20.0).get(), 21);
    /// assert_eq!(WidthBucket::quantize(3.0, 20.0).get(), 1);
    /// ```
    pub fn quantize(width: f64, bucket_size: f64) -> Self {
        let bucket_size = if bucket_size.is_finite() && bucket_size > 0.0 {
            bucket_size
        } else {
            1.0
        };
        if !width.is_finite() || width <= 0.0 {
            return Self::MIN;
        }
        let bins = (width / bucket_size).round();
        if bins >= f64::from(u32::MAX) {
            return Self(u32::MAX);
        }
        Self((bins as u32).max(1))
    }

    /// Construct from a raw bucket number, clamping to >= 1.
    pub fn new(bucket: u32) -> Self {
        Self(bucket.max(1))
    }

    /// Raw bucket number.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for WidthBucket {
    fn default() -> Self {
        Self::MIN
    }
}

/// Measured height of a row in layout units. Always finite and within
/// `0..=RowHeight::MAX_VALUE`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct RowHeight(f64);

/// Error returned for a NaN, infinite, negative or oversized height.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("row height must be finite and within [0, 1e9] (got {0})")]
pub struct InvalidRowHeight(pub f64);

impl RowHeight {
    /// Fallback for rows that cannot be resolved or are not measured yet.
    pub const PLACEHOLDER: Self = Self(1.0);

    /// Zero height.
    pub const ZERO: Self = Self(0.0);

    /// Largest accepted height. Keeps offset sums over any realistic row
    /// count inside the height index's integer range.
    pub const MAX_VALUE: f64 = 1e9;

    /// Smart constructor that validates the height.
    pub fn new(height: f64) -> Result<Self, InvalidRowHeight> {
        if height.is_finite() && (0.0..=Self::MAX_VALUE).contains(&height) {
            Ok(Self(height))
        } else {
            Err(InvalidRowHeight(height))
        }
    }

    /// Raw value.
    pub fn get(&self) -> f64 {
        self.0
    }
}

impl Default for RowHeight {
    fn default() -> Self {
        Self::PLACEHOLDER
    }
}
