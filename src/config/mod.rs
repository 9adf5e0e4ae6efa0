//! Configuration module.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, CliOverrides, ConfigError,
    ConfigFile, ResolvedConfig, TimelineSection,
};

/// Tunable thresholds for projection and width bucketing.
///
/// Passed explicitly to the reducer and projector so both stay pure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelinePolicy {
    /// Width of one viewport bucket in layout units.
    pub width_bucket_size: f64,
    /// Work groups smaller than this are never collapsed.
    pub rollup_min_group_size: usize,
    /// Entries left visible at the tail of a collapsed work group.
    pub rollup_visible_tail: usize,
    /// The message-count row appears once the session exceeds this many messages.
    pub message_count_threshold: usize,
    /// Bytes sampled from each end of a text field for its hash signature.
    pub text_signature_sample: usize,
}

impl TimelinePolicy {
    /// Default bucket width.
    pub const DEFAULT_WIDTH_BUCKET_SIZE: f64 = 20.0;
    /// Default minimum collapsible group size.
    pub const DEFAULT_ROLLUP_MIN_GROUP_SIZE: usize = 2;
    /// Default visible tail of a collapsed group.
    pub const DEFAULT_ROLLUP_VISIBLE_TAIL: usize = 2;
    /// Default message-count display threshold.
    pub const DEFAULT_MESSAGE_COUNT_THRESHOLD: usize = 50;
    /// Default text signature sample length.
    pub const DEFAULT_TEXT_SIGNATURE_SAMPLE: usize = 64;
}

impl Default for TimelinePolicy {
    fn default() -> Self {
        Self {
            width_bucket_size: Self::DEFAULT_WIDTH_BUCKET_SIZE,
            rollup_min_group_size: Self::DEFAULT_ROLLUP_MIN_GROUP_SIZE,
            rollup_visible_tail: Self::DEFAULT_ROLLUP_VISIBLE_TAIL,
            message_count_threshold: Self::DEFAULT_MESSAGE_COUNT_THRESHOLD,
            text_signature_sample: Self::DEFAULT_TEXT_SIGNATURE_SAMPLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_documented_thresholds() {
        let policy = TimelinePolicy::default();
        assert_eq!(policy.rollup_min_group_size, 2);
        assert_eq!(policy.rollup_visible_tail, 2);
        assert_eq!(policy.message_count_threshold, 50);
        assert_eq!(policy.width_bucket_size, 20.0);
    }

    #[test]
    fn policy_is_copy() {
        let policy = TimelinePolicy::default();
        let copy = policy;
        assert_eq!(policy, copy);
    }
}
