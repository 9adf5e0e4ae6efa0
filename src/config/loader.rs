//! Configuration file loading with precedence handling.

use super::TimelinePolicy;
use crate::model::ViewMode;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "CONVO_TIMELINE_CONFIG";

/// Environment variable overriding the view mode.
pub const VIEW_MODE_ENV_VAR: &str = "CONVO_TIMELINE_VIEW_MODE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/convo-timeline/config.toml`.
///
/// ```toml
/// view_mode = "verbose"
///
/// [timeline]
/// width_bucket_size = 32.0
/// rollup_visible_tail = 3
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Initial view mode.
    #[serde(default)]
    pub view_mode: Option<ViewMode>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Projection thresholds.
    #[serde(default)]
    pub timeline: Option<TimelineSection>,
}

/// `[timeline]` section: overrides for [`TimelinePolicy`] fields.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TimelineSection {
    /// Width of one viewport bucket.
    #[serde(default)]
    pub width_bucket_size: Option<f64>,
    /// Minimum collapsible work group size.
    #[serde(default)]
    pub rollup_min_group_size: Option<usize>,
    /// Visible tail of a collapsed work group.
    #[serde(default)]
    pub rollup_visible_tail: Option<usize>,
    /// Message-count row threshold.
    #[serde(default)]
    pub message_count_threshold: Option<usize>,
    /// Text signature sample length.
    #[serde(default)]
    pub text_signature_sample: Option<usize>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Initial view mode.
    pub view_mode: ViewMode,
    /// Whether `view_mode` came from the env var or a CLI flag. An explicit
    /// mode overrides the snapshot's own; otherwise it is only a fallback.
    pub view_mode_explicit: bool,
    /// Projection thresholds.
    pub policy: TimelinePolicy,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::default(),
            view_mode_explicit: false,
            policy: TimelinePolicy::default(),
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/convo-timeline/convo-timeline.log` on Unix-like
/// systems, or the platform state directory elsewhere. Falls back to the
/// current directory when no state directory is known.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("convo-timeline").join("convo-timeline.log")
    } else {
        PathBuf::from("convo-timeline.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/convo-timeline/config.toml` on Unix, the platform
/// config directory elsewhere, `None` if it cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("convo-timeline").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CONVO_TIMELINE_CONFIG` environment variable
/// 3. Default path `~/.config/convo-timeline/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// `CONVO_TIMELINE_VIEW_MODE` overrides the view mode; unparseable values
/// are ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(mode) = std::env::var(VIEW_MODE_ENV_VAR)
        .ok()
        .and_then(|raw| raw.parse::<ViewMode>().ok())
    {
        config.view_mode = mode;
        config.view_mode_explicit = true;
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let section = config.timeline.unwrap_or_default();
    let base = defaults.policy;
    let policy = TimelinePolicy {
        width_bucket_size: section
            .width_bucket_size
            .unwrap_or(base.width_bucket_size),
        rollup_min_group_size: section
            .rollup_min_group_size
            .unwrap_or(base.rollup_min_group_size),
        rollup_visible_tail: section
            .rollup_visible_tail
            .unwrap_or(base.rollup_visible_tail),
        message_count_threshold: section
            .message_count_threshold
            .unwrap_or(base.message_count_threshold),
        text_signature_sample: section
            .text_signature_sample
            .unwrap_or(base.text_signature_sample),
    };

    ResolvedConfig {
        view_mode: config.view_mode.unwrap_or(defaults.view_mode),
        view_mode_explicit: false,
        policy,
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Overrides taken from command-line flags. `None` leaves the value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CliOverrides {
    /// `--view-mode`
    pub view_mode: Option<ViewMode>,
    /// `--bucket-size`
    pub width_bucket_size: Option<f64>,
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, overrides: CliOverrides) -> ResolvedConfig {
    if let Some(mode) = overrides.view_mode {
        config.view_mode = mode;
        config.view_mode_explicit = true;
    }

    if let Some(size) = overrides.width_bucket_size {
        config.policy.width_bucket_size = size;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
