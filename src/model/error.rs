//! Error types for the convo-timeline binary and snapshot loading.
//!
//! The projection core is total and never fails; everything here belongs to
//! the impure shell around it (config, logging, reading snapshots).
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error wrapping all shell failures
//!   - [`InputError`] - Snapshot file/stdin reading failures
//!   - [`SnapshotError`] - Snapshot JSON that does not describe a timeline
//!   - [`ConfigError`] - Config file read/parse failures
//!   - [`LoggingError`] - Tracing subscriber setup failures
//!
//! All variants compose via `?` and `From` conversions.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes.
///
/// Every variant is fatal for the CLI: it prints the error and exits non-zero.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read the snapshot input.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// The snapshot could not be decoded.
    #[error("Failed to load snapshot: {0}")]
    Snapshot(#[from] SnapshotError),

    /// The config file exists but is unusable.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The log file could not be set up.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Writing the projection to stdout failed.
    #[error("Output error: {0}")]
    Output(#[source] std::io::Error),
}

/// Errors encountered when reading snapshot input from files or stdin.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use convo_timeline::model::error::InputError;
///
/// let err = InputError::FileNotFound {
///     path: PathBuf::from("/tmp/missing.json"),
/// };
/// assert!(err.to_string().contains("/tmp/missing.json"));
/// ```
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified snapshot file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was attempted.
        path: PathBuf,
    },

    /// No file argument and stdin is a terminal.
    #[error("No input: provide a snapshot file or pipe JSON to stdin")]
    NoInput,

    /// Any other I/O failure while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Snapshot JSON that could not be decoded into messages, turns and session flags.
#[derive(Debug, Error)]
#[error("invalid snapshot JSON at line {line}, column {column}: {reason}")]
pub struct SnapshotError {
    /// 1-based line of the failure.
    pub line: usize,
    /// 1-based column of the failure.
    pub column: usize,
    /// Decoder message.
    pub reason: String,
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            line: err.line(),
            column: err.column(),
            reason: err.to_string(),
        }
    }
}
