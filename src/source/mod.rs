//! Snapshot input.
//!
//! A snapshot is one JSON document describing a conversation view:
//!
//! ```json
//! { "messages": [...], "turns": [...], "session": {...} }
//! ```
//!
//! Every top-level field is optional. The snapshot is read from a file or from
//! piped stdin and decoded at this boundary; the core only sees
//! [`SourceState`]. A snapshot that omits `session.view_mode` takes the
//! caller's fallback mode.

use crate::model::error::{AppError, InputError, SnapshotError};
use crate::model::ViewMode;
use crate::state::SourceState;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, IsTerminal, Read};
use std::path::{Path, PathBuf};

/// Where the snapshot comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotInput {
    /// A JSON file on disk.
    File(PathBuf),
    /// JSON piped to stdin.
    Stdin,
}

/// Pick the snapshot input.
///
/// # Logic:
/// 1. If a file path is provided: use it (it must exist)
/// 2. If stdin is piped: use stdin
/// 3. Else: `InputError::NoInput`
///
/// # Errors
///
/// Returns `InputError::FileNotFound` if the file does not exist.
/// Returns `InputError::NoInput` if no file is given and stdin is a terminal.
pub fn detect_input(file: Option<PathBuf>) -> Result<SnapshotInput, InputError> {
    match file {
        Some(path) if path.exists() => Ok(SnapshotInput::File(path)),
        Some(path) => Err(InputError::FileNotFound { path }),
        None if std::io::stdin().is_terminal() => Err(InputError::NoInput),
        None => Ok(SnapshotInput::Stdin),
    }
}

/// Read and decode the snapshot from `input`.
///
/// # Errors
///
/// Returns `AppError::Input` for I/O failures and `AppError::Snapshot` for
/// JSON that does not describe a timeline.
pub fn load_snapshot(
    input: &SnapshotInput,
    fallback_view_mode: ViewMode,
) -> Result<SourceState, AppError> {
    match input {
        SnapshotInput::File(path) => load_snapshot_file(path, fallback_view_mode),
        SnapshotInput::Stdin => read_snapshot(std::io::stdin().lock(), fallback_view_mode),
    }
}

/// Read and decode a snapshot file.
///
/// # Errors
///
/// See [`load_snapshot`].
pub fn load_snapshot_file(
    path: &Path,
    fallback_view_mode: ViewMode,
) -> Result<SourceState, AppError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => InputError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => InputError::Io(e),
    })?;
    read_snapshot(BufReader::new(file), fallback_view_mode)
}

/// Read a whole snapshot from `reader` and decode it.
///
/// # Errors
///
/// See [`load_snapshot`].
pub fn read_snapshot<R: Read>(
    mut reader: R,
    fallback_view_mode: ViewMode,
) -> Result<SourceState, AppError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(InputError::from)?;
    Ok(parse_snapshot_with(&text, fallback_view_mode)?)
}

/// Decode snapshot JSON, falling back to the default view mode.
///
/// # Errors
///
/// See [`parse_snapshot_with`].
pub fn parse_snapshot(text: &str) -> Result<SourceState, SnapshotError> {
    parse_snapshot_with(text, ViewMode::default())
}

/// Decode snapshot JSON. A snapshot without `session.view_mode` gets
/// `fallback_view_mode`; blank input decodes to an empty snapshot.
///
/// # Errors
///
/// Returns `SnapshotError` with the line and column of the first problem.
pub fn parse_snapshot_with(
    text: &str,
    fallback_view_mode: ViewMode,
) -> Result<SourceState, SnapshotError> {
    let mut source = if text.trim().is_empty() {
        SourceState::default()
    } else {
        serde_json::from_str(text)?
    };
    if !declares_view_mode(text)? {
        source.session.view_mode = fallback_view_mode;
    }
    Ok(source)
}

/// Only the presence of `session.view_mode` matters here.
#[derive(Deserialize)]
struct DeclaredFields {
    #[serde(default)]
    session: Option<DeclaredSession>,
}

#[derive(Deserialize)]
struct DeclaredSession {
    #[serde(default)]
    view_mode: Option<IgnoredAny>,
}

fn declares_view_mode(text: &str) -> Result<bool, SnapshotError> {
    if text.trim().is_empty() {
        return Ok(false);
    }
    let declared: DeclaredFields = serde_json::from_str(text)?;
    Ok(declared
        .session
        .is_some_and(|session| session.view_mode.is_some()))
}
