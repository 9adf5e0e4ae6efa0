//! Conversation Timeline - Entry Point

use clap::{Parser, ValueEnum};
use convo_timeline::config::{self, CliOverrides, ResolvedConfig};
use convo_timeline::engine::TimelineEngine;
use convo_timeline::listing;
use convo_timeline::model::error::AppError;
use convo_timeline::model::ViewMode;
use convo_timeline::state::{SourceState, TimelineAction, UiState};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Output format of the projected rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    Text,
    /// Pretty-printed JSON (rows, diff, dirty ids)
    Json,
}

/// Conversation Timeline - project a conversation snapshot into display rows
#[derive(Parser, Debug)]
#[command(name = "convo-timeline")]
#[command(version)]
#[command(about = "Project a conversation snapshot into stable, diffable display rows")]
pub struct Args {
    /// Path to JSON snapshot (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// View mode (verbose or focused)
    #[arg(long)]
    pub view_mode: Option<ViewMode>,

    /// Viewport width in layout units
    #[arg(short, long)]
    pub width: Option<f64>,

    /// Width of one viewport bucket
    #[arg(long)]
    pub bucket_size: Option<f64>,

    /// Expand a work group (e.g. `turn-1#0`); repeatable
    #[arg(long = "expand-rollup", value_name = "GROUP")]
    pub expand_rollups: Vec<String>,

    /// Expand a tool card by message id; repeatable
    #[arg(long = "expand-tool", value_name = "MESSAGE_ID")]
    pub expand_tools: Vec<String>,

    /// Whether the view follows new content
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub pinned: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("convo-timeline: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = config::load_config_with_precedence(args.config.clone())?;
        let merged = config::merge_config(config_file);
        let with_env = config::apply_env_overrides(merged);
        config::apply_cli_overrides(
            with_env,
            CliOverrides {
                view_mode: args.view_mode,
                width_bucket_size: args.bucket_size,
            },
        )
    };

    let _guard = convo_timeline::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let input = convo_timeline::source::detect_input(args.file.clone())?;
    let mut snapshot = convo_timeline::source::load_snapshot(&input, config.view_mode)?;
    apply_view_mode(&config, &mut snapshot);

    info!(
        messages = snapshot.messages.len(),
        turns = snapshot.turns.len(),
        view_mode = snapshot.session.view_mode.as_str(),
        "Snapshot loaded"
    );

    let mut engine = TimelineEngine::with_state(config.policy, snapshot, UiState::default());
    for action in ui_actions(&args) {
        engine.dispatch(action);
    }

    let projection = engine.projection();
    let output = match args.format {
        OutputFormat::Text => listing::format_rows(projection.rows()),
        OutputFormat::Json => {
            let mut json = listing::to_json(projection)
                .map_err(|e| AppError::Output(std::io::Error::other(e)))?;
            json.push('\n');
            json
        }
    };

    std::io::stdout()
        .lock()
        .write_all(output.as_bytes())
        .map_err(AppError::Output)?;

    info!(rows = projection.rows().len(), "Projection written");
    Ok(())
}

/// An env var or `--view-mode` beats the snapshot's declared mode; a config
/// file value was already applied as the fallback while loading.
fn apply_view_mode(config: &ResolvedConfig, snapshot: &mut SourceState) {
    if config.view_mode_explicit {
        snapshot.session.view_mode = config.view_mode;
    }
}

/// UI actions implied by the command-line flags, in application order.
fn ui_actions(args: &Args) -> Vec<TimelineAction> {
    let mut actions = Vec::new();
    if let Some(width) = args.width {
        actions.push(TimelineAction::WidthChanged(width));
    }
    actions.extend(args.expand_rollups.iter().cloned().map(TimelineAction::ToggleRollup));
    actions.extend(args.expand_tools.iter().cloned().map(TimelineAction::ToggleToolCard));
    actions.push(TimelineAction::SetPinnedToBottom(args.pinned));
    actions
}
