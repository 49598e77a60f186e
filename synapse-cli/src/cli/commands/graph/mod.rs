//! Graph commands: build, fetch, batch

mod handler;
mod render;

pub use handler::{handle_batch_command, handle_build_command, handle_fetch_command};
pub use render::format_output;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::loader::RecordFormat;

/// How a built graph is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Indented hierarchy
    #[default]
    Tree,
    /// Nodes and edges as pretty JSON
    Json,
    /// Counts only
    Summary,
}

#[derive(Debug, Args)]
pub struct BuildCommands {
    /// Snapshot file (JSON array, query response JSON, or CSV)
    pub records: PathBuf,

    /// Id of the container the project lives in
    #[arg(long, short = 'p')]
    pub known_parent_id: String,

    /// Snapshot format (detected from the extension by default)
    #[arg(long, value_enum)]
    pub input: Option<RecordFormat>,

    #[arg(long, short, value_enum, default_value_t = OutputFormat::Tree)]
    pub format: OutputFormat,

    /// Keep the later record when two share an id instead of failing
    #[arg(long)]
    pub allow_duplicates: bool,

    /// Write the output to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct FetchCommands {
    /// Project id (e.g. syn123) or project name
    pub project: String,

    #[arg(long, short, value_enum, default_value_t = OutputFormat::Tree)]
    pub format: OutputFormat,

    /// Keep the later record when two share an id instead of failing
    #[arg(long)]
    pub allow_duplicates: bool,

    /// Also save the fetched records as a JSON snapshot
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Write the output to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct BatchCommands {
    /// Snapshots as PATH=KNOWN_PARENT_ID
    #[arg(required = true, value_parser = parse_snapshot_arg)]
    pub snapshots: Vec<SnapshotArg>,

    /// Keep the later record when two share an id instead of failing
    #[arg(long)]
    pub allow_duplicates: bool,
}

/// One `PATH=KNOWN_PARENT_ID` argument of the batch command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotArg {
    pub path: PathBuf,
    pub parent_id: String,
}

fn parse_snapshot_arg(value: &str) -> Result<SnapshotArg, String> {
    match value.rsplit_once('=') {
        Some((path, parent_id)) if !path.is_empty() && !parent_id.is_empty() => Ok(SnapshotArg {
            path: PathBuf::from(path),
            parent_id: parent_id.to_string(),
        }),
        _ => Err(format!("expected PATH=KNOWN_PARENT_ID, got '{}'", value)),
    }
}
