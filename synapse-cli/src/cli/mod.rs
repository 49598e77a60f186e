//! Command-line interface

pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use commands::graph::{BatchCommands, BuildCommands, FetchCommands};

#[derive(Debug, Parser)]
#[command(name = "synapse-cli", version, about = "Build and validate Synapse project entity graphs")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file (defaults to ~/.config/synapse-cli/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the entity graph from an exported snapshot file
    Build(BuildCommands),
    /// Query a project from the repository and build its entity graph
    Fetch(FetchCommands),
    /// Build several snapshots concurrently and report on each
    Batch(BatchCommands),
}

impl Cli {
    /// Log level implied by the `-v` count
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// Dispatch a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load_with_override(cli.config.as_deref())?;

    match cli.command {
        Commands::Build(args) => commands::graph::handle_build_command(args, &config).await,
        Commands::Fetch(args) => commands::graph::handle_fetch_command(args, &config).await,
        Commands::Batch(args) => commands::graph::handle_batch_command(args, &config).await,
    }
}
