//! Graph command handlers

use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::Path;
use std::time::Instant;

use super::{BatchCommands, BuildCommands, FetchCommands, OutputFormat, render};
use crate::api::SynapseClient;
use crate::config::Config;
use crate::graph::DuplicatePolicy;
use crate::snapshot::ProjectSnapshot;

fn duplicate_policy(allow_duplicates: bool, fallback: DuplicatePolicy) -> DuplicatePolicy {
    if allow_duplicates {
        DuplicatePolicy::LastWriteWins
    } else {
        fallback
    }
}

/// Build a graph from a snapshot file and print it
pub async fn handle_build_command(args: BuildCommands, config: &Config) -> Result<()> {
    let policy = duplicate_policy(args.allow_duplicates, config.duplicate_policy);

    let snapshot = ProjectSnapshot::from_file(&args.records, args.known_parent_id, args.input)?;
    print_graph(&snapshot, policy, args.format, args.output.as_deref())
}

/// Fetch a project from the repository, build its graph and print it
pub async fn handle_fetch_command(args: FetchCommands, config: &Config) -> Result<()> {
    let policy = duplicate_policy(args.allow_duplicates, config.duplicate_policy);
    let client = SynapseClient::new(config)?;

    let start = Instant::now();
    let snapshot = client
        .fetch_snapshot(&args.project)
        .await
        .with_context(|| format!("Failed to fetch project {}", args.project))?;
    log::info!(
        "Fetched {} records for {} in {:.2}s",
        snapshot.records.len(),
        snapshot.label(),
        start.elapsed().as_secs_f64()
    );

    if let Some(path) = &args.save {
        save_snapshot(&snapshot, path)?;
        eprintln!("Snapshot saved to: {}", path.display().to_string().bright_green());
    }

    print_graph(&snapshot, policy, args.format, args.output.as_deref())
}

/// Build every snapshot concurrently; one failure does not stop the others
pub async fn handle_batch_command(args: BatchCommands, config: &Config) -> Result<()> {
    let policy = duplicate_policy(args.allow_duplicates, config.duplicate_policy);

    let tasks = args.snapshots.into_iter().map(|snapshot_arg| {
        tokio::task::spawn_blocking(move || {
            let outcome = ProjectSnapshot::from_file(&snapshot_arg.path, snapshot_arg.parent_id.as_str(), None)
                .and_then(|snapshot| {
                    let graph = snapshot
                        .build_graph(policy)
                        .with_context(|| format!("Rejected snapshot {}", snapshot_arg.path.display()))?;
                    Ok(render::summary_line(&graph))
                });
            (snapshot_arg, outcome)
        })
    });

    let mut failures = 0;
    for joined in futures::future::join_all(tasks).await {
        let (snapshot_arg, outcome) = joined.context("Build task panicked")?;
        match outcome {
            Ok(summary) => println!("{} {}: {}", "ok".green().bold(), snapshot_arg.path.display(), summary),
            Err(err) => {
                failures += 1;
                println!("{} {}: {:#}", "failed".red().bold(), snapshot_arg.path.display(), err);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} snapshot(s) failed to build", failures);
    }
    Ok(())
}

fn print_graph(
    snapshot: &ProjectSnapshot,
    policy: DuplicatePolicy,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    log::debug!(
        "Building {} ({} records, duplicates: {})",
        snapshot.label(),
        snapshot.records.len(),
        policy.label()
    );
    let graph = snapshot
        .build_graph(policy)
        .inspect_err(|err| log::debug!("Snapshot of {} rejected: {}", snapshot.label(), err.kind().label()))
        .with_context(|| format!("Rejected snapshot of {}", snapshot.label()))?;

    let formatted_output = render::format_output(&graph, format, snapshot.label())?;

    if let Some(output_path) = output {
        fs::write(output_path, &formatted_output)
            .with_context(|| format!("Failed to write output to: {}", output_path.display()))?;
        eprintln!(
            "Graph saved to: {}",
            output_path.display().to_string().bright_green()
        );
    } else {
        print!("{}", formatted_output);
    }

    Ok(())
}

fn save_snapshot(snapshot: &ProjectSnapshot, path: &Path) -> Result<()> {
    let body = serde_json::json!({
        "totalNumberOfResults": snapshot.records.len(),
        "results": snapshot.records,
    });
    let content = serde_json::to_string_pretty(&body).context("Failed to serialize snapshot")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write snapshot to: {}", path.display()))
}
