mod config;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::StintConfig;
use stint_api::{domain::NewManualEntry, TaskScope, TrackerClient, TrackerUrl};
use stint_engine::{EngineConfig, ScopedTracker, TimerEngine};

#[derive(Parser)]
#[command(name = "stint", about = "Track time on platform tasks from the terminal")]
struct Opts {
    /// Workspace slug (falls back to config)
    #[arg(long, global = true)]
    workspace: Option<String>,
    /// Project id (falls back to config)
    #[arg(long, global = true)]
    project: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save the platform session cookie used to authenticate
    Login {
        session_id: String,
    },
    /// Print one task's time summary and entries
    Status {
        issue: String,
    },
    /// Follow one task's timer, reprinting as it changes
    Watch {
        issue: String,
    },
    /// Start the timer on a task
    Start {
        issue: String,
    },
    /// Stop the running timer on a task
    Stop {
        issue: String,
    },
    /// Add a closed entry with a fixed duration
    Add {
        issue: String,
        hours: u32,
        minutes: u32,
        /// Free-text description
        #[arg(long)]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::from_filename(".env.local").ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let cfg = StintConfig::load()?;

    if let Command::Login { session_id } = &opts.command {
        StintConfig::save_session(session_id)?;
        println!("Session saved");
        return Ok(());
    }

    let workspace = opts
        .workspace
        .or_else(|| cfg.workspace.clone())
        .context("No workspace (pass --workspace or set it in config.toml)")?;
    let project = opts
        .project
        .or_else(|| cfg.project.clone())
        .context("No project (pass --project or set it in config.toml)")?;
    let session = StintConfig::load_session()?
        .context("Not logged in. Run `stint login <session-id>` first.")?;
    let client = TrackerClient::new(TrackerUrl::new(&cfg.api_url), &session)?;

    match opts.command {
        Command::Login { .. } => unreachable!("handled above"),
        Command::Status { issue } => {
            let scope = TaskScope::new(workspace, project, issue);
            let summary = client.fetch_summary(&scope).await?;
            let entries = client.fetch_entries(&scope).await?;

            let marker = if summary.is_timer_running {
                "  (running)"
            } else {
                ""
            };
            println!("{}{}", summary.formatted_total, marker);
            println!("{} entries", summary.entry_count);
            for entry in entries {
                println!(
                    "  {}  {}{}{}",
                    entry.formatted_duration,
                    entry.user_name,
                    entry
                        .description
                        .as_deref()
                        .map(|d| format!("  - {}", d))
                        .unwrap_or_default(),
                    if entry.is_running { "  *" } else { "" },
                );
            }
        }
        Command::Watch { issue } => {
            let scope = TaskScope::new(workspace, project, issue);
            let provider = Arc::new(ScopedTracker::new(client, scope));
            let handle = TimerEngine::spawn(provider, EngineConfig::default());
            let mut updates = handle.subscribe();

            loop {
                tokio::select! {
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let snapshot = updates.borrow_and_update().clone();
                        let marker = if snapshot.is_running { " (running)" } else { "" };
                        print!(
                            "\r{}{}  [{} entries]   ",
                            snapshot.formatted_elapsed(),
                            marker,
                            snapshot.entry_count
                        );
                        std::io::stdout().flush()?;
                    }
                    _ = tokio::signal::ctrl_c() => {
                        handle.shutdown();
                        break;
                    }
                }
            }
            println!();
        }
        Command::Start { issue } => {
            let scope = TaskScope::new(workspace, project, issue);
            client.start_timer(&scope).await?;
            let summary = client.fetch_summary(&scope).await?;
            println!("Timer started ({})", summary.formatted_total);
        }
        Command::Stop { issue } => {
            let scope = TaskScope::new(workspace, project, issue);
            client.stop_timer(&scope).await?;
            let summary = client.fetch_summary(&scope).await?;
            println!("Timer stopped ({})", summary.formatted_total);
        }
        Command::Add {
            issue,
            hours,
            minutes,
            description,
        } => {
            let scope = TaskScope::new(workspace, project, issue);
            client
                .add_manual_entry(&scope, &NewManualEntry::new(hours, minutes, description))
                .await?;
            let summary = client.fetch_summary(&scope).await?;
            println!("Entry added ({})", summary.formatted_total);
        }
    }

    Ok(())
}
