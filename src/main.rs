//! # Jira Sync CLI (`jira-sync`)
//!
//! Drives a [`JiraConnector`] from the command line and writes each emitted
//! batch to stdout as one JSON array per line. Logs go to stderr.
//!
//! ## Usage
//!
//! ```bash
//! jira-sync --config ./config/jira.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `jira-sync load` | Full snapshot of every issue in scope |
//! | `jira-sync poll --start <epoch> --end <epoch>` | Issues updated within the window |
//! | `jira-sync slim` | Document ids only |
//! | `jira-sync validate` | Check credentials and project access |
//!
//! ## Environment
//!
//! - `JIRA_API_TOKEN` — API token (Cloud) or personal access token (Server)
//! - `JIRA_USER_EMAIL` — account email; selects basic auth when set
//! - `JIRA_API_VERSION` — REST API version when the config does not set one
//! - `RUST_LOG` — log filter (default `info`)

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jira_connector::client::{CREDENTIAL_API_TOKEN, CREDENTIAL_USER_EMAIL};
use jira_connector::config::load_config;
use jira_connector::{
    JiraConnector, LoadConnector, PollConnector, SlimConnector, ValidatingConnector,
};

/// Jira Sync — incremental Jira issue extraction for indexing pipelines.
#[derive(Parser)]
#[command(
    name = "jira-sync",
    about = "Jira Sync — extract Jira issues as normalized documents",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/jira.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit every issue in scope.
    Load {
        /// Stop after this many batches.
        #[arg(long)]
        limit_batches: Option<usize>,
    },

    /// Emit issues updated within a time window (epoch seconds, inclusive).
    Poll {
        #[arg(long)]
        start: i64,
        #[arg(long)]
        end: i64,
        /// Stop after this many batches.
        #[arg(long)]
        limit_batches: Option<usize>,
    },

    /// Emit document ids only.
    Slim {
        #[arg(long)]
        start: Option<i64>,
        #[arg(long)]
        end: Option<i64>,
        /// Stop after this many batches.
        #[arg(long)]
        limit_batches: Option<usize>,
    },

    /// Validate credentials and project settings against Jira.
    Validate,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let mut connector = JiraConnector::new(config.jira.to_settings());
    connector
        .load_credentials(&credentials_from_env())
        .context("Failed to load Jira credentials; set JIRA_API_TOKEN (and JIRA_USER_EMAIL for Jira Cloud)")?;

    match cli.command {
        Commands::Load { limit_batches } => {
            emit(connector.load_from_state()?, limit_batches)?;
        }
        Commands::Poll {
            start,
            end,
            limit_batches,
        } => {
            emit(connector.poll_source(start, end)?, limit_batches)?;
        }
        Commands::Slim {
            start,
            end,
            limit_batches,
        } => {
            emit(
                connector.retrieve_all_slim_documents(start, end)?,
                limit_batches,
            )?;
        }
        Commands::Validate => {
            connector.validate_connector_settings()?;
            println!("ok");
        }
    }

    Ok(())
}

fn credentials_from_env() -> HashMap<String, String> {
    let mut credentials = HashMap::new();
    if let Ok(token) = std::env::var("JIRA_API_TOKEN") {
        credentials.insert(CREDENTIAL_API_TOKEN.to_string(), token);
    }
    if let Ok(email) = std::env::var("JIRA_USER_EMAIL") {
        credentials.insert(CREDENTIAL_USER_EMAIL.to_string(), email);
    }
    credentials
}

/// Write each batch as one JSON line, stopping after `limit` batches.
fn emit<T: Serialize>(
    batches: impl Iterator<Item = jira_connector::Result<Vec<T>>>,
    limit: Option<usize>,
) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut batch_count = 0usize;
    let mut item_count = 0usize;

    for batch in batches.take(limit.unwrap_or(usize::MAX)) {
        let batch = batch?;
        item_count += batch.len();
        serde_json::to_writer(&mut out, &batch)?;
        writeln!(out)?;
        batch_count += 1;
    }
    out.flush()?;

    info!(batches = batch_count, items = item_count, "sync complete");
    Ok(())
}
