//! orgman — keep a GitHub organization's teams in sync with a repository.
//!
//! # Usage
//!
//! ```text
//! orgman [--env-file <path>] export [--dry-run] [--prune]
//! orgman [--env-file <path>] diff [--prune]
//! orgman [--env-file <path>] apply
//! orgman [--env-file <path>] publish
//! orgman [--env-file <path>] sync [--apply] [--no-publish] [--prune]
//! ```
//!
//! Configuration comes from the environment (after loading `.env`). Logs go to
//! stderr; stdout carries command results and workflow outputs only.

mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{
    apply::ApplyArgs, diff::DiffArgs, export::ExportArgs, publish::PublishArgs, sync::SyncArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "orgman",
    version,
    about = "Export GitHub organization teams to YAML and apply them back",
    long_about = None,
)]
struct Cli {
    /// Load settings from this file instead of `./.env`.
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write team files, the no-team member list and CODEOWNERS from the organization.
    Export(ExportArgs),

    /// Show unified diffs of what export would change.
    Diff(DiffArgs),

    /// Push team files onto the organization (additive only).
    Apply(ApplyArgs),

    /// Commit, push and open or update the sync pull request.
    Publish(PublishArgs),

    /// Export, optionally apply, then publish.
    Sync(SyncArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = load_env_file(cli.env_file.as_deref())?;
    init_tracing();
    if let Some(path) = loaded {
        tracing::info!(path = %path.display(), "loaded env file");
    }

    match cli.command {
        Commands::Export(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::Apply(args) => args.run(),
        Commands::Publish(args) => args.run(),
        Commands::Sync(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Values from the file override the process environment. A missing `./.env`
/// is fine; a missing explicit `--env-file` is not.
fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            dotenvy::from_path_override(path)
                .with_context(|| format!("failed to load env file {}", path.display()))?;
            Ok(Some(path.to_path_buf()))
        }
        None => Ok(dotenvy::dotenv_override().ok()),
    }
}
