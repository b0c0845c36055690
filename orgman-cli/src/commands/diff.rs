//! `orgman diff` — show unified diffs for what export would write.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use orgman_sync::diff;

/// Arguments for `orgman diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Also show stale team files as deletions.
    #[arg(long)]
    pub prune: bool,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let (config, api) = super::connect()?;

        let diffs = diff(&api, &config.layout, self.prune).context("diff failed")?;
        if diffs.is_empty() {
            println!("No differences for '{}'.", config.org);
            return Ok(());
        }

        for diff in diffs {
            for line in diff.unified_diff.lines() {
                println!("{}", paint(line));
            }
        }
        Ok(())
    }
}

fn paint(line: &str) -> String {
    if line.starts_with("+++") || line.starts_with("---") {
        line.bold().to_string()
    } else if line.starts_with("@@") {
        line.cyan().to_string()
    } else if line.starts_with('+') {
        line.green().to_string()
    } else if line.starts_with('-') {
        line.red().to_string()
    } else {
        line.to_string()
    }
}
