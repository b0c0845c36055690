//! `orgman export` — write the organization's team state into the repository.

use anyhow::{Context, Result};
use clap::Args;

use orgman_sync::{export, ExportOptions, ExportReport, WriteResult};

/// Arguments for `orgman export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Show what would be written without touching any file.
    #[arg(long)]
    pub dry_run: bool,

    /// Delete team files whose team no longer exists.
    #[arg(long)]
    pub prune: bool,
}

impl ExportArgs {
    pub fn run(self) -> Result<()> {
        let (config, api) = super::connect()?;
        let options = ExportOptions {
            dry_run: self.dry_run,
            prune: self.prune,
        };
        let report = export(&api, &config.layout, options).context("export failed")?;
        print_report(&report, self.dry_run);
        Ok(())
    }
}

pub fn print_report(report: &ExportReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    println!(
        "{prefix}✓ exported {} teams, {} members without a team ({} changed, {} unchanged)",
        report.teams,
        report.no_team_members,
        report.changed(),
        report.writes.len() - report.changed(),
    );

    for w in &report.writes {
        match w {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
            WriteResult::Unchanged { path } => println!("  ·  {}", path.display()),
            WriteResult::Removed { path } => println!("  ✗  {}", path.display()),
            WriteResult::WouldRemove { path } => println!("  -  {}", path.display()),
        }
    }
}
