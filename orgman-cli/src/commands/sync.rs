//! `orgman sync` — export, optionally apply, then publish.

use anyhow::{Context, Result};
use clap::Args;

use orgman_sync::pipeline::{self, SyncOptions};
use orgman_sync::GitCli;

/// Arguments for `orgman sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Also push the team files onto the organization after exporting.
    #[arg(long)]
    pub apply: bool,

    /// Skip branch preparation, commit, push and pull request.
    #[arg(long)]
    pub no_publish: bool,

    /// Delete team files whose team no longer exists.
    #[arg(long)]
    pub prune: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let (config, api) = super::connect()?;
        let vcs = GitCli::new(config.repo_dir());
        let options = SyncOptions {
            apply: self.apply,
            publish: !self.no_publish,
            prune: self.prune,
        };

        let report = pipeline::run(&api, &vcs, &config, options).context("sync failed")?;

        super::export::print_report(&report.export, false);
        if let Some(applied) = &report.applied {
            super::apply::print_summary(applied);
        }
        if let Some(outcome) = &report.published {
            super::publish::report_outcome(outcome, &config)?;
        }
        Ok(())
    }
}
