//! `orgman publish` — commit the working tree, push, and open or update the PR.

use anyhow::{Context, Result};
use clap::Args;

use orgman_core::Config;
use orgman_sync::{publish, GitCli, PublishOutcome, PublishSettings};

/// Arguments for `orgman publish`.
#[derive(Args, Debug)]
pub struct PublishArgs {}

impl PublishArgs {
    pub fn run(self) -> Result<()> {
        let (config, api) = super::connect()?;
        let settings = PublishSettings {
            repository: config.require_repository()?.to_string(),
            branch: config.branch.clone(),
            base_branch: config.base_branch.clone(),
        };
        let vcs = GitCli::new(config.repo_dir());

        let outcome = publish(&api, &vcs, &settings).context("publish failed")?;
        report_outcome(&outcome, &config)
    }
}

pub fn report_outcome(outcome: &PublishOutcome, config: &Config) -> Result<()> {
    match outcome {
        PublishOutcome::NothingToCommit => println!("Nothing to commit; no drift."),
        PublishOutcome::PushFailed => println!("Push did not succeed; no pull request opened."),
        PublishOutcome::PullRequestOpened { url } => println!("✓ opened {url}"),
        PublishOutcome::PullRequestUpdated { url } => println!("✓ updated {url}"),
        PublishOutcome::PullRequestFailed => {
            println!("Changes pushed, but the pull request could not be opened or updated.")
        }
    }
    if let Some(url) = outcome.pull_request_url() {
        super::emit_output(
            config.output_file.as_deref(),
            "pr-created",
            url,
            &mut std::io::stdout(),
        )?;
    }
    Ok(())
}
