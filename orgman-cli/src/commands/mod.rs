pub mod apply;
pub mod diff;
pub mod export;
pub mod publish;
pub mod sync;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use orgman_core::Config;
use orgman_provider::{GitHubApi, UreqTransport};

/// Read configuration and build the live API client.
pub fn connect() -> Result<(Config, GitHubApi<UreqTransport>)> {
    let config = Config::from_env().context("invalid configuration")?;
    tracing::debug!(config = ?config, "configuration loaded");
    let api = GitHubApi::from_config(&config).context("failed to build the GitHub client")?;
    Ok((config, api))
}

/// Publish a workflow output: appended to the workflow output file when one is
/// configured, otherwise written to `out` in the legacy `::set-output` form.
pub fn emit_output(
    output_file: Option<&Path>,
    name: &str,
    value: &str,
    out: &mut impl Write,
) -> Result<()> {
    match output_file {
        Some(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open GITHUB_OUTPUT file {}", path.display()))?;
            writeln!(file, "{name}={value}").context("failed to write workflow output")?;
        }
        None => writeln!(out, "::set-output name={name}::{value}")
            .context("failed to write workflow output")?,
    }
    Ok(())
}
