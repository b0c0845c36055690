//! `orgman apply` — push team files onto the organization.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use orgman_sync::{apply_teams, TeamApplyResult};

/// Arguments for `orgman apply`.
#[derive(Args, Debug)]
pub struct ApplyArgs {}

impl ApplyArgs {
    pub fn run(self) -> Result<()> {
        let (config, api) = super::connect()?;
        let results = apply_teams(&api, &config.layout).context("apply failed")?;
        print_summary(&results);
        Ok(())
    }
}

#[derive(Tabled)]
struct ApplyTableRow {
    #[tabled(rename = "team")]
    team: String,
    #[tabled(rename = "slug")]
    slug: String,
    #[tabled(rename = "created")]
    created: String,
    #[tabled(rename = "repos")]
    repositories: usize,
    #[tabled(rename = "members")]
    members: usize,
    #[tabled(rename = "maintainers")]
    maintainers: usize,
    #[tabled(rename = "failures")]
    failures: usize,
}

pub fn print_summary(results: &[TeamApplyResult]) {
    if results.is_empty() {
        println!("No team files to apply.");
        return;
    }

    let rows: Vec<ApplyTableRow> = results
        .iter()
        .map(|r| ApplyTableRow {
            team: r.name.clone(),
            slug: r.slug.as_ref().map_or_else(|| "-".to_string(), |s| s.to_string()),
            created: if r.created { "yes" } else { "no" }.to_string(),
            repositories: r.repositories,
            members: r.members,
            maintainers: r.maintainers,
            failures: r.failures,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    let failures: usize = results.iter().map(|r| r.failures).sum();
    if failures > 0 {
        println!(
            "{}",
            format!("{failures} calls failed; see the log for details.").yellow()
        );
    }
}
