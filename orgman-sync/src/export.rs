//! Export: provider state → team files, no-team-members list, CODEOWNERS.

use orgman_core::{store, Layout};
use orgman_provider::{GitHubApi, Transport};

use crate::error::SyncError;
use crate::snapshot::{fetch_snapshot, no_team_members, render_snapshot, stale_team_files, Snapshot};
use crate::writer::{remove_file, write_file, WriteResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Report what would change without touching the filesystem.
    pub dry_run: bool,
    /// Delete team files whose team no longer exists remotely.
    pub prune: bool,
}

/// Outcome of one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub teams: usize,
    pub no_team_members: usize,
    pub writes: Vec<WriteResult>,
}

impl ExportReport {
    pub fn changed(&self) -> usize {
        self.writes.iter().filter(|w| w.is_change()).count()
    }
}

/// Fetch the current provider state and write it under `layout`.
pub fn export<T: Transport>(
    api: &GitHubApi<T>,
    layout: &Layout,
    options: ExportOptions,
) -> Result<ExportReport, SyncError> {
    let snapshot = fetch_snapshot(api);
    write_snapshot(&snapshot, layout, options)
}

/// Write an already fetched snapshot. Directories are created (one level) if absent.
pub fn write_snapshot(
    snapshot: &Snapshot,
    layout: &Layout,
    options: ExportOptions,
) -> Result<ExportReport, SyncError> {
    let rendered = render_snapshot(snapshot, layout)?;

    if !options.dry_run {
        store::ensure_dir(&layout.teams_dir)?;
        store::ensure_dir(&layout.codeowners_dir)?;
    }

    let mut writes = Vec::with_capacity(rendered.len());
    for file in &rendered {
        writes.push(write_file(&file.path, &file.content, options.dry_run)?);
    }

    if options.prune {
        for stale in stale_team_files(snapshot, &rendered, layout)? {
            writes.push(remove_file(&stale, options.dry_run)?);
        }
    }

    let report = ExportReport {
        teams: snapshot.teams.len(),
        no_team_members: no_team_members(&snapshot.org_members, &snapshot.teams).len(),
        writes,
    };
    tracing::info!(
        teams = report.teams,
        no_team_members = report.no_team_members,
        changed = report.changed(),
        "export finished"
    );
    Ok(report)
}
