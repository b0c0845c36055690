//! Unified diff between live provider state and the snapshot on disk.

use std::path::{Path, PathBuf};

use similar::TextDiff;

use orgman_core::Layout;
use orgman_provider::{GitHubApi, Transport};

use crate::error::SyncError;
use crate::snapshot::{fetch_snapshot, render_snapshot, stale_team_files, Snapshot};
use crate::writer::{normalize_line_endings, read_existing};

/// A single file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Fetch provider state and compare what export would write with the files on disk.
///
/// No files are written.
pub fn diff<T: Transport>(api: &GitHubApi<T>, layout: &Layout, prune: bool) -> Result<Vec<FileDiff>, SyncError> {
    diff_snapshot(&fetch_snapshot(api), layout, prune)
}

/// Diff an already fetched snapshot. With `prune`, stale team files show up as deletions.
pub fn diff_snapshot(snapshot: &Snapshot, layout: &Layout, prune: bool) -> Result<Vec<FileDiff>, SyncError> {
    let rendered = render_snapshot(snapshot, layout)?;

    let mut diffs = Vec::new();
    for file in &rendered {
        let target = normalize_line_endings(&file.content);
        let existing = read_existing(&file.path)?.unwrap_or_default();
        if existing == target {
            continue;
        }
        diffs.push(unified(&file.path, layout, &existing, &target));
    }

    if prune {
        for stale in stale_team_files(snapshot, &rendered, layout)? {
            let existing = read_existing(&stale)?.unwrap_or_default();
            diffs.push(unified(&stale, layout, &existing, ""));
        }
    }

    Ok(diffs)
}

fn unified(path: &Path, layout: &Layout, old: &str, new: &str) -> FileDiff {
    let relative = path.strip_prefix(&layout.repo_dir).unwrap_or(path);
    let old_header = format!("a/{}", relative.display());
    let new_header = format!("b/{}", relative.display());
    let unified_diff = TextDiff::from_lines(old, new)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();
    FileDiff {
        path: path.to_path_buf(),
        unified_diff,
    }
}
