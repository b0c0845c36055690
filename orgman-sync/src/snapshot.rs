//! Snapshot rendering: team records → team files, the no-team-members list
//! and CODEOWNERS.
//!
//! Rendering is pure; [`crate::export`] and [`crate::diff`] decide what to do
//! with the rendered files.

use std::collections::HashSet;
use std::path::PathBuf;

use orgman_core::{store, Layout, Login, TeamRecord};
use orgman_provider::{build_teams, GitHubApi, Transport};

use crate::error::SyncError;

const CODEOWNERS_HEADER: &str = "\
##############################################################
# CODEOWNERS file use for automated pull_request assignments #
##############################################################

";

/// Provider state captured for one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Every organization member, in fetch order.
    pub org_members: Vec<Login>,
    /// Every team, in fetch order.
    pub teams: Vec<TeamRecord>,
    /// Whether the team list itself was fetched. When it was not, `teams` is
    /// empty because of the failure, not because the organization has none.
    pub teams_complete: bool,
}

/// A file's full target content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub content: String,
}

/// Fetch organization members, then every team with its members and repositories.
pub fn fetch_snapshot<T: Transport>(api: &GitHubApi<T>) -> Snapshot {
    let org_members = api.org_members();
    tracing::info!(org = api.org(), members = org_members.len(), "fetched organization members");
    let remote = api.try_teams();
    let teams_complete = remote.is_some();
    if !teams_complete {
        tracing::warn!(org = api.org(), "team list unavailable; snapshot has no teams");
    }
    let teams = build_teams(api, Some(remote.unwrap_or_default()));
    Snapshot {
        org_members,
        teams,
        teams_complete,
    }
}

/// Organization members that appear in no team as member or maintainer.
/// Order follows `org_members`.
pub fn no_team_members(org_members: &[Login], teams: &[TeamRecord]) -> Vec<Login> {
    let in_team: HashSet<&Login> = teams.iter().flat_map(TeamRecord::logins).collect();
    org_members
        .iter()
        .filter(|login| !in_team.contains(login))
        .cloned()
        .collect()
}

/// The complete CODEOWNERS file: a header, then one block per team mapping its
/// team file to its maintainers.
pub fn render_codeowners(teams: &[TeamRecord], layout: &Layout) -> String {
    let teams_dir = layout.repo_relative_teams_dir();
    let mut out = String::from(CODEOWNERS_HEADER);
    for team in teams {
        let Some(slug) = &team.slug else { continue };
        out.push_str(&format!(
            "# These CODEOWNERS are the maintainer of team '{slug}' and must review each pull_request for team changes\n"
        ));
        let mut line = format!("{}/{}.yaml", teams_dir.trim_end_matches('/'), slug);
        for maintainer in &team.maintainers {
            line.push_str(" @");
            line.push_str(&maintainer.0);
        }
        out.push_str(&line);
        out.push_str("\n\n");
    }
    out
}

/// Every file an export produces: one per team, CODEOWNERS, then the no-team-members list.
pub fn render_snapshot(snapshot: &Snapshot, layout: &Layout) -> Result<Vec<RenderedFile>, SyncError> {
    let mut files = Vec::with_capacity(snapshot.teams.len() + 2);

    for team in &snapshot.teams {
        let Some(slug) = &team.slug else {
            tracing::warn!(team = %team.name, "team without slug left out of snapshot");
            continue;
        };
        files.push(RenderedFile {
            path: layout.team_path(slug),
            content: store::encode_team(team)?,
        });
    }

    files.push(RenderedFile {
        path: layout.codeowners_path(),
        content: render_codeowners(&snapshot.teams, layout),
    });

    let unassigned = no_team_members(&snapshot.org_members, &snapshot.teams);
    files.push(RenderedFile {
        path: layout.no_team_members_path(),
        content: store::encode_logins(&unassigned)?,
    });

    Ok(files)
}

/// Team files on disk with no counterpart in `rendered`.
///
/// Empty when the snapshot's team list could not be fetched: without it every
/// file would look stale.
pub fn stale_team_files(
    snapshot: &Snapshot,
    rendered: &[RenderedFile],
    layout: &Layout,
) -> Result<Vec<PathBuf>, SyncError> {
    if !snapshot.teams_complete {
        tracing::warn!(dir = %layout.teams_dir.display(), "team list unavailable; not pruning team files");
        return Ok(Vec::new());
    }
    let current: HashSet<&PathBuf> = rendered.iter().map(|f| &f.path).collect();
    Ok(store::list_team_files(layout)?
        .into_iter()
        .filter(|path| !current.contains(path))
        .collect())
}
