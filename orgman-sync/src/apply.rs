//! Reconciler: push every team file's declared state onto the provider.
//!
//! Per team, in order:
//! 1. PATCH name/description/privacy by slug.
//! 2. On 404 (or no slug in the file), create the team and record the new slug.
//! 3. PUT every declared repository permission.
//! 4. PUT every declared member with role `member`.
//! 5. PUT every declared maintainer with role `maintainer`.
//!
//! Additive only: nothing is ever revoked. Repositories, members or
//! maintainers missing from a file are left alone remotely.

use std::path::{Path, PathBuf};

use orgman_core::{store, Layout, TeamRecord, TeamRole, TeamSlug};
use orgman_provider::{ApiOutcome, GitHubApi, Transport};

use crate::error::{io_err, SyncError};

/// What happened to one team file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamApplyResult {
    pub file: PathBuf,
    pub name: String,
    /// Slug the upserts targeted; `None` if the team could not be created.
    pub slug: Option<TeamSlug>,
    pub created: bool,
    pub repositories: usize,
    pub members: usize,
    pub maintainers: usize,
    /// Calls that came back with anything but success.
    pub failures: usize,
}

/// Apply every team file under `layout.teams_dir`, in file-name order.
pub fn apply_teams<T: Transport>(api: &GitHubApi<T>, layout: &Layout) -> Result<Vec<TeamApplyResult>, SyncError> {
    let files = store::list_team_files(layout)?;
    tracing::info!(teams = files.len(), dir = %layout.teams_dir.display(), "applying team files");

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        results.push(apply_team_file(api, &file)?);
    }
    Ok(results)
}

/// Apply a single team file.
pub fn apply_team_file<T: Transport>(api: &GitHubApi<T>, file: &Path) -> Result<TeamApplyResult, SyncError> {
    let team = store::load_team(file)?.normalized();
    let settings = team.settings();

    let mut result = TeamApplyResult {
        file: file.to_path_buf(),
        name: team.name.clone(),
        slug: None,
        created: false,
        repositories: 0,
        members: 0,
        maintainers: 0,
        failures: 0,
    };

    let existing = match &team.slug {
        Some(slug) => match api.update_team(slug, &settings) {
            ApiOutcome::NotFound => None,
            outcome => {
                if !outcome.is_success() {
                    result.failures += 1;
                }
                Some(slug.clone())
            }
        },
        None => None,
    };

    let slug = match existing {
        Some(slug) => slug,
        None => {
            tracing::info!(team = %team.name, "team not found remotely; creating it");
            let Some(created) = api.create_team(&settings) else {
                tracing::warn!(team = %team.name, file = %file.display(), "team could not be created; skipping");
                result.failures += 1;
                return Ok(result);
            };
            result.created = true;
            if team.slug.as_ref() != Some(&created.slug) {
                result.file = record_slug(file, &team, &created.slug)?;
            }
            created.slug
        }
    };

    for repo in &team.repositories {
        let outcome = api.set_repository_permission(&slug, &repo.full_name, repo.permission);
        tally(&mut result.repositories, &mut result.failures, &outcome);
    }
    for member in &team.members {
        let outcome = api.set_membership(&slug, member, TeamRole::Member);
        tally(&mut result.members, &mut result.failures, &outcome);
    }
    for maintainer in &team.maintainers {
        let outcome = api.set_membership(&slug, maintainer, TeamRole::Maintainer);
        tally(&mut result.maintainers, &mut result.failures, &outcome);
    }

    result.slug = Some(slug);
    tracing::info!(
        team = %team.name,
        created = result.created,
        failures = result.failures,
        "team applied"
    );
    Ok(result)
}

fn tally(applied: &mut usize, failures: &mut usize, outcome: &ApiOutcome) {
    if outcome.is_success() {
        *applied += 1;
    } else {
        *failures += 1;
    }
}

/// Write the provider-assigned slug back into the team file and move the file
/// to `<slug>.yaml` so the next export lands on it. A file already sitting at
/// that name is left alone and the slug is written in place instead.
///
/// Returns the path the team file ends up at.
fn record_slug(file: &Path, team: &TeamRecord, slug: &TeamSlug) -> Result<PathBuf, SyncError> {
    let mut updated = store::load_team(file)?;
    updated.slug = Some(slug.clone());

    let renamed = file.with_file_name(format!("{slug}.yaml"));
    let target = if renamed == file {
        file.to_path_buf()
    } else if renamed.exists() {
        tracing::warn!(
            team = %team.name,
            file = %file.display(),
            taken = %renamed.display(),
            "team file for the new slug already exists; keeping the old file name"
        );
        file.to_path_buf()
    } else {
        renamed
    };

    store::save_team(&target, &updated)?;
    if target != file {
        std::fs::remove_file(file).map_err(|e| io_err(file, e))?;
    }
    tracing::info!(team = %team.name, slug = %slug, file = %target.display(), "recorded new team slug");
    Ok(target)
}
