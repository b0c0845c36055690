//! Full sync entrypoint: export, then optionally apply, then optionally publish.

use orgman_core::Config;
use orgman_provider::{GitHubApi, Transport};

use crate::apply::{apply_teams, TeamApplyResult};
use crate::export::{export, ExportOptions, ExportReport};
use crate::publish::{publish, PublishOutcome, PublishSettings, Vcs};
use crate::SyncError;

/// Which stages a sync runs beyond the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Push the files back onto the provider after exporting. Opt-in.
    pub apply: bool,
    /// Switch to the sync branch first, then commit, push and open a pull request.
    pub publish: bool,
    pub prune: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            apply: false,
            publish: true,
            prune: false,
        }
    }
}

#[derive(Debug)]
pub struct SyncReport {
    pub export: ExportReport,
    pub applied: Option<Vec<TeamApplyResult>>,
    pub published: Option<PublishOutcome>,
}

/// Run one sync.
pub fn run<T: Transport, V: Vcs>(
    api: &GitHubApi<T>,
    vcs: &V,
    config: &Config,
    options: SyncOptions,
) -> Result<SyncReport, SyncError> {
    let publish_settings = if options.publish {
        Some(PublishSettings {
            repository: config.require_repository()?.to_string(),
            branch: config.branch.clone(),
            base_branch: config.base_branch.clone(),
        })
    } else {
        None
    };

    if publish_settings.is_some() && !vcs.switch_branch(&config.branch)? {
        tracing::warn!(branch = %config.branch, "could not switch to sync branch; continuing on the current branch");
    }

    let export = export(
        api,
        &config.layout,
        ExportOptions {
            dry_run: false,
            prune: options.prune,
        },
    )?;

    let applied = if options.apply {
        Some(apply_teams(api, &config.layout)?)
    } else {
        None
    };

    let published = match &publish_settings {
        Some(settings) => Some(publish(api, vcs, settings)?),
        None => None,
    };

    Ok(SyncReport {
        export,
        applied,
        published,
    })
}
