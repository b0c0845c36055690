//! Commit publisher: commit regenerated files, push the sync branch, and open
//! or update its pull request.
//!
//! Each step gates the next. A commit with nothing to commit or a rejected push
//! ends the run quietly: that is the normal "no drift" outcome.

use std::path::PathBuf;
use std::process::Command;

use orgman_provider::{GitHubApi, PullRequestDraft, Transport};

use crate::error::SyncError;

pub const COMMIT_USER_NAME: &str = "github-actions";
pub const COMMIT_USER_EMAIL: &str = "github-actions@github.com";
pub const COMMIT_MESSAGE: &str = "This commit was generated by GitHub Actions after calling sync2code";
pub const PR_TITLE: &str = "autogenerated PR created by sync2code";
pub const PR_BODY: &str =
    "This PR was autogenerated by sync2code and should contain all UI based changes made by the users.";
pub const PR_UPDATE_NOTE: &str = "\n\n * PR updated in the meantime by workflow run.";
pub const FALLBACK_BASE_BRANCH: &str = "main";

/// Narrow version-control surface. Each method reports whether the step succeeded;
/// `Err` is reserved for not being able to run the step at all.
pub trait Vcs {
    /// Check out `branch` (creating or resetting it) and pull it from the remote.
    fn switch_branch(&self, branch: &str) -> Result<bool, SyncError>;
    fn configure_identity(&self, name: &str, email: &str) -> Result<bool, SyncError>;
    fn stage_all(&self) -> Result<bool, SyncError>;
    /// `false` when there is nothing to commit.
    fn commit(&self, message: &str) -> Result<bool, SyncError>;
    fn push(&self, branch: &str) -> Result<bool, SyncError>;
}

/// [`Vcs`] backed by the `git` binary, run inside `repo_dir`.
pub struct GitCli {
    repo_dir: PathBuf,
}

impl GitCli {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    fn git(&self, args: &[&str]) -> Result<bool, SyncError> {
        let command = format!("git {}", args.join(" "));
        tracing::info!(dir = %self.repo_dir.display(), "{command}");
        let status = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .status()
            .map_err(|source| SyncError::Command {
                command: command.clone(),
                source,
            })?;
        if !status.success() {
            tracing::info!(code = ?status.code(), "`{command}` did not succeed");
        }
        Ok(status.success())
    }
}

impl Vcs for GitCli {
    fn switch_branch(&self, branch: &str) -> Result<bool, SyncError> {
        let switched = self.git(&["checkout", "-B", branch])?;
        // The branch may not exist on the remote yet.
        self.git(&["pull", "origin", branch])?;
        Ok(switched)
    }

    fn configure_identity(&self, name: &str, email: &str) -> Result<bool, SyncError> {
        Ok(self.git(&["config", "user.name", name])? && self.git(&["config", "user.email", email])?)
    }

    fn stage_all(&self) -> Result<bool, SyncError> {
        self.git(&["add", "."])
    }

    fn commit(&self, message: &str) -> Result<bool, SyncError> {
        self.git(&["commit", "-m", message])
    }

    fn push(&self, branch: &str) -> Result<bool, SyncError> {
        self.git(&["push", "origin", branch])
    }
}

/// Where to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSettings {
    /// `owner/name`.
    pub repository: String,
    /// Head branch the snapshot is committed to.
    pub branch: String,
    /// Pull-request base; the repository's default branch when `None`.
    pub base_branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// `git commit` found nothing to commit.
    NothingToCommit,
    /// The push was rejected or failed.
    PushFailed,
    PullRequestOpened { url: String },
    PullRequestUpdated { url: String },
    /// Changes were pushed but the pull request call failed.
    PullRequestFailed,
}

impl PublishOutcome {
    /// URL for the `pr-created` workflow output, if a pull request exists.
    pub fn pull_request_url(&self) -> Option<&str> {
        match self {
            PublishOutcome::PullRequestOpened { url } | PublishOutcome::PullRequestUpdated { url } => {
                Some(url.as_str())
            }
            _ => None,
        }
    }
}

/// Commit and push local changes, then open or update the pull request.
pub fn publish<T: Transport, V: Vcs>(
    api: &GitHubApi<T>,
    vcs: &V,
    settings: &PublishSettings,
) -> Result<PublishOutcome, SyncError> {
    tracing::info!("calling git to commit changes");
    vcs.configure_identity(COMMIT_USER_NAME, COMMIT_USER_EMAIL)?;
    vcs.stage_all()?;
    if !vcs.commit(COMMIT_MESSAGE)? {
        tracing::info!("nothing to commit; no drift");
        return Ok(PublishOutcome::NothingToCommit);
    }
    if !vcs.push(&settings.branch)? {
        tracing::info!(branch = %settings.branch, "push did not succeed; skipping pull request");
        return Ok(PublishOutcome::PushFailed);
    }
    tracing::info!("changes pushed to remote");

    let base = settings
        .base_branch
        .clone()
        .or_else(|| api.default_branch(&settings.repository))
        .unwrap_or_else(|| FALLBACK_BASE_BRANCH.to_string());

    let open = api.open_pulls(&settings.repository, &settings.branch);
    let outcome = match open.first() {
        Some(existing) => {
            let draft = PullRequestDraft {
                title: PR_TITLE.to_string(),
                head: settings.branch.clone(),
                base,
                body: format!("{}{}", existing.body.as_deref().unwrap_or_default(), PR_UPDATE_NOTE),
            };
            match api.update_pull(&settings.repository, existing.number, &draft) {
                Some(pull) => PublishOutcome::PullRequestUpdated { url: pull.html_url },
                None => PublishOutcome::PullRequestFailed,
            }
        }
        None => {
            let draft = PullRequestDraft {
                title: PR_TITLE.to_string(),
                head: settings.branch.clone(),
                base,
                body: PR_BODY.to_string(),
            };
            match api.create_pull(&settings.repository, &draft) {
                Some(pull) => PublishOutcome::PullRequestOpened { url: pull.html_url },
                None => PublishOutcome::PullRequestFailed,
            }
        }
    };
    tracing::info!(outcome = ?outcome, "publish finished");
    Ok(outcome)
}
