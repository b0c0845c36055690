#![allow(dead_code)]

use std::cell::RefCell;

use serde_json::{json, Value};

use orgman_core::{Config, Layout};
use orgman_provider::fake::FakeTransport;
use orgman_provider::{ApiResponse, GitHubApi, Method, ProviderClient};
use orgman_sync::{SyncError, Vcs};

pub const BASE: &str = "https://api.github.test";

pub fn api(fake: FakeTransport) -> GitHubApi<FakeTransport> {
    GitHubApi::new(ProviderClient::new(BASE, "t0ken", fake), "acme")
}

pub fn users(names: &[&str]) -> Value {
    Value::Array(names.iter().map(|n| json!({ "login": n })).collect())
}

/// Org with members [alice, bob, carol] and one team "core":
/// maintainer alice, member bob (the provider lists alice under both roles).
pub fn acme_org() -> FakeTransport {
    FakeTransport::new()
        .on(
            Method::Get,
            "/orgs/acme/members",
            ApiResponse::json(200, &users(&["alice", "bob", "carol"])),
        )
        .on(
            Method::Get,
            "/orgs/acme/teams",
            ApiResponse::json(
                200,
                &json!([{"name": "Core", "slug": "core", "description": "Core maintainers", "privacy": "closed"}]),
            ),
        )
        .on_query(
            Method::Get,
            "/orgs/acme/teams/core/members",
            &[("role", "maintainer")],
            ApiResponse::json(200, &users(&["alice"])),
        )
        .on_query(
            Method::Get,
            "/orgs/acme/teams/core/members",
            &[("role", "member")],
            ApiResponse::json(200, &users(&["alice", "bob"])),
        )
        .on(
            Method::Get,
            "/orgs/acme/teams/core/repos",
            ApiResponse::json(
                200,
                &json!([
                    {"full_name": "acme/api", "permissions": {"admin": true, "maintain": true, "push": true, "triage": true, "pull": true}},
                    {"full_name": "acme/docs", "permissions": {"admin": false, "maintain": false, "push": false, "triage": false, "pull": true}}
                ]),
            ),
        )
}

pub fn config(layout: Layout) -> Config {
    let repo_dir = layout.repo_dir.to_string_lossy().into_owned();
    let mut config = Config::from_vars([
        ("GITHUB_API_URL", BASE.to_string()),
        ("GITHUB_TOKEN", "t0ken".to_string()),
        ("GITHUB_ORG", "acme".to_string()),
        ("GITHUB_REPO_DIR", repo_dir),
        ("GITHUB_REPOSITORY", "acme/org-config".to_string()),
    ])
    .expect("config");
    config.layout = layout;
    config
}

/// In-memory [`Vcs`] with scripted commit/push results.
pub struct FakeVcs {
    pub commit_succeeds: bool,
    pub push_succeeds: bool,
    pub steps: RefCell<Vec<String>>,
}

impl FakeVcs {
    pub fn with_changes() -> Self {
        Self {
            commit_succeeds: true,
            push_succeeds: true,
            steps: RefCell::new(Vec::new()),
        }
    }

    pub fn clean() -> Self {
        Self {
            commit_succeeds: false,
            ..Self::with_changes()
        }
    }

    pub fn steps(&self) -> Vec<String> {
        self.steps.borrow().clone()
    }

    fn record(&self, step: String) {
        self.steps.borrow_mut().push(step);
    }
}

impl Vcs for FakeVcs {
    fn switch_branch(&self, branch: &str) -> Result<bool, SyncError> {
        self.record(format!("switch {branch}"));
        Ok(true)
    }

    fn configure_identity(&self, name: &str, email: &str) -> Result<bool, SyncError> {
        self.record(format!("identity {name} <{email}>"));
        Ok(true)
    }

    fn stage_all(&self) -> Result<bool, SyncError> {
        self.record("stage".to_string());
        Ok(true)
    }

    fn commit(&self, _message: &str) -> Result<bool, SyncError> {
        self.record("commit".to_string());
        Ok(self.commit_succeeds)
    }

    fn push(&self, branch: &str) -> Result<bool, SyncError> {
        self.record(format!("push {branch}"));
        Ok(self.push_succeeds)
    }
}
