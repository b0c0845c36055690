//! Typed organization endpoints on top of [`ProviderClient`].
//!
//! List endpoints degrade to an empty list when the call fails; the failure
//! is logged and the caller carries on with what it has.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use orgman_core::{
    Config, Login, Permission, PermissionFlags, Privacy, TeamRole, TeamSettings, TeamSlug,
};

use crate::client::{ApiOutcome, ProviderClient};
use crate::error::ProviderError;
use crate::transport::{Method, Transport, UreqTransport};

const PER_PAGE: (&str, &str) = ("per_page", "100");

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteUser {
    pub login: Login,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteTeam {
    pub name: String,
    pub slug: TeamSlug,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub privacy: Option<Privacy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteRepository {
    pub full_name: String,
    #[serde(default)]
    pub permissions: PermissionFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemotePull {
    pub number: u64,
    pub html_url: String,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestDraft {
    pub title: String,
    pub head: String,
    pub base: String,
    pub body: String,
}

// ---------------------------------------------------------------------------
// GitHubApi
// ---------------------------------------------------------------------------

/// Endpoints scoped to one organization.
pub struct GitHubApi<T> {
    client: ProviderClient<T>,
    org: String,
}

impl GitHubApi<UreqTransport> {
    /// Build the live client from process configuration.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let transport = UreqTransport::new(&config.http)?;
        Ok(Self::new(
            ProviderClient::new(&config.api_url, &config.token, transport),
            &config.org,
        ))
    }
}

impl<T: Transport> GitHubApi<T> {
    pub fn new(client: ProviderClient<T>, org: impl Into<String>) -> Self {
        Self {
            client,
            org: org.into(),
        }
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn client(&self) -> &ProviderClient<T> {
        &self.client
    }

    // -- reads ---------------------------------------------------------------

    /// Every organization member, in provider order.
    pub fn org_members(&self) -> Vec<Login> {
        let path = format!("/orgs/{}/members", self.org);
        self.list::<RemoteUser>(&path, &[PER_PAGE])
            .into_iter()
            .map(|u| u.login)
            .collect()
    }

    /// Every team in the organization, in provider order.
    pub fn teams(&self) -> Vec<RemoteTeam> {
        self.try_teams().unwrap_or_default()
    }

    /// Like [`teams`](Self::teams), but `None` when the list could not be fetched,
    /// so an empty organization can be told apart from a failed call.
    pub fn try_teams(&self) -> Option<Vec<RemoteTeam>> {
        let path = format!("/orgs/{}/teams", self.org);
        self.try_list(&path, &[PER_PAGE])
    }

    /// Logins holding `role` in the team.
    pub fn team_members(&self, slug: &TeamSlug, role: TeamRole) -> Vec<Login> {
        let path = format!("/orgs/{}/teams/{}/members", self.org, slug);
        self.list::<RemoteUser>(&path, &[PER_PAGE, ("role", role.as_str())])
            .into_iter()
            .map(|u| u.login)
            .collect()
    }

    /// Repositories the team can access, with the provider's permission flags.
    pub fn team_repositories(&self, slug: &TeamSlug) -> Vec<RemoteRepository> {
        let path = format!("/orgs/{}/teams/{}/repos", self.org, slug);
        self.list(&path, &[PER_PAGE])
    }

    /// Open pull requests whose head is `owner:branch`.
    pub fn open_pulls(&self, repository: &str, branch: &str) -> Vec<RemotePull> {
        let owner = repository.split('/').next().unwrap_or(repository);
        let head = format!("{owner}:{branch}");
        let path = format!("/repos/{repository}/pulls");
        self.list(&path, &[("state", "open"), ("head", head.as_str())])
    }

    /// The repository's default branch, if the provider reports one.
    pub fn default_branch(&self, repository: &str) -> Option<String> {
        let path = format!("/repos/{repository}");
        self.client
            .call(Method::Get, &path, &[], None)
            .into_json()
            .and_then(|v| v.get("default_branch")?.as_str().map(str::to_string))
    }

    // -- writes --------------------------------------------------------------

    /// PATCH the team's name/description/privacy. `NotFound` means the team does not exist.
    pub fn update_team(&self, slug: &TeamSlug, settings: &TeamSettings) -> ApiOutcome {
        let path = format!("/orgs/{}/teams/{}", self.org, slug);
        self.client
            .call(Method::Patch, &path, &[], Some(&to_body(settings)))
    }

    /// Create a team; returns the created team (with its provider-assigned slug).
    pub fn create_team(&self, settings: &TeamSettings) -> Option<RemoteTeam> {
        let path = format!("/orgs/{}/teams", self.org);
        let outcome = self.client.call(Method::Post, &path, &[], Some(&to_body(settings)));
        decode(outcome, &path)
    }

    /// Grant the team `permission` on `owner/name`. Idempotent.
    pub fn set_repository_permission(
        &self,
        slug: &TeamSlug,
        full_name: &str,
        permission: Permission,
    ) -> ApiOutcome {
        let path = format!("/orgs/{}/teams/{}/repos/{}", self.org, slug, full_name);
        let body = json!({ "permission": permission.as_str() });
        self.client.call(Method::Put, &path, &[], Some(&body))
    }

    /// Add or update a login's membership role. Idempotent.
    pub fn set_membership(&self, slug: &TeamSlug, login: &Login, role: TeamRole) -> ApiOutcome {
        let path = format!("/orgs/{}/teams/{}/memberships/{}", self.org, slug, login);
        let body = json!({ "role": role.as_str() });
        self.client.call(Method::Put, &path, &[], Some(&body))
    }

    pub fn create_pull(&self, repository: &str, draft: &PullRequestDraft) -> Option<RemotePull> {
        let path = format!("/repos/{repository}/pulls");
        let outcome = self.client.call(Method::Post, &path, &[], Some(&to_body(draft)));
        decode(outcome, &path)
    }

    pub fn update_pull(
        &self,
        repository: &str,
        number: u64,
        draft: &PullRequestDraft,
    ) -> Option<RemotePull> {
        let path = format!("/repos/{repository}/pulls/{number}");
        let outcome = self.client.call(Method::Patch, &path, &[], Some(&to_body(draft)));
        decode(outcome, &path)
    }

    // -- helpers -------------------------------------------------------------

    fn list<D: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Vec<D> {
        self.try_list(path, query).unwrap_or_default()
    }

    fn try_list<D: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Option<Vec<D>> {
        match self.client.call(Method::Get, path, query, None) {
            ApiOutcome::Json(value) => match serde_json::from_value(value) {
                Ok(items) => Some(items),
                Err(e) => {
                    tracing::warn!(path, "unexpected list payload: {e}");
                    None
                }
            },
            ApiOutcome::NoContent => Some(Vec::new()),
            other => {
                tracing::warn!(path, outcome = ?other, "list call failed; continuing with no entries");
                None
            }
        }
    }
}

fn decode<D: DeserializeOwned>(outcome: ApiOutcome, path: &str) -> Option<D> {
    match outcome {
        ApiOutcome::Json(value) => match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(path, "unexpected payload: {e}");
                None
            }
        },
        other => {
            tracing::warn!(path, outcome = ?other, "call did not return a payload");
            None
        }
    }
}

fn to_body<S: Serialize>(value: &S) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeTransport;
    use crate::transport::ApiResponse;

    fn api(fake: FakeTransport) -> GitHubApi<FakeTransport> {
        GitHubApi::new(ProviderClient::new("https://api.github.test", "t", fake), "acme")
    }

    #[test]
    fn team_members_filters_by_role() {
        let fake = FakeTransport::new()
            .on_query(
                Method::Get,
                "/orgs/acme/teams/core/members",
                &[("role", "maintainer")],
                ApiResponse::json(200, &json!([{"login": "alice"}])),
            )
            .on_query(
                Method::Get,
                "/orgs/acme/teams/core/members",
                &[("role", "member")],
                ApiResponse::json(200, &json!([{"login": "alice"}, {"login": "bob"}])),
            );
        let api = api(fake);
        let slug = TeamSlug::from("core");
        assert_eq!(api.team_members(&slug, TeamRole::Maintainer), vec![Login::from("alice")]);
        assert_eq!(
            api.team_members(&slug, TeamRole::Member),
            vec![Login::from("alice"), Login::from("bob")]
        );
    }

    #[test]
    fn failed_list_degrades_to_empty() {
        let fake = FakeTransport::new()
            .on(Method::Get, "/orgs/acme/members", ApiResponse::new(500, "boom"));
        assert!(api(fake).org_members().is_empty());
    }

    #[test]
    fn try_teams_tells_failure_from_empty_org() {
        let failing = FakeTransport::new()
            .on(Method::Get, "/orgs/acme/teams", ApiResponse::new(502, "bad gateway"));
        assert_eq!(api(failing).try_teams(), None);

        let empty = FakeTransport::new()
            .on(Method::Get, "/orgs/acme/teams", ApiResponse::json(200, &json!([])));
        assert_eq!(api(empty).try_teams(), Some(vec![]));
    }

    #[test]
    fn repository_permissions_default_missing_flags() {
        let fake = FakeTransport::new().on(
            Method::Get,
            "/orgs/acme/teams/core/repos",
            ApiResponse::json(
                200,
                &json!([{"full_name": "acme/api", "permissions": {"admin": false, "push": true, "pull": true}}]),
            ),
        );
        let repos = api(fake).team_repositories(&TeamSlug::from("core"));
        assert_eq!(repos.len(), 1);
        assert!(repos[0].permissions.push);
        assert!(!repos[0].permissions.maintain);
    }

    #[test]
    fn open_pulls_uses_owner_qualified_head() {
        let fake = FakeTransport::new();
        let api = api(fake);
        api.open_pulls("acme/org-config", "sync2code");
        let request = &api.client().transport().requests()[0];
        assert!(request
            .query
            .contains(&("head".to_string(), "acme:sync2code".to_string())));
        assert!(request.query.contains(&("state".to_string(), "open".to_string())));
    }

    #[test]
    fn update_team_sends_settings_body() {
        let fake = FakeTransport::new().on(
            Method::Patch,
            "/orgs/acme/teams/core",
            ApiResponse::json(200, &json!({"name": "Core", "slug": "core"})),
        );
        let api = api(fake);
        let settings = TeamSettings {
            name: "Core".into(),
            description: Some("d".into()),
            privacy: Some(Privacy::Closed),
        };
        assert!(api.update_team(&TeamSlug::from("core"), &settings).is_success());
        let request = &api.client().transport().requests()[0];
        assert_eq!(
            request.body,
            Some(json!({"name": "Core", "description": "d", "privacy": "closed"}))
        );
    }

    #[test]
    fn default_branch_is_read_from_repository() {
        let fake = FakeTransport::new().on(
            Method::Get,
            "/repos/acme/org-config",
            ApiResponse::json(200, &json!({"default_branch": "trunk"})),
        );
        assert_eq!(api(fake).default_branch("acme/org-config").as_deref(), Some("trunk"));
    }
}
