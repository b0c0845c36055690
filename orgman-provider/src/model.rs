//! Team model builder: raw provider responses → [`TeamRecord`].

use orgman_core::{Login, Permission, RepositoryAccess, TeamRecord, TeamRole};

use crate::api::{GitHubApi, RemoteRepository, RemoteTeam};
use crate::transport::Transport;

/// Split role lists into `(members, maintainers)`. A login in both lists is a
/// maintainer only. Provider order is kept.
pub fn resolve_membership(maintainers: Vec<Login>, members: Vec<Login>) -> (Vec<Login>, Vec<Login>) {
    let members = members
        .into_iter()
        .filter(|m| !maintainers.contains(m))
        .collect();
    (members, maintainers)
}

/// One [`RepositoryAccess`] per repository, at its highest granted permission.
pub fn resolve_repositories(repositories: Vec<RemoteRepository>) -> Vec<RepositoryAccess> {
    repositories
        .into_iter()
        .map(|r| RepositoryAccess {
            permission: Permission::from_flags(&r.permissions),
            full_name: r.full_name,
        })
        .collect()
}

/// Fetch membership and repository access for one team.
pub fn build_team<T: Transport>(api: &GitHubApi<T>, team: RemoteTeam) -> TeamRecord {
    let maintainers = api.team_members(&team.slug, TeamRole::Maintainer);
    let members = api.team_members(&team.slug, TeamRole::Member);
    let (members, maintainers) = resolve_membership(maintainers, members);
    let repositories = resolve_repositories(api.team_repositories(&team.slug));

    tracing::debug!(
        team = %team.slug,
        members = members.len(),
        maintainers = maintainers.len(),
        repositories = repositories.len(),
        "built team record"
    );

    TeamRecord {
        name: team.name,
        description: team.description,
        members,
        maintainers,
        repositories,
        slug: Some(team.slug),
        privacy: team.privacy,
    }
}

/// Build a record for every team in `teams`, or for every existing team when
/// `teams` is `None`. Output order follows the input (or fetch) order.
pub fn build_teams<T: Transport>(api: &GitHubApi<T>, teams: Option<Vec<RemoteTeam>>) -> Vec<TeamRecord> {
    let teams = teams.unwrap_or_else(|| api.teams());
    tracing::info!(count = teams.len(), "building team records");
    teams.into_iter().map(|team| build_team(api, team)).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use orgman_core::{PermissionFlags, Privacy, TeamSlug};

    use super::*;
    use crate::client::ProviderClient;
    use crate::fake::FakeTransport;
    use crate::transport::{ApiResponse, Method};

    fn api(fake: FakeTransport) -> GitHubApi<FakeTransport> {
        GitHubApi::new(ProviderClient::new("https://api.github.test", "t", fake), "acme")
    }

    fn logins(names: &[&str]) -> Vec<Login> {
        names.iter().copied().map(Login::from).collect()
    }

    #[test]
    fn maintainer_wins_on_overlap() {
        let (members, maintainers) =
            resolve_membership(logins(&["alice", "erin"]), logins(&["bob", "alice", "carol", "erin"]));
        assert_eq!(members, logins(&["bob", "carol"]));
        assert_eq!(maintainers, logins(&["alice", "erin"]));
        assert!(members.iter().all(|m| !maintainers.contains(m)));
    }

    #[test]
    fn repositories_get_single_highest_permission() {
        let repos = resolve_repositories(vec![
            RemoteRepository {
                full_name: "acme/api".into(),
                permissions: PermissionFlags { admin: true, maintain: true, push: true, triage: true, pull: true },
            },
            RemoteRepository {
                full_name: "acme/docs".into(),
                permissions: PermissionFlags { pull: true, ..Default::default() },
            },
        ]);
        assert_eq!(
            repos,
            vec![
                RepositoryAccess { full_name: "acme/api".into(), permission: Permission::Admin },
                RepositoryAccess { full_name: "acme/docs".into(), permission: Permission::Pull },
            ]
        );
    }

    fn core_team_fake() -> FakeTransport {
        FakeTransport::new()
            .on(
                Method::Get,
                "/orgs/acme/teams",
                ApiResponse::json(
                    200,
                    &json!([
                        {"name": "Core", "slug": "core", "description": "core team", "privacy": "closed"},
                        {"name": "Web", "slug": "web", "description": null, "privacy": "secret"}
                    ]),
                ),
            )
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
            )
            .on(
                Method::Get,
                "/orgs/acme/teams/core/repos",
                ApiResponse::json(
                    200,
                    &json!([{"full_name": "acme/api", "permissions": {"admin": false, "maintain": false, "push": true, "triage": true, "pull": true}}]),
                ),
            )
    }

    #[test]
    fn builds_every_existing_team_in_fetch_order() {
        let api = api(core_team_fake());
        let teams = build_teams(&api, None);

        let slugs: Vec<_> = teams.iter().map(|t| t.slug.clone().unwrap()).collect();
        assert_eq!(slugs, vec![TeamSlug::from("core"), TeamSlug::from("web")]);

        let core = &teams[0];
        assert_eq!(core.name, "Core");
        assert_eq!(core.description.as_deref(), Some("core team"));
        assert_eq!(core.members, logins(&["bob"]));
        assert_eq!(core.maintainers, logins(&["alice"]));
        assert_eq!(core.privacy, Some(Privacy::Closed));
        assert_eq!(
            core.repositories,
            vec![RepositoryAccess { full_name: "acme/api".into(), permission: Permission::Push }]
        );

        let web = &teams[1];
        assert!(web.members.is_empty());
        assert!(web.maintainers.is_empty());
        assert!(web.repositories.is_empty());
    }

    #[test]
    fn explicit_team_list_skips_team_fetch() {
        let api = api(core_team_fake());
        let only_core = vec![RemoteTeam {
            name: "Core".into(),
            slug: TeamSlug::from("core"),
            description: None,
            privacy: Some(Privacy::Closed),
        }];
        let teams = build_teams(&api, Some(only_core));
        assert_eq!(teams.len(), 1);

        let fetched_team_list = api
            .client()
            .transport()
            .sent()
            .iter()
            .any(|(_, path)| path == "/orgs/acme/teams");
        assert!(!fetched_team_list);
    }

    #[test]
    fn maintainers_are_fetched_before_members() {
        let api = api(core_team_fake());
        build_teams(&api, None);
        let roles: Vec<String> = api
            .client()
            .transport()
            .requests()
            .iter()
            .filter(|r| r.url.ends_with("/teams/core/members"))
            .filter_map(|r| r.query.iter().find(|(k, _)| k == "role").map(|(_, v)| v.clone()))
            .collect();
        assert_eq!(roles, ["maintainer", "member"]);
    }
}
