//! Domain types for the organization team model.
//!
//! All types are serializable/deserializable via serde + serde_yaml. Field
//! order on [`TeamRecord`] is the on-disk key order and must not be changed.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Provider-assigned stable identifier of a team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamSlug(pub String);

impl fmt::Display for TeamSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TeamSlug {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TeamSlug {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A user login on the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Login(pub String);

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Login {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Login {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Repository permission granted to a team, ordered from least to most privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    #[default]
    Pull,
    Triage,
    Push,
    Maintain,
    Admin,
}

impl Permission {
    /// Highest permission whose flag is set, checked admin > maintain > push > triage.
    /// Falls back to [`Permission::Pull`].
    pub fn from_flags(flags: &PermissionFlags) -> Self {
        if flags.admin {
            Permission::Admin
        } else if flags.maintain {
            Permission::Maintain
        } else if flags.push {
            Permission::Push
        } else if flags.triage {
            Permission::Triage
        } else {
            Permission::Pull
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Pull => "pull",
            Permission::Triage => "triage",
            Permission::Push => "push",
            Permission::Maintain => "maintain",
            Permission::Admin => "admin",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The boolean permission flags the provider reports per repository.
///
/// Older provider versions omit `maintain` and `triage`; they default to false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionFlags {
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub maintain: bool,
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub triage: bool,
    #[serde(default)]
    pub pull: bool,
}

/// Team visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Secret,
    Closed,
}

impl fmt::Display for Privacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Privacy::Secret => write!(f, "secret"),
            Privacy::Closed => write!(f, "closed"),
        }
    }
}

/// Membership role inside a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    Member,
    Maintainer,
}

impl TeamRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Member => "member",
            TeamRole::Maintainer => "maintainer",
        }
    }
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A repository a team can access, with exactly one permission level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryAccess {
    /// `owner/name`.
    pub full_name: String,
    pub permission: Permission,
}

/// Normalized team record, as exported to and read from `<teams_dir>/<slug>.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Never contains a login that is also in `maintainers`.
    #[serde(default)]
    pub members: Vec<Login>,
    #[serde(default)]
    pub maintainers: Vec<Login>,
    #[serde(default)]
    pub repositories: Vec<RepositoryAccess>,
    /// Absent for teams declared in a file but not yet created remotely.
    #[serde(default)]
    pub slug: Option<TeamSlug>,
    #[serde(default)]
    pub privacy: Option<Privacy>,
}

impl TeamRecord {
    /// Drop every member that is also a maintainer. Maintainer wins.
    pub fn normalized(mut self) -> Self {
        let maintainers = &self.maintainers;
        self.members.retain(|m| !maintainers.contains(m));
        self
    }

    /// The settings patched onto or used to create the remote team.
    pub fn settings(&self) -> TeamSettings {
        TeamSettings {
            name: self.name.clone(),
            description: self.description.clone(),
            privacy: self.privacy,
        }
    }

    /// Every login mentioned by this team, maintainers first.
    pub fn logins(&self) -> impl Iterator<Item = &Login> {
        self.maintainers.iter().chain(self.members.iter())
    }
}

/// Request body for creating or updating a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamSettings {
    pub name: String,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<Privacy>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
