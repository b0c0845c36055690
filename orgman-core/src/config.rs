//! Process configuration.
//!
//! Built once at startup from the environment (or explicit key/value pairs in
//! tests) through the `config` crate, then handed to every component. Nothing
//! below this module reads the environment.

use std::fmt;
use std::path::{Path, PathBuf};

use ::config::{Environment, Map};
use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;
use crate::types::TeamSlug;

pub const API_URL_KEY: &str = "GITHUB_API_URL";
pub const TOKEN_KEY: &str = "GITHUB_TOKEN";
pub const ORG_KEY: &str = "GITHUB_ORG";
pub const REPO_DIR_KEY: &str = "GITHUB_REPO_DIR";
pub const REPOSITORY_KEY: &str = "GITHUB_REPOSITORY";
pub const TEAMS_DIR_KEY: &str = "TEAMS_DIR";
pub const CODEOWNERS_DIR_KEY: &str = "CODEOWNERS_DIR";
pub const BRANCH_KEY: &str = "GITHUB_BRANCH";
pub const BASE_BRANCH_KEY: &str = "GITHUB_BASE_BRANCH";
pub const HTTPS_PROXY_KEY: &str = "HTTPS_PROXY";
pub const HTTP_PROXY_KEY: &str = "HTTP_PROXY";
pub const VERIFY_KEY: &str = "VERIFY";
pub const OUTPUT_KEY: &str = "GITHUB_OUTPUT";

pub const DEFAULT_BRANCH: &str = "sync2code";

/// File listing organization members that belong to no team.
pub const NO_TEAM_MEMBERS_FILE: &str = "_no_teams_member.yaml";
pub const CODEOWNERS_FILE: &str = "CODEOWNERS";

/// Where snapshot files live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub repo_dir: PathBuf,
    pub teams_dir: PathBuf,
    pub codeowners_dir: PathBuf,
}

impl Layout {
    /// Layout with the default `<repo>/teams` and `<repo>` directories.
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        let repo_dir = repo_dir.into();
        Self {
            teams_dir: repo_dir.join("teams"),
            codeowners_dir: repo_dir.clone(),
            repo_dir,
        }
    }

    /// `<teams_dir>/<slug>.yaml`. No I/O.
    pub fn team_path(&self, slug: &TeamSlug) -> PathBuf {
        self.teams_dir.join(format!("{}.yaml", slug.0))
    }

    pub fn no_team_members_path(&self) -> PathBuf {
        self.teams_dir.join(NO_TEAM_MEMBERS_FILE)
    }

    pub fn codeowners_path(&self) -> PathBuf {
        self.codeowners_dir.join(CODEOWNERS_FILE)
    }

    /// The teams directory as a repository-rooted path (`/teams`), used in CODEOWNERS.
    ///
    /// A teams directory outside the repository is returned unchanged.
    pub fn repo_relative_teams_dir(&self) -> String {
        match self.teams_dir.strip_prefix(&self.repo_dir) {
            Ok(rel) => {
                let rel = rel.to_string_lossy().replace('\\', "/");
                format!("/{}", rel.trim_matches('/'))
            }
            Err(_) => self.teams_dir.to_string_lossy().into_owned(),
        }
    }
}

/// Transport-level settings for the provider client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub https_proxy: Option<String>,
    pub http_proxy: Option<String>,
    pub verify_tls: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            https_proxy: None,
            http_proxy: None,
            verify_tls: true,
        }
    }
}

impl HttpSettings {
    /// The proxy to route API traffic through. The HTTPS proxy wins when both are set.
    pub fn proxy(&self) -> Option<&str> {
        self.https_proxy.as_deref().or(self.http_proxy.as_deref())
    }
}

/// Complete runtime configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub token: String,
    pub org: String,
    /// `owner/name` of the repository holding the snapshot; only needed to publish.
    pub repository: Option<String>,
    pub layout: Layout,
    pub branch: String,
    pub base_branch: Option<String>,
    pub http: HttpSettings,
    /// Workflow output file (`GITHUB_OUTPUT`) that `pr-created` is appended to.
    pub output_file: Option<PathBuf>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("org", &self.org)
            .field("repository", &self.repository)
            .field("layout", &self.layout)
            .field("branch", &self.branch)
            .field("base_branch", &self.base_branch)
            .field("http", &self.http)
            .field("output_file", &self.output_file)
            .finish()
    }
}

/// Raw key/value view of the environment. Keys arrive lowercased.
#[derive(Debug, Deserialize)]
struct EnvSettings {
    github_api_url: Option<String>,
    github_token: Option<String>,
    github_org: Option<String>,
    github_repo_dir: Option<String>,
    github_repository: Option<String>,
    teams_dir: Option<PathBuf>,
    codeowners_dir: Option<PathBuf>,
    #[serde(default = "default_branch")]
    github_branch: String,
    github_base_branch: Option<String>,
    https_proxy: Option<String>,
    http_proxy: Option<String>,
    #[serde(default = "default_verify", deserialize_with = "deserialize_flag")]
    verify: bool,
    github_output: Option<PathBuf>,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_verify() -> bool {
    true
}

/// `true`, `1` and `t` (any case) are true; anything else is false.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1" | "t"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn require(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    non_blank(value).ok_or(ConfigError::Missing { key })
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::default())
    }

    /// Read configuration from explicit key/value pairs instead of the process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::load(Environment::default().source(Some(vars)))
    }

    /// Empty values count as absent.
    fn load(environment: Environment) -> Result<Self, ConfigError> {
        let env: EnvSettings = ::config::Config::builder()
            .add_source(environment.ignore_empty(true))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| ConfigError::Invalid {
                message: e.to_string(),
            })?;

        let api_url = require(env.github_api_url, API_URL_KEY)?
            .trim_end_matches('/')
            .to_string();
        let token = require(env.github_token, TOKEN_KEY)?;
        let org = require(env.github_org, ORG_KEY)?;
        let repo_dir = PathBuf::from(require(env.github_repo_dir, REPO_DIR_KEY)?);

        let mut layout = Layout::new(&repo_dir);
        if let Some(dir) = env.teams_dir {
            layout.teams_dir = dir;
        }
        if let Some(dir) = env.codeowners_dir {
            layout.codeowners_dir = dir;
        }

        Ok(Self {
            api_url,
            token,
            org,
            repository: non_blank(env.github_repository),
            layout,
            branch: env.github_branch,
            base_branch: non_blank(env.github_base_branch),
            http: HttpSettings {
                https_proxy: non_blank(env.https_proxy),
                http_proxy: non_blank(env.http_proxy),
                verify_tls: env.verify,
            },
            output_file: env.github_output,
        })
    }

    /// The snapshot repository, or a missing-key error naming `GITHUB_REPOSITORY`.
    pub fn require_repository(&self) -> Result<&str, ConfigError> {
        self.repository.as_deref().ok_or(ConfigError::Missing {
            key: REPOSITORY_KEY,
        })
    }

    pub fn repo_dir(&self) -> &Path {
        &self.layout.repo_dir
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::*;

    fn required() -> HashMap<&'static str, String> {
        HashMap::from([
            (API_URL_KEY, "https://api.github.test/".to_string()),
            (TOKEN_KEY, "s3cret".to_string()),
            (ORG_KEY, "acme".to_string()),
            (REPO_DIR_KEY, "/work/org".to_string()),
        ])
    }

    fn load(vars: &HashMap<&'static str, String>) -> Result<Config, ConfigError> {
        Config::from_vars(vars.iter().map(|(k, v)| (*k, v.clone())))
    }

    #[test]
    fn defaults_are_applied() {
        let config = load(&required()).expect("config");
        assert_eq!(config.api_url, "https://api.github.test");
        assert_eq!(config.branch, "sync2code");
        assert_eq!(config.layout.teams_dir, PathBuf::from("/work/org/teams"));
        assert_eq!(config.layout.codeowners_dir, PathBuf::from("/work/org"));
        assert!(config.http.verify_tls);
        assert!(config.repository.is_none());
        assert!(config.base_branch.is_none());
    }

    #[rstest]
    #[case(API_URL_KEY)]
    #[case(TOKEN_KEY)]
    #[case(ORG_KEY)]
    #[case(REPO_DIR_KEY)]
    fn missing_required_key_is_named(#[case] key: &'static str) {
        let mut vars = required();
        vars.remove(key);
        let err = load(&vars).unwrap_err();
        assert_eq!(err, ConfigError::Missing { key });
        assert!(err.to_string().contains(key));
    }

    #[rstest]
    #[case(TOKEN_KEY, "")]
    #[case(TOKEN_KEY, "  ")]
    #[case(REPO_DIR_KEY, "")]
    fn empty_value_counts_as_missing(#[case] key: &'static str, #[case] value: &str) {
        let mut vars = required();
        vars.insert(key, value.to_string());
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Missing { key });
    }

    #[test]
    fn empty_optional_values_fall_back_to_defaults() {
        let mut vars = required();
        vars.insert(BRANCH_KEY, String::new());
        vars.insert(VERIFY_KEY, String::new());
        vars.insert(TEAMS_DIR_KEY, String::new());
        let config = load(&vars).expect("config");
        assert_eq!(config.branch, "sync2code");
        assert!(config.http.verify_tls);
        assert_eq!(config.layout.teams_dir, PathBuf::from("/work/org/teams"));
    }

    #[test]
    fn unrelated_variables_are_ignored() {
        let mut vars = required();
        vars.insert("PATH", "/usr/bin".to_string());
        vars.insert("HOME", "/root".to_string());
        assert_eq!(load(&vars).expect("config").org, "acme");
    }

    #[test]
    fn output_file_is_read() {
        let mut vars = required();
        vars.insert(OUTPUT_KEY, "/runner/output".to_string());
        assert_eq!(
            load(&vars).expect("config").output_file,
            Some(PathBuf::from("/runner/output"))
        );
        assert!(load(&required()).expect("config").output_file.is_none());
    }

    #[rstest]
    #[case("true", true)]
    #[case("True", true)]
    #[case("1", true)]
    #[case("t", true)]
    #[case("false", false)]
    #[case("0", false)]
    #[case("no", false)]
    fn verify_flag_parsing(#[case] raw: &str, #[case] expected: bool) {
        let mut vars = required();
        vars.insert(VERIFY_KEY, raw.to_string());
        assert_eq!(load(&vars).expect("config").http.verify_tls, expected);
    }

    #[test]
    fn overrides_are_read() {
        let mut vars = required();
        vars.insert(TEAMS_DIR_KEY, "/work/org/org/teams".to_string());
        vars.insert(CODEOWNERS_DIR_KEY, "/work/org/.github".to_string());
        vars.insert(BRANCH_KEY, "org-sync".to_string());
        vars.insert(REPOSITORY_KEY, "acme/org".to_string());
        vars.insert(HTTP_PROXY_KEY, "http://proxy:3128".to_string());
        let config = load(&vars).expect("config");
        assert_eq!(config.layout.teams_dir, PathBuf::from("/work/org/org/teams"));
        assert_eq!(config.layout.codeowners_path(), PathBuf::from("/work/org/.github/CODEOWNERS"));
        assert_eq!(config.branch, "org-sync");
        assert_eq!(config.require_repository().expect("repo"), "acme/org");
        assert_eq!(config.http.proxy(), Some("http://proxy:3128"));
    }

    #[test]
    fn require_repository_names_missing_key() {
        let config = load(&required()).expect("config");
        assert_eq!(
            config.require_repository().unwrap_err(),
            ConfigError::Missing { key: REPOSITORY_KEY }
        );
    }

    #[test]
    fn debug_redacts_token() {
        let config = load(&required()).expect("config");
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn https_proxy_wins_over_http_proxy() {
        let http = HttpSettings {
            https_proxy: Some("http://secure:3128".into()),
            http_proxy: Some("http://plain:3128".into()),
            verify_tls: true,
        };
        assert_eq!(http.proxy(), Some("http://secure:3128"));
    }

    #[rstest]
    #[case("/work/org/teams", "/teams")]
    #[case("/work/org/org/teams/", "/org/teams")]
    #[case("/elsewhere/teams", "/elsewhere/teams")]
    fn repo_relative_teams_dir(#[case] teams_dir: &str, #[case] expected: &str) {
        let mut layout = Layout::new("/work/org");
        layout.teams_dir = PathBuf::from(teams_dir);
        assert_eq!(layout.repo_relative_teams_dir(), expected);
    }
}
