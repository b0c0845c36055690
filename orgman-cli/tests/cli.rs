use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

/// Nothing listens here, so every API call fails fast at the transport level.
const DEAD_API: &str = "http://127.0.0.1:9";

fn orgman_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_orgman"));
    cmd.env_clear().current_dir(cwd).env("RUST_LOG", "info");
    cmd
}

fn with_config(cmd: &mut Command, repo: &Path) {
    cmd.env("GITHUB_API_URL", DEAD_API)
        .env("GITHUB_TOKEN", "t0ken")
        .env("GITHUB_ORG", "acme")
        .env("GITHUB_REPO_DIR", repo);
}

#[test]
fn help_lists_every_subcommand() {
    let cwd = TempDir::new().expect("cwd");
    orgman_cmd(cwd.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("export"))
        .stdout(contains("diff"))
        .stdout(contains("apply"))
        .stdout(contains("publish"))
        .stdout(contains("sync"));
}

#[test]
fn missing_api_url_is_fatal_and_named() {
    let cwd = TempDir::new().expect("cwd");
    orgman_cmd(cwd.path())
        .arg("export")
        .assert()
        .failure()
        .stderr(contains("GITHUB_API_URL"));
}

#[test]
fn env_file_settings_are_used() {
    let cwd = TempDir::new().expect("cwd");
    let env_file = cwd.path().join("acme.env");
    fs::write(&env_file, format!("GITHUB_API_URL={DEAD_API}\nGITHUB_TOKEN=t0ken\n")).unwrap();

    // The file supplies the first two keys, so the next missing one is reported.
    orgman_cmd(cwd.path())
        .args(["--env-file", env_file.to_str().unwrap(), "export"])
        .assert()
        .failure()
        .stderr(contains("GITHUB_ORG"))
        .stderr(contains("GITHUB_API_URL").not());
}

#[test]
fn dot_env_in_working_directory_is_loaded() {
    let cwd = TempDir::new().expect("cwd");
    fs::write(cwd.path().join(".env"), format!("GITHUB_API_URL={DEAD_API}\n")).unwrap();

    orgman_cmd(cwd.path())
        .arg("export")
        .assert()
        .failure()
        .stderr(contains("GITHUB_TOKEN"));
}

#[test]
fn missing_env_file_is_fatal() {
    let cwd = TempDir::new().expect("cwd");
    orgman_cmd(cwd.path())
        .args(["--env-file", "does-not-exist.env", "export"])
        .assert()
        .failure()
        .stderr(contains("does-not-exist.env"));
}

#[test]
fn export_against_unreachable_api_writes_empty_snapshot() {
    let cwd = TempDir::new().expect("cwd");
    let repo = TempDir::new().expect("repo");
    let mut cmd = orgman_cmd(cwd.path());
    with_config(&mut cmd, repo.path());

    cmd.arg("export")
        .assert()
        .success()
        .stdout(contains("exported 0 teams"))
        .stderr(contains("API call failed"));

    assert_eq!(
        fs::read_to_string(repo.path().join("teams/_no_teams_member.yaml")).unwrap(),
        "[]\n"
    );
    assert!(repo.path().join("CODEOWNERS").exists());
}

#[test]
fn dry_run_export_writes_nothing() {
    let cwd = TempDir::new().expect("cwd");
    let repo = TempDir::new().expect("repo");
    let mut cmd = orgman_cmd(cwd.path());
    with_config(&mut cmd, repo.path());

    cmd.args(["export", "--dry-run"])
        .assert()
        .success()
        .stdout(contains("[dry-run]"));

    assert!(!repo.path().join("teams").exists());
    assert!(!repo.path().join("CODEOWNERS").exists());
}

#[test]
fn publish_requires_repository() {
    let cwd = TempDir::new().expect("cwd");
    let repo = TempDir::new().expect("repo");
    let mut cmd = orgman_cmd(cwd.path());
    with_config(&mut cmd, repo.path());

    cmd.arg("publish")
        .assert()
        .failure()
        .stderr(contains("GITHUB_REPOSITORY"));
}

#[test]
fn sync_without_publish_skips_git() {
    let cwd = TempDir::new().expect("cwd");
    let repo = TempDir::new().expect("repo");
    let mut cmd = orgman_cmd(cwd.path());
    with_config(&mut cmd, repo.path());

    // No GITHUB_REPOSITORY and no git on PATH: only the export runs.
    cmd.args(["sync", "--no-publish"])
        .assert()
        .success()
        .stdout(contains("exported 0 teams"));

    assert!(repo.path().join("teams/_no_teams_member.yaml").exists());
}
