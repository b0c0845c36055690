//! Team files on disk.
//!
//! # Storage layout
//!
//! ```text
//! <teams_dir>/
//!   <slug>.yaml               (one file per team)
//!   _no_teams_member.yaml     (org members with no team; not a team file)
//! <codeowners_dir>/
//!   CODEOWNERS
//! ```
//!
//! Writes go through [`write_atomic`]: `.orgman.tmp` sibling, then `rename`.

use std::path::{Path, PathBuf};

use crate::config::{Layout, NO_TEAM_MEMBERS_FILE};
use crate::error::{io_err, StoreError};
use crate::types::{Login, TeamRecord};

// ---------------------------------------------------------------------------
// 1. Directories
// ---------------------------------------------------------------------------

/// Create `dir` if it does not exist. Only the last component is created; a
/// missing parent is an error.
pub fn ensure_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir(dir).map_err(|e| io_err(dir, e))?;
    tracing::info!("created directory {}", dir.display());
    Ok(())
}

/// Every `*.yaml` team file in the teams directory, sorted by file name.
///
/// Skips the no-team-members file. A missing directory yields an empty list.
pub fn list_team_files(layout: &Layout) -> Result<Vec<PathBuf>, StoreError> {
    let dir = &layout.teams_dir;
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".yaml") && name != NO_TEAM_MEMBERS_FILE
        })
        .map(|e| e.path())
        .collect();
    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load a team file. Returns `StoreError::Parse` (with path + line context) if malformed.
pub fn load_team(path: &Path) -> Result<TeamRecord, StoreError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// 3. Encode / save
// ---------------------------------------------------------------------------

pub fn encode_team(team: &TeamRecord) -> Result<String, StoreError> {
    Ok(serde_yaml::to_string(team)?)
}

pub fn encode_logins(logins: &[Login]) -> Result<String, StoreError> {
    Ok(serde_yaml::to_string(logins)?)
}

/// Atomically save a team record to `path`.
pub fn save_team(path: &Path, team: &TeamRecord) -> Result<(), StoreError> {
    write_atomic(path, &encode_team(team)?)
}

/// Write `content` to `<path>.orgman.tmp`, then rename over `path`.
///
/// The temporary file is removed if the rename fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), StoreError> {
    let tmp = PathBuf::from(format!("{}.orgman.tmp", path.display()));
    write_atomic_with_tmp(path, content, &tmp)
}

fn write_atomic_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), StoreError> {
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;
    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
