//! Content-gated atomic writer.
//!
//! 1. Normalise line endings of the rendered content.
//! 2. Compare with the file on disk → skip if identical.
//! 3. Dry-run stops here and reports what would happen.
//! 4. Write through [`store::write_atomic`] (`.orgman.tmp` + rename).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use orgman_core::store;

use crate::error::{io_err, SyncError};

/// Outcome of an individual file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped; content on disk already matches.
    Unchanged { path: PathBuf },
    /// Dry-run: the file *would* have been written.
    WouldWrite { path: PathBuf },
    /// Stale team file deleted by a pruning export.
    Removed { path: PathBuf },
    /// Dry-run: the stale team file *would* have been deleted.
    WouldRemove { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path }
            | WriteResult::Removed { path }
            | WriteResult::WouldRemove { path } => path,
        }
    }

    /// True for anything other than [`WriteResult::Unchanged`].
    pub fn is_change(&self) -> bool {
        !matches!(self, WriteResult::Unchanged { .. })
    }
}

/// Write `content` to `path` unless it already holds exactly that content.
pub fn write_file(path: &Path, content: &str, dry_run: bool) -> Result<WriteResult, SyncError> {
    let content = normalize_line_endings(content);

    if read_existing(path)?.as_deref() == Some(content.as_str()) {
        tracing::debug!("unchanged: {}", path.display());
        return Ok(WriteResult::Unchanged {
            path: path.to_path_buf(),
        });
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    store::write_atomic(path, &content)?;
    tracing::info!("File {} written", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

/// Delete a stale file.
pub fn remove_file(path: &Path, dry_run: bool) -> Result<WriteResult, SyncError> {
    if dry_run {
        tracing::info!("[dry-run] would remove: {}", path.display());
        return Ok(WriteResult::WouldRemove {
            path: path.to_path_buf(),
        });
    }
    std::fs::remove_file(path).map_err(|e| io_err(path, e))?;
    tracing::info!("File {} removed", path.display());
    Ok(WriteResult::Removed {
        path: path.to_path_buf(),
    })
}

/// Current content of `path` with normalised line endings, or `None` if absent.
pub(crate) fn read_existing(path: &Path) -> Result<Option<String>, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(normalize_line_endings(&content))),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(path, err)),
    }
}

pub(crate) fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
