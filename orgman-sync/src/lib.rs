//! # orgman-sync
//!
//! Both directions of the team control loop.
//!
//! - [`export`]: provider → team files, `_no_teams_member.yaml`, CODEOWNERS
//! - [`diff`]: what an export would change, as unified diffs
//! - [`apply`]: team files → provider (additive only)
//! - [`publish`]: commit, push and open/update the pull request
//! - [`pipeline::run`]: a full sync composing the above

pub mod apply;
pub mod diff;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod publish;
pub mod snapshot;
pub mod writer;

pub use apply::{apply_teams, TeamApplyResult};
pub use diff::{diff, FileDiff};
pub use error::SyncError;
pub use export::{export, ExportOptions, ExportReport};
pub use publish::{publish, GitCli, PublishOutcome, PublishSettings, Vcs};
pub use snapshot::Snapshot;
pub use writer::WriteResult;
