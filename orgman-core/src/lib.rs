//! orgman core library: team model, configuration, team-file store and errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and the [`TeamRecord`] model
//! - [`config`] — [`Config`] and the on-disk [`Layout`]
//! - [`store`] — load / save / list team files
//! - [`error`] — [`ConfigError`], [`StoreError`]

pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use config::{Config, HttpSettings, Layout};
pub use error::{ConfigError, StoreError};
pub use types::{
    Login, Permission, PermissionFlags, Privacy, RepositoryAccess, TeamRecord, TeamRole,
    TeamSettings, TeamSlug,
};
