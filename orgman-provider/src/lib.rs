//! # orgman-provider
//!
//! Provider REST client, typed organization endpoints and the team model builder.
//!
//! - [`transport`] — [`Transport`] seam and the blocking `ureq` implementation
//! - [`client`] — [`ProviderClient`]: auth headers, status mapping, pagination
//! - [`api`] — [`GitHubApi`]: typed endpoints for one organization
//! - [`model`] — [`build_teams`]: assemble [`TeamRecord`](orgman_core::TeamRecord)s

pub mod api;
pub mod client;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod fake;
pub mod model;
pub mod transport;

pub use api::{GitHubApi, PullRequestDraft, RemotePull, RemoteRepository, RemoteTeam, RemoteUser};
pub use client::{ApiOutcome, ProviderClient};
pub use error::ProviderError;
pub use model::{build_team, build_teams};
pub use transport::{ApiRequest, ApiResponse, Method, Transport, UreqTransport};
