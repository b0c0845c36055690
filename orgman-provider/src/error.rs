//! Error types for orgman-provider.
//!
//! HTTP status codes are not errors here; they surface as
//! [`ApiOutcome`](crate::client::ApiOutcome) values. These errors cover
//! building the transport and failing to reach the provider at all.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, DNS, TLS handshake or body read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The TLS connector could not be built.
    #[error("TLS setup error: {0}")]
    Tls(#[from] native_tls::Error),

    /// The configured proxy URL was rejected.
    #[error("invalid proxy '{url}': {message}")]
    Proxy { url: String, message: String },
}
