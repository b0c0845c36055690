//! The HTTP seam between [`ProviderClient`](crate::client::ProviderClient)
//! and the network.

use std::fmt;
use std::sync::Arc;

use orgman_core::HttpSettings;
use serde_json::Value;

use crate::error::ProviderError;

/// Media type requested on every call.
pub const ACCEPT: &str = "application/vnd.github.v3+json";

/// The HTTP verbs the client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL. May already carry a query string (next-page links do).
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// The parts of a response the client looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    /// Target of the `rel="next"` entry of the `Link` header, if any.
    pub next_link: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            next_link: None,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn with_next(mut self, url: impl Into<String>) -> Self {
        self.next_link = Some(url.into());
        self
    }
}

/// Sends one request and returns the raw response, whatever its status.
///
/// Only failures to get a response at all are errors.
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ProviderError>;
}

/// Blocking [`Transport`] over `ureq`.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(settings: &HttpSettings) -> Result<Self, ProviderError> {
        let mut builder = ureq::AgentBuilder::new()
            .user_agent(concat!("orgman/", env!("CARGO_PKG_VERSION")));

        if let Some(url) = settings.proxy() {
            let proxy = ureq::Proxy::new(url).map_err(|e| ProviderError::Proxy {
                url: url.to_string(),
                message: e.to_string(),
            })?;
            builder = builder.proxy(proxy);
        }

        if !settings.verify_tls {
            tracing::warn!("TLS certificate verification is disabled");
            let connector = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()?;
            builder = builder.tls_connector(Arc::new(connector));
        }

        Ok(Self {
            agent: builder.build(),
        })
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ProviderError> {
        let mut call = self.agent.request(request.method.as_str(), &request.url);
        for (name, value) in &request.headers {
            call = call.set(name, value);
        }
        for (name, value) in &request.query {
            call = call.query(name, value);
        }

        let result = match &request.body {
            Some(body) => call.send_json(body),
            None => call.call(),
        };
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(e)) => return Err(ProviderError::Transport(e.to_string())),
        };

        let status = response.status();
        let next_link = response.header("link").and_then(parse_next_link);
        let body = response
            .into_string()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(ApiResponse {
            status,
            next_link,
            body,
        })
    }
}

/// Extract the `rel="next"` target from a `Link` header.
///
/// `<https://api.github.com/orgs/acme/members?page=2>; rel="next", <…>; rel="last"`
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|p| {
            let p = p.trim();
            p == "rel=\"next\"" || p == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}
