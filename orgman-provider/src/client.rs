//! Paginated request wrapper over the provider REST API.
//!
//! ## Status handling
//!
//! | status    | outcome                                  |
//! |-----------|------------------------------------------|
//! | 200 / 201 | [`ApiOutcome::Json`], pages concatenated |
//! | 204       | [`ApiOutcome::NoContent`]                |
//! | 404       | [`ApiOutcome::NotFound`]                 |
//! | other     | [`ApiOutcome::Failed`], logged           |
//!
//! Nothing here returns `Err`: a failed call is logged and handed back as a
//! value for the caller to inspect or ignore.

use serde_json::Value;

use crate::transport::{ApiRequest, Method, Transport, ACCEPT};

/// Result of a single logical API call (all pages included).
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    /// Decoded body. For paginated list endpoints, every page's items in order.
    Json(Value),
    /// 204: the call succeeded with no body.
    NoContent,
    /// 404: the resource does not exist.
    NotFound,
    /// Any other status, an undecodable body, or no response at all (`status: None`).
    Failed { status: Option<u16>, message: String },
}

impl ApiOutcome {
    /// `Json` or `NoContent`.
    pub fn is_success(&self) -> bool {
        matches!(self, ApiOutcome::Json(_) | ApiOutcome::NoContent)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiOutcome::NotFound)
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ApiOutcome::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Issues authenticated calls against one API base URL.
pub struct ProviderClient<T> {
    base_url: String,
    token: String,
    transport: T,
}

impl<T: Transport> ProviderClient<T> {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Absolute URLs pass through untouched; anything else is appended to the base URL.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Issue `method` against `path`, following `rel="next"` links until exhausted.
    pub fn call(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> ApiOutcome {
        let mut request = ApiRequest {
            method,
            url: self.resolve_url(path),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            headers: vec![
                ("Accept".to_string(), ACCEPT.to_string()),
                ("Authorization".to_string(), format!("Bearer {}", self.token)),
            ],
            body: body.cloned(),
        };

        let mut collected: Vec<Value> = Vec::new();
        let mut page = 1usize;

        loop {
            log_dispatch(&request);

            let response = match self.transport.send(&request) {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(method = %method, url = %request.url, "API call failed: {e}");
                    return ApiOutcome::Failed {
                        status: None,
                        message: e.to_string(),
                    };
                }
            };

            match response.status {
                200 | 201 => {}
                204 => {
                    tracing::info!("status code 204, no content");
                    return ApiOutcome::NoContent;
                }
                404 => {
                    tracing::info!(url = %request.url, "status code 404");
                    return ApiOutcome::NotFound;
                }
                status => {
                    tracing::warn!(status, url = %request.url, body = %response.body, "API call failed");
                    return ApiOutcome::Failed {
                        status: Some(status),
                        message: response.body,
                    };
                }
            }

            let value = if response.body.trim().is_empty() {
                Value::Null
            } else {
                match serde_json::from_str::<Value>(&response.body) {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::warn!(url = %request.url, "undecodable response body: {e}");
                        return ApiOutcome::Failed {
                            status: Some(response.status),
                            message: format!("invalid JSON body: {e}"),
                        };
                    }
                }
            };

            let items = match value {
                Value::Array(items) => items,
                other if page == 1 => return ApiOutcome::Json(other),
                _ => {
                    tracing::warn!(page, url = %request.url, "non-list page in paginated response; stopping");
                    return ApiOutcome::Json(Value::Array(collected));
                }
            };
            collected.extend(items);

            match response.next_link {
                Some(next) => {
                    page += 1;
                    tracing::info!(page, fetched = collected.len(), "fetching next page");
                    request.url = self.resolve_url(&next);
                    request.query.clear();
                }
                None => {
                    if page > 1 {
                        tracing::info!(pages = page, items = collected.len(), "pagination complete");
                    }
                    return ApiOutcome::Json(Value::Array(collected));
                }
            }
        }
    }
}

fn log_dispatch(request: &ApiRequest) {
    let payload = match (&request.body, request.query.is_empty()) {
        (Some(body), _) => body.to_string(),
        (None, false) => request
            .query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&"),
        (None, true) => "-".to_string(),
    };
    tracing::info!(method = %request.method, url = %request.url, payload = %payload, "API call");
}
