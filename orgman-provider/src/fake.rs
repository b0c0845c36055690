//! Scripted in-memory [`Transport`] for tests.
//!
//! Routes match on method, URL path (scheme and host ignored, query string
//! included) and a subset of query parameters. Unmatched requests get a 404.
//! Every request is recorded.

use std::cell::RefCell;

use crate::error::ProviderError;
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

struct Route {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    response: Option<ApiResponse>,
}

#[derive(Default)]
pub struct FakeTransport {
    routes: Vec<Route>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `response`.
    pub fn on(self, method: Method, path: &str, response: ApiResponse) -> Self {
        self.on_query(method, path, &[], response)
    }

    /// Answer `method path` carrying every `query` pair with `response`.
    pub fn on_query(
        mut self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        response: ApiResponse,
    ) -> Self {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            response: Some(response),
        });
        self
    }

    /// Any request to `path` fails at the transport level.
    pub fn unreachable(mut self, path: &str) -> Self {
        for method in [Method::Get, Method::Post, Method::Put, Method::Patch] {
            self.routes.push(Route {
                method,
                path: path.to_string(),
                query: vec![],
                response: None,
            });
        }
        self
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    /// `(method, path)` of every request sent so far.
    pub fn sent(&self) -> Vec<(Method, String)> {
        self.requests
            .borrow()
            .iter()
            .map(|r| (r.method, path_of(&r.url).to_string()))
            .collect()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ProviderError> {
        self.requests.borrow_mut().push(request.clone());

        let path = path_of(&request.url);
        let route = self.routes.iter().find(|route| {
            route.method == request.method
                && route.path == path
                && route.query.iter().all(|pair| request.query.contains(pair))
        });
        match route {
            Some(Route { response: Some(response), .. }) => Ok(response.clone()),
            Some(Route { response: None, .. }) => {
                Err(ProviderError::Transport(format!("connection refused: {}", request.url)))
            }
            None => Ok(ApiResponse::new(404, r#"{"message":"Not Found"}"#)),
        }
    }
}

/// `https://host/a/b?c=d` → `/a/b?c=d`.
fn path_of(url: &str) -> &str {
    match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            rest.find('/').map_or("/", |i| &rest[i..])
        }
        None => url,
    }
}
