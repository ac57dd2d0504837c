//! The request helper: injects configuration into outbound requests and
//! normalizes responses into JSON values.
//!
//! # Design
//! `ApiClient` holds a `ConfigProvider`, a `Transport`, and a header merge
//! policy. It carries no mutable state between calls. `request` is split
//! into `build_request` (pure), `Transport::execute` (I/O), and
//! `parse_response` (pure), so each half can be tested without a network.
//!
//! Calls are blocking: `request` holds the calling thread for the single
//! round-trip and returns its outcome. Callers wanting concurrency run
//! requests on their own threads; the client itself shares nothing between
//! calls.
//!
//! Header merge: caller headers come first in their given order, followed by
//! `Authorization` (only when a token is configured) and `Content-Type`.
//! Names compare case-insensitively. On a conflict `HeaderMerge` decides
//! which side is kept; the other is dropped.

use serde::Serialize;
use serde_json::Value;

use crate::config::ConfigProvider;
use crate::error::ApiError;
use crate::http::{find_header, HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Resolution of a header supplied both by the caller and by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderMerge {
    /// The client's `Authorization` and `Content-Type` replace the caller's.
    #[default]
    InjectedWins,
    /// The caller's header is kept and the injected one is skipped.
    CallerWins,
}

/// Per-call options: method, extra headers, and an opaque body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Forwarded to the transport unchanged.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn json<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_string(payload).map_err(ApiError::Encode)?;
        Ok(self.body(body))
    }
}

impl From<HttpMethod> for RequestOptions {
    fn from(method: HttpMethod) -> Self {
        Self::new().method(method)
    }
}

/// Stateless request helper.
#[derive(Debug, Clone)]
pub struct ApiClient<P, T> {
    config: P,
    transport: T,
    merge: HeaderMerge,
}

#[cfg(feature = "ureq")]
impl<P: ConfigProvider> ApiClient<P, crate::transport::UreqTransport> {
    /// Client using the default blocking transport.
    pub fn new(config: P) -> Self {
        Self::with_transport(config, crate::transport::UreqTransport::new())
    }
}

impl<P: ConfigProvider, T: Transport> ApiClient<P, T> {
    pub fn with_transport(config: P, transport: T) -> Self {
        Self {
            config,
            transport,
            merge: HeaderMerge::default(),
        }
    }

    pub fn header_merge(mut self, merge: HeaderMerge) -> Self {
        self.merge = merge;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the outbound request for `path`, reading configuration now.
    ///
    /// `path` is appended to the base URL verbatim; it is neither validated
    /// nor escaped.
    pub fn build_request(&self, path: &str, options: RequestOptions) -> HttpRequest {
        let config = self.config.config();

        let mut injected = Vec::with_capacity(2);
        if let Some(token) = config.bearer() {
            injected.push((AUTHORIZATION.to_string(), format!("Bearer {token}")));
        }
        injected.push((CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()));

        HttpRequest {
            method: options.method,
            url: format!("{}{}", config.base_url, path),
            headers: merge_headers(options.headers, injected, self.merge),
            body: options.body,
        }
    }

    /// Normalize a response: non-2xx becomes `ApiError::Status`, otherwise the
    /// body is parsed as JSON.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
            });
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Issue exactly one request and return the parsed JSON body.
    pub fn request(&self, path: &str, options: impl Into<RequestOptions>) -> Result<Value, ApiError> {
        let request = self.build_request(path, options.into());
        let method = request.method;
        tracing::debug!(%method, url = %request.url, "sending request");

        let response = self.transport.execute(request).map_err(|err| {
            tracing::warn!(%method, path, error = %err, "transport failed");
            ApiError::Transport(err)
        })?;

        if !response.is_success() {
            tracing::warn!(%method, path, status = response.status, "request failed");
        }
        self.parse_response(response)
    }
}

fn merge_headers(
    caller: Vec<(String, String)>,
    injected: Vec<(String, String)>,
    merge: HeaderMerge,
) -> Vec<(String, String)> {
    match merge {
        HeaderMerge::InjectedWins => {
            let mut merged: Vec<_> = caller
                .into_iter()
                .filter(|(name, _)| find_header(&injected, name).is_none())
                .collect();
            merged.extend(injected);
            merged
        }
        HeaderMerge::CallerWins => {
            let extra: Vec<_> = injected
                .into_iter()
                .filter(|(name, _)| find_header(&caller, name).is_none())
                .collect();
            let mut merged = caller;
            merged.extend(extra);
            merged
        }
    }
}
