//! Executes `HttpRequest` values against the network.
//!
//! `Transport` is the only place the crate performs I/O. `UreqTransport` is
//! the default implementation; tests substitute recording fakes.

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Performs a single HTTP round-trip.
///
/// Implementations must return 4xx/5xx responses as `Ok(HttpResponse)` and
/// reserve `Err` for requests that produced no response at all.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(feature = "ureq")]
pub use self::ureq_impl::UreqTransport;

#[cfg(feature = "ureq")]
mod ureq_impl {
    use super::Transport;
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a `ureq::Agent`.
    ///
    /// Status-code-as-error is disabled so the client sees every response.
    /// Bodies of failure responses are not read. Success bodies are read as
    /// bytes without a size limit. No timeouts are configured.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
            let url = req.url.as_str();
            let result = match req.method {
                HttpMethod::Get => with_headers(self.agent.get(url), &req.headers).call(),
                HttpMethod::Delete => {
                    let builder = with_headers(self.agent.delete(url), &req.headers);
                    match req.body {
                        Some(body) => builder.force_send_body().send(body.as_bytes()),
                        None => builder.call(),
                    }
                }
                HttpMethod::Post => {
                    send(with_headers(self.agent.post(url), &req.headers), req.body)
                }
                HttpMethod::Put => send(with_headers(self.agent.put(url), &req.headers), req.body),
                HttpMethod::Patch => {
                    send(with_headers(self.agent.patch(url), &req.headers), req.body)
                }
            };
            let mut response = result?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = if (200..=299).contains(&status) {
                response
                    .body_mut()
                    .with_config()
                    .limit(u64::MAX)
                    .read_to_vec()?
            } else {
                Vec::new()
            };

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }

    fn with_headers<B>(
        mut builder: ureq::RequestBuilder<B>,
        headers: &[(String, String)],
    ) -> ureq::RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    fn send(
        builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
        body: Option<String>,
    ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        match body {
            Some(body) => builder.send(body.as_bytes()),
            None => builder.send_empty(),
        }
    }
}
