//! Client core for the sshclaude provisioning API.
//!
//! # Overview
//! `ApiClient` is the request helper: it appends a path to the configured
//! base URL, injects `Authorization: Bearer <token>` and
//! `Content-Type: application/json`, sends the request through a
//! `Transport`, and returns the JSON body or an `ApiError` carrying the
//! failing status. `Console` layers the typed screen operations (login
//! history, key rotation, service deletion) on top.
//!
//! # Design
//! - Configuration comes from a `ConfigProvider` consulted on every call.
//! - Request building and response parsing are pure; only `Transport`
//!   performs I/O (host-does-IO), so both halves are testable offline.
//! - No retries, caching, or timeouts: one transport call per request.

pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{ApiClient, HeaderMerge, RequestOptions};
pub use config::{ConfigProvider, EnvConfig, RequestConfig};
pub use console::{Console, DEFAULT_SERVICE};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{DeleteRequest, LoginEvent, LoginRecord, Provision, StatusReply};
