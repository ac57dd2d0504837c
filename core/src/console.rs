//! Typed operations behind each console screen.
//!
//! Every operation is one `ApiClient::request` call followed by decoding the
//! JSON value into a DTO. Service ids are inserted into the path verbatim.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::{ApiClient, RequestOptions};
use crate::config::ConfigProvider;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::{DeleteRequest, LoginEvent, LoginRecord, Provision, StatusReply};

/// Service id the console operates on when none is given.
pub const DEFAULT_SERVICE: &str = "default";

#[derive(Debug, Clone)]
pub struct Console<P, T> {
    client: ApiClient<P, T>,
}

impl<P: ConfigProvider, T: Transport> Console<P, T> {
    pub fn new(client: ApiClient<P, T>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient<P, T> {
        &self.client
    }

    /// `GET /history/{id}`: recorded logins, newest first as the server orders them.
    pub fn login_history(&self, id: &str) -> Result<Vec<LoginRecord>, ApiError> {
        self.call(&format!("/history/{id}"), RequestOptions::new())
    }

    /// `POST /rotate-key/{id}`
    pub fn rotate_key(&self, id: &str) -> Result<StatusReply, ApiError> {
        self.call(&format!("/rotate-key/{id}"), HttpMethod::Post.into())
    }

    /// `DELETE /provision/{id}`.
    ///
    /// The server may require the service's tunnel token as proof of
    /// ownership; without one the request carries no body.
    pub fn delete_service(
        &self,
        id: &str,
        tunnel_token: Option<&str>,
    ) -> Result<StatusReply, ApiError> {
        let mut options = RequestOptions::from(HttpMethod::Delete);
        if let Some(token) = tunnel_token {
            options = options.json(&DeleteRequest {
                tunnel_token: token.to_string(),
            })?;
        }
        self.call(&format!("/provision/{id}"), options)
    }

    /// `POST /record-login/{id}`
    pub fn record_login(&self, id: &str, event: &LoginEvent) -> Result<StatusReply, ApiError> {
        let options = RequestOptions::from(HttpMethod::Post).json(event)?;
        self.call(&format!("/record-login/{id}"), options)
    }

    /// `GET /provision/{id}`
    pub fn provision(&self, id: &str) -> Result<Provision, ApiError> {
        self.call(&format!("/provision/{id}"), RequestOptions::new())
    }

    fn call<R: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<R, ApiError> {
        let value: Value = self.client.request(path, options)?;
        Ok(serde_json::from_value(value)?)
    }
}
