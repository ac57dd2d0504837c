//! Response and payload DTOs for the provisioning API.
//!
//! # Design
//! Defined independently from the mock-server crate; the integration tests
//! catch schema drift between the two.

use serde::{Deserialize, Serialize};

/// One entry of a service's login history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRecord {
    pub user: String,
    pub ip: String,
    pub timestamp: String,
}

/// `{"status": ...}` reply returned by the mutation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusReply {
    pub status: String,
}

/// Cloudflare resources backing a provisioned subdomain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Provision {
    pub tunnel_id: String,
    pub tunnel_token: String,
    pub dns_record_id: String,
    pub access_app_id: String,
}

/// Payload for recording a login against a service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginEvent {
    pub user: String,
    pub ip: String,
}

/// Payload proving ownership when deleting a service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteRequest {
    pub tunnel_token: String,
}
