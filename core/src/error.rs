//! Error types for the console API client.
//!
//! # Design
//! The client does not interpret failure statuses: every non-2xx response
//! becomes `Status` carrying only the code, and the message is meant to be
//! shown to a user as-is. Transport and JSON failures are wrapped
//! transparently so their own messages surface unchanged.

/// Boxed error produced by a `Transport` implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `ApiClient` and `Console`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a status outside 200..=299.
    #[error("request failed: {status}")]
    Status { status: u16 },

    /// The request never produced a response.
    #[error(transparent)]
    Transport(TransportError),

    /// A success response body was not valid JSON, or did not match the
    /// expected shape.
    #[error(transparent)]
    Parse(#[from] serde_json::Error),

    /// A request payload could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(serde_json::Error),
}

impl ApiError {
    /// The HTTP status for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status } => Some(*status),
            _ => None,
        }
    }
}
