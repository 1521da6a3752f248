//! HTTP client error types

use thiserror::Error;

use crate::session::StoreError;

/// Message used when a failed response carries no error text
pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed";

/// Errors produced by the API client
#[derive(Error, Debug)]
pub enum ClientError {
    /// No response was received (connection refused, DNS, timeout, dropped body)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The response body was not valid JSON, or not the expected shape
    #[error("Invalid response from server: {0}")]
    MalformedResponse(String),

    /// The server answered with a non-success status
    #[error("{message} (HTTP {status})")]
    RequestFailed { status: u16, message: String },

    /// The session token could not be read
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClientError {
    /// HTTP status for server-side failures
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-supplied message for server-side failures
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::RequestFailed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Whether the server rejected the session credential
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
