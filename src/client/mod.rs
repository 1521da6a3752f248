//! Backend Client
//!
//! HTTP access to the Health Stats REST API.
//!
//! Every call goes through [`ApiClient::request`], which attaches the
//! session token as a bearer credential and normalizes responses:
//!
//! - success with a JSON body: [`Payload::Json`]
//! - success with an empty body: [`Payload::NoContent`]
//! - body that is not JSON: [`ClientError::MalformedResponse`]
//! - error status: [`ClientError::RequestFailed`] with the server's message
//! - no response at all: [`ClientError::Network`]

mod error;
mod http;

pub use error::{ClientError, ClientResult, GENERIC_FAILURE_MESSAGE};
pub use http::{error_message, ApiClient, Payload};
