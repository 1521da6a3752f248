//! Session error types
//!
//! Transport errors never reach the caller bare: login and registration
//! wrap them with the operation that failed and a message fit for a form.

use thiserror::Error;

use super::store::StoreError;
use crate::client::ClientError;

/// Why an auth operation failed
#[derive(Error, Debug)]
pub enum AuthFailure {
    /// The backend call itself failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Well-formed response missing the token or the profile
    #[error("Invalid auth response: {0}")]
    InvalidAuthResponse(String),

    /// The token could not be persisted
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthFailure {
    /// Backend message when there is one, otherwise the failure's own text
    pub fn user_message(&self) -> String {
        match self {
            AuthFailure::Client(ClientError::RequestFailed { message, .. }) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Errors surfaced by the session manager
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{message}")]
    LoginFailed {
        message: String,
        #[source]
        cause: AuthFailure,
    },

    #[error("{message}")]
    RegistrationFailed {
        message: String,
        #[source]
        cause: AuthFailure,
    },

    #[error("Failed to clear session: {0}")]
    Logout(#[source] StoreError),
}

impl AuthError {
    pub(crate) fn login(cause: AuthFailure) -> Self {
        AuthError::LoginFailed {
            message: cause.user_message(),
            cause,
        }
    }

    pub(crate) fn registration(cause: AuthFailure) -> Self {
        AuthError::RegistrationFailed {
            message: cause.user_message(),
            cause,
        }
    }

    /// The underlying failure for login and registration errors
    pub fn cause(&self) -> Option<&AuthFailure> {
        match self {
            AuthError::LoginFailed { cause, .. } | AuthError::RegistrationFailed { cause, .. } => {
                Some(cause)
            }
            AuthError::Logout(_) => None,
        }
    }

    pub fn is_invalid_response(&self) -> bool {
        matches!(self.cause(), Some(AuthFailure::InvalidAuthResponse(_)))
    }
}

/// Result type alias for session operations
pub type AuthResult<T> = Result<T, AuthError>;
