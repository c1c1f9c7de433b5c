//! Error types for the admin console API client.
//!
//! # Design
//! `Unauthorized` is split out of `Http` because a 401/403 anywhere means the
//! session is gone: the client clears the credential and the top-level
//! failure handler redirects to the login screen. The `Display` text of both
//! HTTP variants is exactly the message extracted from the response body, so
//! it can be shown to the user unchanged.

use thiserror::Error;

/// Errors returned by `ApiClient` and everything layered on it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status other than 401/403.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The server answered 401 or 403; the stored credential has been cleared.
    #[error("{message}")]
    Unauthorized { status: u16, message: String },

    /// A 2xx body could not be parsed as JSON or as the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// An update or delete was attempted without an identifier.
    #[error("an identifier is required for this operation")]
    MissingId,

    /// A sign-in style response did not carry a token.
    #[error("response did not include a token")]
    MissingToken,

    /// The OTP entered was not six digits.
    #[error("enter all 6 digits of the OTP")]
    InvalidOtp,

    /// A multi-step flow was driven out of order.
    #[error("{0}")]
    FlowState(&'static str),

    /// The credential store could not be read or written.
    #[error("credential storage failed: {0}")]
    Storage(String),
}

impl ApiError {
    /// HTTP status carried by the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } | ApiError::Unauthorized { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
