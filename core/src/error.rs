//! Error types for the doable client.
//!
//! # Design
//! Every non-success HTTP status lands in `Status` with the numeric code and
//! the raw response body, so the notification text can show the server's own
//! message verbatim. Transport failures and timeouts are kept apart from
//! status errors but render the same way for the user.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by the request parser, the gateway and the configuration
/// layer. None of them is fatal: callers keep their previous state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a status other than the expected one.
    #[error("Error {status} - {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response (DNS, connection reset, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The request did not complete within the configured bound.
    #[error("request timed out after {}ms", after.as_millis())]
    Timeout { after: Duration },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A UI select value did not map to a filter mode or search field.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
}

impl ApiError {
    /// The HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_code_and_body() {
        let err = ApiError::Status {
            status: 500,
            body: "db down".to_string(),
        };
        assert_eq!(err.to_string(), "Error 500 - db down");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn timeout_displays_millis() {
        let err = ApiError::Timeout {
            after: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "request timed out after 1500ms");
        assert_eq!(err.status(), None);
    }
}
