//! Error types for the wxkit library.
//!
//! This module provides a unified error type with explicit variants for
//! remote (business-level) failures, transport failures, undecodable
//! responses, and local configuration mistakes.

use std::fmt;
use thiserror::Error;

/// The unified error type for wxkit operations.
///
/// Every failure raised while talking to the platform surfaces as one of these
/// variants; nothing is retried or swallowed on the way to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// The platform answered with a non-zero `errcode`.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Network transport errors (DNS, TLS, connection, timeout, HTTP status).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Local usage mistakes, raised before any network call.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl Error {
    /// Returns the remote error, if this is one.
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            Error::Remote(err) => Some(err),
            _ => None,
        }
    }
}

/// A business-level failure reported inside the platform's error envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// The `errcode` field of the response.
    pub code: i64,
    /// The `errmsg` field of the response (empty when absent).
    pub message: String,
}

impl RemoteError {
    /// Create a new remote error.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Check if this error means the access token is invalid, missing or expired.
    pub fn is_token_error(&self) -> bool {
        matches!(self.code, 40001 | 40014 | 41001 | 42001)
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for RemoteError {}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {0}")]
    Connection(#[source] reqwest::Error),

    /// Request timed out.
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    /// Generic HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err)
        } else if err.is_connect() {
            TransportError::Connection(err)
        } else if let Some(status) = err.status() {
            TransportError::Status {
                status: status.as_u16(),
            }
        } else {
            TransportError::Http(err)
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Response decoding errors.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body was not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The body was JSON but lacked a field the library relies on.
    #[error("unexpected response shape: {reason}")]
    Shape { reason: String },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(DecodeError::Json(err))
    }
}

/// Local configuration and usage errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The requested feature area does not exist.
    #[error("unknown service '{name}' (expected one of: Shake, Card)")]
    UnknownService { name: String },

    /// Neither a device id nor a complete uuid/major/minor triple was given.
    #[error("a device id or a complete uuid/major/minor triple is required")]
    MissingDeviceIdentifier,

    /// Both identifier shapes were given.
    #[error("a device id and a uuid/major/minor triple are mutually exclusive")]
    AmbiguousDeviceIdentifier,

    /// The beacon uuid is malformed.
    #[error("invalid beacon uuid '{value}': {reason}")]
    InvalidUuid { value: String, reason: String },

    /// The API base URL is malformed.
    #[error("invalid base URL '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },

    /// The account credentials are malformed.
    #[error("invalid credentials: {reason}")]
    InvalidCredentials { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_display_matches_envelope() {
        let err = RemoteError::new(40001, "invalid credential");
        assert_eq!(err.to_string(), "40001: invalid credential");
    }

    #[test]
    fn token_error_codes() {
        assert!(RemoteError::new(40001, "").is_token_error());
        assert!(RemoteError::new(42001, "").is_token_error());
        assert!(!RemoteError::new(9001001, "").is_token_error());
    }

    #[test]
    fn as_remote_only_matches_remote() {
        let err: Error = RemoteError::new(1, "x").into();
        assert_eq!(err.as_remote().map(|e| e.code), Some(1));

        let err: Error = ConfigurationError::MissingDeviceIdentifier.into();
        assert!(err.as_remote().is_none());
    }
}
