//! Error types for token grants.

use serde::Deserialize;
use thiserror::Error;

/// Primary error type for all token endpoint operations.
#[derive(Error, Debug)]
pub enum RefreshError {
    /// No HTTP transport is configured; nothing was sent.
    #[error("HTTP transport unavailable")]
    TransportUnavailable,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    /// Non-2xx answer from the token endpoint (typed operations only).
    #[error("Token endpoint returned status {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RefreshError>;

/// Standard OAuth2 error body (RFC 6749 section 5.2).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthErrorBody {
    pub error: String,
    pub error_description: Option<String>,
    pub error_uri: Option<String>,
}

impl RefreshError {
    /// HTTP status of a [`RefreshError::Server`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parse the OAuth2 error fields out of a server error body, if present.
    pub fn oauth_error(&self) -> Option<OAuthErrorBody> {
        match self {
            Self::Server { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// Whether the endpoint rejected the grant itself (expired or revoked token).
    pub fn is_invalid_grant(&self) -> bool {
        self.oauth_error()
            .map(|body| body.error == "invalid_grant")
            .unwrap_or(false)
    }

    /// Whether this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Server { status, .. } => matches!(status, 429 | 500..=599),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for RefreshError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for RefreshError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for RefreshError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
