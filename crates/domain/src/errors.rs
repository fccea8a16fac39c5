//! Error types used throughout the client
//!
//! Every failure the client can produce is one of these variants. Errors
//! are `Clone` so a single refresh outcome can be delivered to every request
//! that was waiting on it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad classification of an [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The request never produced an HTTP response
    Network,
    /// The server answered with a non-success status
    Http,
    /// Token refresh failed; the caller must re-authenticate
    Auth,
    /// Local failure (storage, serialization, configuration)
    Local,
}

/// Failures of the token refresh protocol
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum AuthError {
    #[error("No refresh token available")]
    MissingRefreshToken,

    #[error("Refresh rejected with status {status}: {body}")]
    RefreshRejected { status: u16, body: String },

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Token refresh timed out after {0:?}")]
    RefreshTimeout(Duration),

    #[error("Token refresh abandoned before completion")]
    Abandoned,
}

/// Main error type for Medibook API operations
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Connection error: {diagnosis}")]
    Connection { diagnosis: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::Connection { .. } => ErrorKind::Network,
            Self::Http { .. } => ErrorKind::Http,
            Self::Auth(_) => ErrorKind::Auth,
            Self::Storage(_) | Self::Serialization(_) | Self::Config(_) => ErrorKind::Local,
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a 401 that reached the caller (already retried once)
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// True when the session can no longer be recovered without a new login
    ///
    /// That is a 401 that survived the replay, a missing refresh token, or
    /// a refresh the server refused with a 4xx. Timeouts, abandoned
    /// refreshes and server-side failures leave the session intact.
    pub fn requires_reauthentication(&self) -> bool {
        match self {
            Self::Http { status: 401, .. } => true,
            Self::Auth(AuthError::MissingRefreshToken) => true,
            Self::Auth(AuthError::RefreshRejected { status, .. }) => (400..500).contains(status),
            _ => false,
        }
    }

    /// True for transport-level failures that never reached the server
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for Medibook operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(ApiError::Network("down".into()).kind(), ErrorKind::Network);
        assert_eq!(ApiError::Timeout(Duration::from_secs(1)).kind(), ErrorKind::Network);
        assert_eq!(
            ApiError::Connection { diagnosis: "server unreachable".into() }.kind(),
            ErrorKind::Network
        );
        assert_eq!(ApiError::Http { status: 500, body: String::new() }.kind(), ErrorKind::Http);
        assert_eq!(ApiError::Auth(AuthError::MissingRefreshToken).kind(), ErrorKind::Auth);
        assert_eq!(ApiError::Storage("io".into()).kind(), ErrorKind::Local);
    }

    #[test]
    fn test_reauthentication_required() {
        assert!(ApiError::Http { status: 401, body: String::new() }.requires_reauthentication());
        assert!(ApiError::Auth(AuthError::MissingRefreshToken).requires_reauthentication());
        assert!(ApiError::Auth(AuthError::RefreshRejected { status: 401, body: String::new() })
            .requires_reauthentication());
        assert!(!ApiError::Http { status: 403, body: String::new() }.requires_reauthentication());
        assert!(!ApiError::Network("reset".into()).requires_reauthentication());
    }

    #[test]
    fn test_transient_refresh_failures_keep_session() {
        assert!(!ApiError::Auth(AuthError::Abandoned).requires_reauthentication());
        assert!(!ApiError::Auth(AuthError::RefreshTimeout(Duration::from_secs(30)))
            .requires_reauthentication());
        assert!(!ApiError::Auth(AuthError::RefreshFailed("bad body".into()))
            .requires_reauthentication());
        assert!(!ApiError::Auth(AuthError::RefreshRejected { status: 503, body: String::new() })
            .requires_reauthentication());
    }

    #[test]
    fn test_auth_error_converts_into_api_error() {
        let err: ApiError =
            AuthError::RefreshRejected { status: 400, body: "expired".into() }.into();
        assert_eq!(
            err.to_string(),
            "Authentication error: Refresh rejected with status 400: expired"
        );
    }

    #[test]
    fn test_error_serializes_with_type_tag() {
        let json = serde_json::to_value(ApiError::Network("offline".into())).unwrap();
        assert_eq!(json["type"], "Network");
        assert_eq!(json["detail"], "offline");
    }
}
