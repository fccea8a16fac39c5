//! Port interfaces for the network side of the client

use std::fmt;

use async_trait::async_trait;
use medibook_domain::{ApiRequest, ApiResponse, Result};

/// Sends one request and returns the raw response
///
/// Any HTTP status is a successful send. Errors are reserved for requests
/// that never produced a response (`Network`, `Timeout`).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// Outcome of a connectivity check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnosis {
    Reachable,
    ServerUnreachable { reason: String },
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reachable => f.write_str("server reachable"),
            Self::ServerUnreachable { reason } => write!(f, "server unreachable: {reason}"),
        }
    }
}

/// Best-effort check run after a transport failure
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn diagnose(&self) -> Diagnosis;
}
