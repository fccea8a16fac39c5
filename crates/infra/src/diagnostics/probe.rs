//! Health-endpoint connectivity probe
//!
//! Consulted by the client after a transport failure to tell "the server is
//! down or unreachable" apart from a one-off network error.

use std::time::Duration;

use async_trait::async_trait;
use medibook_core::{ConnectivityProbe, Diagnosis, HttpTransport};
use medibook_domain::constants::{HEALTH_PATH, HEALTH_TIMEOUT_SECS};
use medibook_domain::{ApiError, ApiRequest, HttpMethod, Result};
use tracing::{info, instrument, warn};

use crate::http::ReqwestTransport;

/// Probe that issues `GET {base}/health` with a short timeout
pub struct HttpConnectivityProbe {
    transport: ReqwestTransport,
}

impl HttpConnectivityProbe {
    /// Probe against `base_url` with the default 5 second timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(HEALTH_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let transport = ReqwestTransport::builder().base_url(base_url).timeout(timeout).build()?;
        Ok(Self { transport })
    }
}

#[async_trait]
impl ConnectivityProbe for HttpConnectivityProbe {
    #[instrument(skip(self))]
    async fn diagnose(&self) -> Diagnosis {
        let request = ApiRequest::new(HttpMethod::Get, HEALTH_PATH);

        match self.transport.send(&request).await {
            Ok(response) if response.is_success() => {
                info!("API is healthy");
                Diagnosis::Reachable
            }
            Ok(response) => {
                warn!(status = response.status, "API returned non-success status");
                Diagnosis::ServerUnreachable {
                    reason: format!("health check returned status {}", response.status),
                }
            }
            Err(ApiError::Timeout(timeout)) => {
                warn!("Health check timeout");
                Diagnosis::ServerUnreachable {
                    reason: format!("health check timed out after {timeout:?}"),
                }
            }
            Err(err) => {
                warn!(error = %err, "Health check failed");
                Diagnosis::ServerUnreachable { reason: err.to_string() }
            }
        }
    }
}
