//! Caller for the token refresh endpoint
//!
//! Goes straight to the transport, never through `ApiClient`, so a 401 from
//! the refresh endpoint cannot trigger another refresh.

use std::sync::Arc;

use async_trait::async_trait;
use medibook_core::{HttpTransport, TokenRefresher};
use medibook_domain::constants::REFRESH_PATH;
use medibook_domain::{
    ApiError, ApiRequest, AuthError, HttpMethod, RefreshTokenRequest, Result, TokenPair,
};
use tracing::{debug, instrument, warn};

/// `POST {base}/auth/refresh` with `{ "refreshToken": ... }`
pub struct HttpTokenRefresher {
    transport: Arc<dyn HttpTransport>,
    path: String,
}

impl HttpTokenRefresher {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport, path: REFRESH_PATH.to_string() }
    }

    /// Override the endpoint path (relative to the transport base URL)
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    #[instrument(skip(self, refresh_token), fields(path = %self.path))]
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let body = serde_json::to_value(RefreshTokenRequest { refresh_token })?;
        let request = ApiRequest::new(HttpMethod::Post, self.path.as_str()).with_body(body);

        let response = self.transport.send(&request).await?;
        if !response.is_success() {
            warn!(status = response.status, "Refresh endpoint rejected the refresh token");
            return Err(AuthError::RefreshRejected {
                status: response.status,
                body: response.text(),
            }
            .into());
        }

        let pair: TokenPair = response.json().map_err(|err| match err {
            ApiError::Serialization(msg) => ApiError::Auth(AuthError::RefreshFailed(msg)),
            other => other,
        })?;

        debug!(rotated = pair.refresh_token.is_some(), "Refresh endpoint returned a new token");
        Ok(pair)
    }
}
