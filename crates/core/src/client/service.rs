//! API client with single-flight token refresh and request replay
//!
//! Every request gets the stored bearer token. A 401 triggers at most one
//! refresh (shared with any concurrent 401s) and one replay; a second 401
//! is returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use medibook_domain::{
    ApiError, ApiRequest, ApiResponse, HttpMethod, RequestConfig, Response, Result,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::interceptor::attach_bearer;
use super::ports::{ConnectivityProbe, Diagnosis, HttpTransport};
use crate::auth::ports::{TokenRefresher, TokenStore};
use crate::auth::RefreshCoordinator;

/// Authenticated API client
///
/// Cheap to share behind an `Arc`; all state lives in the injected ports and
/// the refresh coordinator.
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn TokenStore>,
    coordinator: Arc<RefreshCoordinator>,
    probe: Option<Arc<dyn ConnectivityProbe>>,
}

impl ApiClient {
    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }

    /// Execute a GET request
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the server answers with a
    /// non-success status, or the body cannot be decoded
    #[instrument(skip(self, config), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<Response<T>> {
        self.execute(ApiRequest::new(HttpMethod::Get, path).with_config(config)).await
    }

    /// Execute a POST request with a JSON body
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`], plus body serialization failures
    #[instrument(skip(self, body, config), fields(path = %path))]
    pub async fn post<B, T>(&self, path: &str, body: &B, config: RequestConfig) -> Result<Response<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.execute(ApiRequest::new(HttpMethod::Post, path).with_config(config).with_body(body))
            .await
    }

    /// Execute a PUT request with a JSON body
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::post`]
    #[instrument(skip(self, body, config), fields(path = %path))]
    pub async fn put<B, T>(&self, path: &str, body: &B, config: RequestConfig) -> Result<Response<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.execute(ApiRequest::new(HttpMethod::Put, path).with_config(config).with_body(body))
            .await
    }

    /// Execute a DELETE request
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`]
    #[instrument(skip(self, config), fields(path = %path))]
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<Response<T>> {
        self.execute(ApiRequest::new(HttpMethod::Delete, path).with_config(config)).await
    }

    /// Run a prepared request through the pipeline and decode the body
    ///
    /// # Errors
    ///
    /// See [`ApiClient::dispatch`]; decoding failures become
    /// `ApiError::Serialization`
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Response<T>> {
        let response = self.dispatch(request).await?;
        let data = response.json()?;
        Ok(Response { status: response.status, data })
    }

    /// Run a prepared request through the pipeline
    ///
    /// Returns the raw response only for 2xx statuses.
    ///
    /// # Errors
    ///
    /// - Token store failures (request is not sent)
    /// - Transport failures, possibly upgraded to `ApiError::Connection`
    /// - `ApiError::Http` for non-success statuses, including a 401 that
    ///   survived the replay
    /// - `ApiError::Auth` when the token refresh failed
    #[instrument(
        skip(self, request),
        fields(request_id = %request.id, method = %request.method, path = %request.path)
    )]
    pub async fn dispatch(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        attach_bearer(self.store.as_ref(), &mut request).await?;

        let response = self.send(&request).await?;
        if response.is_success() {
            return Ok(response);
        }
        if !response.is_unauthorized() {
            return Err(status_error(&response));
        }
        if request.retry {
            warn!("Unauthorized after replay, giving up");
            return Err(status_error(&response));
        }

        self.replay_unauthorized(request).await
    }

    async fn replay_unauthorized(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        let token = match self.store.get_token().await? {
            // Another refresh finished after this request was sent
            Some(stored) if request.bearer() != Some(stored.as_str()) => {
                debug!("Stored token changed since send, replaying without refresh");
                stored
            }
            _ => self.coordinator.refreshed_token().await?,
        };

        request.set_bearer(&token);
        request.retry = true;

        let response = self.send(&request).await?;
        if response.is_success() {
            info!(status = response.status, "Replay succeeded");
            Ok(response)
        } else {
            warn!(status = response.status, "Replay failed");
            Err(status_error(&response))
        }
    }

    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        match self.transport.send(request).await {
            Ok(response) => {
                debug!(status = response.status, retry = request.retry, "Response received");
                Ok(response)
            }
            Err(err) if err.is_transport() => Err(self.diagnose(err).await),
            Err(err) => Err(err),
        }
    }

    /// Upgrade a transport error when the server turns out to be unreachable
    async fn diagnose(&self, err: ApiError) -> ApiError {
        let Some(probe) = &self.probe else {
            return err;
        };

        match probe.diagnose().await {
            Diagnosis::Reachable => err,
            diagnosis @ Diagnosis::ServerUnreachable { .. } => {
                warn!(error = %err, %diagnosis, "Transport failure");
                ApiError::Connection { diagnosis: diagnosis.to_string() }
            }
        }
    }
}

fn status_error(response: &ApiResponse) -> ApiError {
    ApiError::Http { status: response.status, body: response.text() }
}

/// Builder for [`ApiClient`]
///
/// Either pass a shared [`RefreshCoordinator`] or a [`TokenRefresher`] from
/// which one is built over the same token store.
#[derive(Default)]
pub struct ApiClientBuilder {
    transport: Option<Arc<dyn HttpTransport>>,
    store: Option<Arc<dyn TokenStore>>,
    refresher: Option<Arc<dyn TokenRefresher>>,
    coordinator: Option<Arc<RefreshCoordinator>>,
    refresh_timeout: Option<Duration>,
    probe: Option<Arc<dyn ConnectivityProbe>>,
}

impl ApiClientBuilder {
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Use an existing coordinator (takes precedence over `refresher`)
    pub fn coordinator(mut self, coordinator: Arc<RefreshCoordinator>) -> Self {
        self.coordinator = Some(coordinator);
        self
    }

    pub fn refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = Some(timeout);
        self
    }

    pub fn connectivity_probe(mut self, probe: Arc<dyn ConnectivityProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the transport, token store, or both
    /// refresher and coordinator are missing
    pub fn build(self) -> Result<ApiClient> {
        let transport =
            self.transport.ok_or_else(|| ApiError::Config("Transport not set".to_string()))?;
        let store =
            self.store.ok_or_else(|| ApiError::Config("Token store not set".to_string()))?;

        let coordinator = match (self.coordinator, self.refresher) {
            (Some(coordinator), _) => coordinator,
            (None, Some(refresher)) => {
                let mut coordinator = RefreshCoordinator::new(Arc::clone(&store), refresher);
                if let Some(timeout) = self.refresh_timeout {
                    coordinator = coordinator.with_timeout(timeout);
                }
                Arc::new(coordinator)
            }
            (None, None) => {
                return Err(ApiError::Config("Token refresher not set".to_string()));
            }
        };

        Ok(ApiClient { transport, store, coordinator, probe: self.probe })
    }
}
