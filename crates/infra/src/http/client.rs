use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use medibook_core::HttpTransport;
use medibook_domain::constants::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use medibook_domain::{ApiConfig, ApiError, ApiRequest, ApiResponse, HttpMethod, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder};
use tracing::debug;
use url::Url;

use crate::errors::InfraError;

/// HTTP transport over reqwest with timeout and bounded retry.
///
/// Only requests that never produced a response are retried, and a timeout
/// is retried only for GET and DELETE. Every HTTP status, 5xx included, is
/// handed back to the client pipeline unchanged.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
}

impl ReqwestTransport {
    /// Start building a new transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Transport configured from the `[api]` section.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::builder()
            .base_url(&config.base_url)
            .timeout(config.timeout())
            .max_attempts(config.max_attempts)
            .user_agent(&config.user_agent)
            .build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for an API path (`/users` under `https://host/api`).
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let joined = if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        };
        Url::parse(&joined).map_err(|e| ApiError::Config(format!("Invalid request URL {joined}: {e}")))
    }

    fn build_request(&self, request: &ApiRequest) -> Result<RequestBuilder> {
        let url = self.url_for(&request.path)?;
        let mut builder = self.client.request(method_for(request.method), url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        Ok(builder)
    }

    fn map_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            return ApiError::Timeout(self.timeout);
        }
        InfraError::from(err).into()
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    async fn read_response(&self, response: reqwest::Response) -> Result<ApiResponse> {
        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(|err| self.map_error(err))?;

        Ok(ApiResponse { status, headers, body: body.to_vec() })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let attempts = self.max_attempts.max(1);

        for attempt in 0..attempts {
            let built = self
                .build_request(request)?
                .build()
                .map_err(|err| ApiError::from(InfraError::from(err)))?;

            let method = built.method().clone();
            let url = built.url().clone();
            debug!(
                attempt = attempt + 1,
                request_id = %request.id,
                %method,
                %url,
                "sending HTTP request"
            );

            match self.client.execute(built).await {
                Ok(response) => {
                    debug!(
                        attempt = attempt + 1,
                        request_id = %request.id,
                        status = response.status().as_u16(),
                        "received HTTP response"
                    );
                    return self.read_response(response).await;
                }
                Err(err) => {
                    debug!(
                        attempt = attempt + 1,
                        %method,
                        %url,
                        error = %err,
                        "HTTP request failed"
                    );

                    if attempt + 1 < attempts && should_retry_error(&err, request.method) {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return Err(self.map_error(err));
                }
            }
        }

        Err(ApiError::Network("http transport exhausted retries without producing a result".into()))
    }
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug)]
pub struct ReqwestTransportBuilder {
    base_url: String,
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: 1,
            base_backoff: Duration::from_millis(200),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl ReqwestTransportBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<ReqwestTransport> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Config(format!("Invalid base URL {}: {e}", self.base_url)))?;

        let mut headers = self.default_headers.unwrap_or_default();
        headers.entry(ACCEPT).or_insert(HeaderValue::from_static("application/json"));

        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .no_proxy()
            .user_agent(self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()))
            .default_headers(headers)
            .build()
            .map_err(|err| ApiError::from(InfraError::from(err)))?;

        Ok(ReqwestTransport {
            client,
            base_url,
            timeout: self.timeout,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

fn method_for(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Whether a failed attempt may be sent again
///
/// A connect failure never reached the server, so any method is safe to
/// resend. A timeout may have been processed already; only GET and DELETE
/// are resent after one.
fn should_retry_error(err: &reqwest::Error, method: HttpMethod) -> bool {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if err.is_connect() {
            return true;
        }
    }
    err.is_timeout() && is_idempotent(method)
}

fn is_idempotent(method: HttpMethod) -> bool {
    matches!(method, HttpMethod::Get | HttpMethod::Delete)
}
