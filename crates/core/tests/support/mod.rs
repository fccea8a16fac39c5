//! Shared test helpers for `medibook-core` integration tests.
//!
//! In-memory mocks for the client ports so pipeline tests can focus on
//! behaviour instead of wiring.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use medibook_core::{
    ApiClient, ConnectivityProbe, Diagnosis, HttpTransport, TokenRefresher, TokenStore,
};
use medibook_domain::{
    ApiError, ApiRequest, ApiResponse, Credentials, Result, TokenPair, User,
};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

/// In-memory `TokenStore` with optional forced failures.
#[derive(Default)]
pub struct MockTokenStore {
    pub token: Mutex<Option<String>>,
    pub refresh_token: Mutex<Option<String>>,
    pub user: Mutex<Option<User>>,
    pub fail_reads: Mutex<bool>,
    /// Fail `save_token_pair` without touching stored values
    pub fail_pair_writes: Mutex<bool>,
    /// Fail the standalone `save_refresh_token` write
    pub fail_refresh_writes: Mutex<bool>,
}

impl MockTokenStore {
    pub fn with_tokens(token: &str, refresh_token: Option<&str>) -> Arc<Self> {
        let store = Self::default();
        *store.token.lock() = Some(token.to_string());
        *store.refresh_token.lock() = refresh_token.map(str::to_string);
        Arc::new(store)
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().clone()
    }

    pub fn refresh(&self) -> Option<String> {
        self.refresh_token.lock().clone()
    }

    fn check(&self) -> Result<()> {
        if *self.fail_reads.lock() {
            return Err(ApiError::Storage("keystore locked".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenStore for MockTokenStore {
    async fn get_token(&self) -> Result<Option<String>> {
        self.check()?;
        Ok(self.token())
    }

    async fn get_refresh_token(&self) -> Result<Option<String>> {
        self.check()?;
        Ok(self.refresh())
    }

    async fn save_token(&self, token: &str) -> Result<()> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    async fn save_refresh_token(&self, refresh_token: &str) -> Result<()> {
        if *self.fail_refresh_writes.lock() {
            return Err(ApiError::Storage("disk full".to_string()));
        }
        *self.refresh_token.lock() = Some(refresh_token.to_string());
        Ok(())
    }

    async fn save_token_pair(&self, pair: &TokenPair) -> Result<()> {
        if *self.fail_pair_writes.lock() {
            return Err(ApiError::Storage("disk full".to_string()));
        }
        *self.token.lock() = Some(pair.token.clone());
        if let Some(rotated) = &pair.refresh_token {
            *self.refresh_token.lock() = Some(rotated.clone());
        }
        Ok(())
    }

    async fn save_credentials(&self, credentials: &Credentials) -> Result<()> {
        *self.token.lock() = Some(credentials.access_token.clone());
        *self.refresh_token.lock() = Some(credentials.refresh_token.clone());
        Ok(())
    }

    async fn get_user(&self) -> Result<Option<User>> {
        Ok(self.user.lock().clone())
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        *self.user.lock() = Some(user.clone());
        Ok(())
    }

    async fn clear_user_data(&self) -> Result<()> {
        *self.token.lock() = None;
        *self.refresh_token.lock() = None;
        *self.user.lock() = None;
        Ok(())
    }
}

/// Transport that accepts exactly one bearer token.
///
/// Requests carrying `valid_token` get `200 {"path": ...}`; everything else
/// gets a 401. Paths in `fixed_status` always answer with that status.
#[derive(Default)]
pub struct MockTransport {
    pub valid_token: Mutex<String>,
    pub fixed_status: Mutex<HashMap<String, u16>>,
    pub error: Mutex<Option<ApiError>>,
    pub calls: Mutex<Vec<ApiRequest>>,
    /// Token written into the store right before a 401 is returned
    pub rotate_on_401: Mutex<Option<(Arc<MockTokenStore>, String)>>,
}

impl MockTransport {
    pub fn accepting(token: &str) -> Arc<Self> {
        let transport = Self::default();
        *transport.valid_token.lock() = token.to_string();
        Arc::new(transport)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls_to(&self, path: &str) -> Vec<ApiRequest> {
        self.calls.lock().iter().filter(|request| request.path == path).cloned().collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.calls.lock().push(request.clone());

        if let Some(err) = self.error.lock().clone() {
            return Err(err);
        }
        if let Some(status) = self.fixed_status.lock().get(&request.path) {
            return Ok(ApiResponse::new(*status, r#"{"message":"fixed"}"#));
        }

        if request.bearer() == Some(self.valid_token.lock().as_str()) {
            let body = serde_json::json!({ "path": request.path, "body": request.body });
            return Ok(ApiResponse::new(200, body.to_string()));
        }

        if let Some((store, token)) = self.rotate_on_401.lock().take() {
            *store.token.lock() = Some(token);
        }
        Ok(ApiResponse::new(401, r#"{"message":"unauthorized"}"#))
    }
}

/// Refresher that holds every call until `release` is called.
pub struct MockRefresher {
    outcome: Result<TokenPair>,
    gate: Semaphore,
    calls: AtomicUsize,
}

impl MockRefresher {
    /// Refresher that returns immediately
    pub fn succeeding(token: &str, refresh_token: Option<&str>) -> Arc<Self> {
        let refresher = Self::gated(Ok(TokenPair {
            token: token.to_string(),
            refresh_token: refresh_token.map(str::to_string),
        }));
        refresher.release();
        Arc::new(refresher)
    }

    pub fn failing(err: ApiError) -> Arc<Self> {
        let refresher = Self::gated(Err(err));
        refresher.release();
        Arc::new(refresher)
    }

    /// Refresher that waits for `release` before returning `outcome`
    pub fn gated(outcome: Result<TokenPair>) -> Self {
        Self { outcome, gate: Semaphore::new(0), calls: AtomicUsize::new(0) }
    }

    pub fn release(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenRefresher for MockRefresher {
    async fn refresh(&self, _refresh_token: &str) -> Result<TokenPair> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| ApiError::Network("gate closed".to_string()))?;
        self.outcome.clone()
    }
}

/// Probe with a fixed answer.
pub struct StaticProbe(pub Diagnosis);

#[async_trait]
impl ConnectivityProbe for StaticProbe {
    async fn diagnose(&self) -> Diagnosis {
        self.0.clone()
    }
}

/// Build a client over the given mocks.
pub fn client(
    transport: &Arc<MockTransport>,
    store: &Arc<MockTokenStore>,
    refresher: &Arc<MockRefresher>,
) -> ApiClient {
    ApiClient::builder()
        .transport(transport.clone())
        .token_store(store.clone())
        .refresher(refresher.clone())
        .build()
        .expect("client should build")
}
