//! Single-flight token refresh
//!
//! However many requests hit a 401 at the same time, at most one refresh
//! call is in flight. The first caller runs the refresh; everyone arriving
//! while it runs is queued and receives the same outcome once it settles.
//!
//! The state lock is a `parking_lot::Mutex` and is never held across an
//! `.await`.

use std::sync::Arc;
use std::time::Duration;

use medibook_domain::constants::DEFAULT_REFRESH_TIMEOUT_SECS;
use medibook_domain::{ApiError, AuthError, Result};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, info, instrument, warn};

use super::ports::{TokenRefresher, TokenStore};

type Outcome = Result<String>;

/// Request parked until the in-flight refresh settles
type PendingRequest = oneshot::Sender<Outcome>;

#[derive(Default)]
struct RefreshState {
    is_refreshing: bool,
    pending: Vec<PendingRequest>,
}

/// Coordinates token refreshes so only one runs at a time
pub struct RefreshCoordinator {
    store: Arc<dyn TokenStore>,
    refresher: Arc<dyn TokenRefresher>,
    state: Mutex<RefreshState>,
    timeout: Duration,
}

impl RefreshCoordinator {
    /// Create a coordinator with the default refresh timeout
    pub fn new(store: Arc<dyn TokenStore>, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self {
            store,
            refresher,
            state: Mutex::new(RefreshState::default()),
            timeout: Duration::from_secs(DEFAULT_REFRESH_TIMEOUT_SECS),
        }
    }

    /// Bound on a single refresh call; waiters see `RefreshTimeout` past it
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.lock().is_refreshing
    }

    /// Number of requests parked behind the in-flight refresh
    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Obtain a freshly refreshed access token
    ///
    /// Starts a refresh if none is running, otherwise waits for the running
    /// one. Every caller that overlaps a refresh gets an identical result.
    ///
    /// # Errors
    /// - `AuthError::MissingRefreshToken` when the store holds no refresh token
    /// - `AuthError::RefreshRejected` / transport errors from the refresher
    /// - `AuthError::RefreshTimeout` when the refresher exceeds the timeout
    /// - `AuthError::Abandoned` when the refreshing task was cancelled
    pub async fn refreshed_token(&self) -> Result<String> {
        let waiter = {
            let mut state = self.state.lock();
            if state.is_refreshing {
                let (tx, rx) = oneshot::channel();
                state.pending.push(tx);
                Some(rx)
            } else {
                state.is_refreshing = true;
                None
            }
        };

        if let Some(rx) = waiter {
            debug!("Refresh in flight, queueing request");
            return rx.await.unwrap_or_else(|_| Err(AuthError::Abandoned.into()));
        }

        let guard = SettleGuard { state: &self.state, settled: false };
        let outcome = self.run_refresh().await;
        guard.settle(outcome.clone());
        outcome
    }

    #[instrument(skip(self), fields(timeout = ?self.timeout))]
    async fn run_refresh(&self) -> Outcome {
        let refresh_token =
            self.store.get_refresh_token().await?.ok_or(AuthError::MissingRefreshToken)?;

        let pair = match tokio::time::timeout(self.timeout, self.refresher.refresh(&refresh_token))
            .await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!("Token refresh timed out");
                return Err(AuthError::RefreshTimeout(self.timeout).into());
            }
        };

        self.store.save_token_pair(&pair).await?;

        info!(rotated = pair.refresh_token.is_some(), "Access token refreshed");
        Ok(pair.token)
    }
}

/// Clears the refreshing flag and releases waiters exactly once
///
/// If the leader is dropped mid-refresh the waiters are rejected with
/// `AuthError::Abandoned` instead of hanging.
struct SettleGuard<'a> {
    state: &'a Mutex<RefreshState>,
    settled: bool,
}

impl SettleGuard<'_> {
    fn settle(mut self, outcome: Outcome) {
        self.settled = true;
        release(self.state, &outcome);
    }
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Token refresh dropped before settling");
            release(self.state, &Err(ApiError::Auth(AuthError::Abandoned)));
        }
    }
}

fn release(state: &Mutex<RefreshState>, outcome: &Outcome) {
    let pending = {
        let mut state = state.lock();
        state.is_refreshing = false;
        std::mem::take(&mut state.pending)
    };

    debug!(waiters = pending.len(), success = outcome.is_ok(), "Refresh settled");
    for waiter in pending {
        // Receiver gone means that request was cancelled
        let _ = waiter.send(outcome.clone());
    }
}
