//! Port interfaces for session credentials
//!
//! The client never touches storage or the refresh endpoint directly; it
//! goes through these traits so adapters can be swapped and mocked.

use async_trait::async_trait;
use medibook_domain::{Credentials, Result, TokenPair, User};

/// Durable store for the session's tokens and user payload
///
/// Reads return `Ok(None)` when nothing is stored. Errors are reserved for
/// storage failures and abort the request that triggered the read.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Current access token
    async fn get_token(&self) -> Result<Option<String>>;

    /// Current refresh token
    async fn get_refresh_token(&self) -> Result<Option<String>>;

    async fn save_token(&self, token: &str) -> Result<()>;

    async fn save_refresh_token(&self, refresh_token: &str) -> Result<()>;

    /// Persist a refresh result in one write
    ///
    /// The refresh token is replaced only when the pair carries a rotated
    /// one. Either both values land or neither does.
    async fn save_token_pair(&self, pair: &TokenPair) -> Result<()>;

    /// Persist both tokens (and expiry) in one write
    async fn save_credentials(&self, credentials: &Credentials) -> Result<()>;

    async fn get_user(&self) -> Result<Option<User>>;

    async fn save_user(&self, user: &User) -> Result<()>;

    /// Remove tokens and user payload (logout)
    async fn clear_user_data(&self) -> Result<()>;
}

/// Exchanges a refresh token for a new access token
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Call the refresh endpoint
    ///
    /// # Errors
    /// `ApiError::Auth(AuthError::RefreshRejected { .. })` when the server
    /// answers with a non-success status, or a transport error.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair>;
}
