//! In-process token store

use async_trait::async_trait;
use medibook_core::TokenStore;
use medibook_domain::{Credentials, Result, TokenPair, User};
use parking_lot::RwLock;

use super::StoredSession;

/// Token store that lives for the lifetime of the process
///
/// Each operation takes the lock once, so readers never see a token from
/// one write paired with a refresh token from another.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: RwLock<StoredSession>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with credentials
    pub fn with_credentials(credentials: &Credentials) -> Self {
        let mut session = StoredSession::default();
        session.apply_credentials(credentials);
        Self { session: RwLock::new(session) }
    }

    /// Copy of the whole stored record
    pub fn snapshot(&self) -> StoredSession {
        self.session.read().clone()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get_token(&self) -> Result<Option<String>> {
        Ok(self.session.read().token.clone())
    }

    async fn get_refresh_token(&self) -> Result<Option<String>> {
        Ok(self.session.read().refresh_token.clone())
    }

    async fn save_token(&self, token: &str) -> Result<()> {
        self.session.write().token = Some(token.to_string());
        Ok(())
    }

    async fn save_refresh_token(&self, refresh_token: &str) -> Result<()> {
        self.session.write().refresh_token = Some(refresh_token.to_string());
        Ok(())
    }

    async fn save_token_pair(&self, pair: &TokenPair) -> Result<()> {
        self.session.write().apply_token_pair(pair);
        Ok(())
    }

    async fn save_credentials(&self, credentials: &Credentials) -> Result<()> {
        self.session.write().apply_credentials(credentials);
        Ok(())
    }

    async fn get_user(&self) -> Result<Option<User>> {
        Ok(self.session.read().user.clone())
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        self.session.write().user = Some(user.clone());
        Ok(())
    }

    async fn clear_user_data(&self) -> Result<()> {
        *self.session.write() = StoredSession::default();
        Ok(())
    }
}
