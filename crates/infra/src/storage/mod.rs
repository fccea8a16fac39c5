//! Token store adapters
//!
//! Both stores keep the same [`StoredSession`] record so a session written
//! by one can be read back by the other in tests.

mod file;
mod memory;

use chrono::{DateTime, Utc};
use medibook_domain::{Credentials, TokenPair, User};
use serde::{Deserialize, Serialize};

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

/// Everything the client persists for one signed-in user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl StoredSession {
    fn apply_credentials(&mut self, credentials: &Credentials) {
        self.token = Some(credentials.access_token.clone());
        self.refresh_token = Some(credentials.refresh_token.clone());
        self.expires_at = credentials.expires_at;
    }

    fn apply_token_pair(&mut self, pair: &TokenPair) {
        self.token = Some(pair.token.clone());
        self.expires_at = None;
        if let Some(rotated) = &pair.refresh_token {
            self.refresh_token = Some(rotated.clone());
        }
    }

    /// Stored credentials, when both tokens are present
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.token, &self.refresh_token) {
            (Some(token), Some(refresh_token)) => Some(Credentials {
                access_token: token.clone(),
                refresh_token: refresh_token.clone(),
                expires_at: self.expires_at,
            }),
            _ => None,
        }
    }
}
