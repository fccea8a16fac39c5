//! JSON file token store
//!
//! The whole session lives in one JSON document. Writes go to an owner-only
//! sibling temp file which is then renamed over the original, so a reader
//! sees either the old document or the new one.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use medibook_core::TokenStore;
use medibook_domain::{ApiError, Credentials, Result, TokenPair, User};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::StoredSession;
use crate::errors::InfraError;

/// Token store persisted to a JSON file
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session; a missing file is an empty session
    pub async fn load(&self) -> Result<StoredSession> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(StoredSession::default()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                warn!(path = %self.path.display(), error = %e, "Token file is corrupt");
                ApiError::Storage(format!("Corrupt token file {}: {e}", self.path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(StoredSession::default()),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    async fn update<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut StoredSession) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut session = self.load().await?;
        apply(&mut session);
        self.write(&session).await
    }

    async fn write(&self, session: &StoredSession) -> Result<()> {
        let json = serde_json::to_vec_pretty(session)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || persist_private(&path, &json))
            .await
            .map_err(|e| ApiError::Storage(format!("Token file writer failed: {e}")))??;

        debug!(path = %self.path.display(), "Token file written");
        Ok(())
    }
}

/// Write `json` to a sibling temp file and rename it over `path`
///
/// The temp file is created owner-only (0600 on unix), so the tokens are
/// never readable by other local users, not even briefly.
fn persist_private(path: &Path, json: &[u8]) -> Result<()> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.to_path_buf(),
        None => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(InfraError::from)?;

    let mut tmp = NamedTempFile::new_in(&parent).map_err(InfraError::from)?;
    tmp.write_all(json).map_err(InfraError::from)?;
    tmp.as_file().sync_all().map_err(InfraError::from)?;
    tmp.persist(path).map_err(|e| InfraError::from(e.error))?;
    Ok(())
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get_token(&self) -> Result<Option<String>> {
        Ok(self.load().await?.token)
    }

    async fn get_refresh_token(&self) -> Result<Option<String>> {
        Ok(self.load().await?.refresh_token)
    }

    async fn save_token(&self, token: &str) -> Result<()> {
        let token = token.to_string();
        self.update(move |session| session.token = Some(token)).await
    }

    async fn save_refresh_token(&self, refresh_token: &str) -> Result<()> {
        let refresh_token = refresh_token.to_string();
        self.update(move |session| session.refresh_token = Some(refresh_token)).await
    }

    async fn save_token_pair(&self, pair: &TokenPair) -> Result<()> {
        self.update(|session| session.apply_token_pair(pair)).await
    }

    async fn save_credentials(&self, credentials: &Credentials) -> Result<()> {
        self.update(|session| session.apply_credentials(credentials)).await
    }

    async fn get_user(&self) -> Result<Option<User>> {
        Ok(self.load().await?.user)
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        self.update(|session| session.user = Some(user.clone())).await
    }

    async fn clear_user_data(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }
}
