//! Shared fixtures for infra integration tests
#![allow(dead_code)]

use std::io;
use std::sync::Arc;

use medibook_domain::{Config, Credentials};
use medibook_infra::{MedibookClient, MemoryTokenStore};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tracing::subscriber::DefaultGuard;
use wiremock::MockServer;

/// Config pointing at a mock server
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.api.timeout_seconds = 5;
    config.auth.refresh_timeout_seconds = 5;
    config
}

/// Memory store holding a signed-in session
pub fn signed_in_store(token: &str, refresh_token: &str) -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_credentials(&Credentials::new(token, refresh_token)))
}

/// Facade stack over a mock server and the given store
pub fn client_for(server: &MockServer, store: Arc<MemoryTokenStore>) -> MedibookClient {
    MedibookClient::from_config(&config_for(server), store).expect("client should build")
}

pub fn user_json(id: &str, role: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{id}@medibook.test"),
        "firstName": "Ada",
        "lastName": "Lovelace",
        "role": role,
    })
}

pub fn comment_json(id: &str, article_id: &str, text: &str) -> Value {
    json!({
        "id": id,
        "articleId": article_id,
        "userId": "u1",
        "text": text,
        "createdAt": "2026-03-01T10:00:00Z",
    })
}

/// Log lines written while a capture guard is alive
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's tracing output (debug and up) into a buffer
pub fn capture_logs() -> (DefaultGuard, CapturedLogs) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (tracing::subscriber::set_default(subscriber), logs)
}
