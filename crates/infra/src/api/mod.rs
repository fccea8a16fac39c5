//! Typed Medibook API facades
//!
//! [`MedibookClient`] wires the reqwest transport, the refresh endpoint and
//! the connectivity probe into one [`ApiClient`] and hands it to each
//! resource facade. Facades return decoded data; every error is an
//! [`ApiError`](medibook_domain::ApiError).

pub mod admin;
pub mod articles;
pub mod auth;
pub mod clinics;
pub mod comments;
pub mod users;

use std::sync::Arc;

use medibook_common::cache::{CacheConfig, TtlCache};
use medibook_core::{ApiClient, HttpTransport, TokenStore};
use medibook_domain::{Comment, Config, Result};
use tracing::info;

pub use admin::AdminApi;
pub use articles::ArticlesApi;
pub use auth::AuthApi;
pub use clinics::ClinicsApi;
pub use comments::CommentsApi;
pub use users::UsersApi;

use crate::auth::HttpTokenRefresher;
use crate::diagnostics::HttpConnectivityProbe;
use crate::http::ReqwestTransport;

/// Entry point bundling every resource facade over one shared client
#[derive(Clone)]
pub struct MedibookClient {
    client: Arc<ApiClient>,
    pub auth: AuthApi,
    pub users: UsersApi,
    pub articles: ArticlesApi,
    pub clinics: ClinicsApi,
    pub comments: CommentsApi,
    pub admin: AdminApi,
}

impl MedibookClient {
    /// Build the full stack from configuration
    pub fn from_config(config: &Config, store: Arc<dyn TokenStore>) -> Result<Self> {
        let transport: Arc<dyn HttpTransport> =
            Arc::new(ReqwestTransport::from_config(&config.api)?);
        let refresher = HttpTokenRefresher::new(Arc::clone(&transport))
            .with_path(config.auth.refresh_path.clone());
        let probe = HttpConnectivityProbe::new(&config.api.base_url)?;

        let client = ApiClient::builder()
            .transport(transport)
            .token_store(store)
            .refresher(Arc::new(refresher))
            .refresh_timeout(config.auth.refresh_timeout())
            .connectivity_probe(Arc::new(probe))
            .build()?;

        let cache =
            TtlCache::new(CacheConfig::new(config.cache.ttl(), config.cache.key_prefix.clone()));

        info!(base_url = %config.api.base_url, "Medibook client ready");
        Ok(Self::from_client(Arc::new(client), cache))
    }

    /// Facades over an already assembled client
    pub fn from_client(client: Arc<ApiClient>, comments_cache: TtlCache<Vec<Comment>>) -> Self {
        Self {
            auth: AuthApi::new(Arc::clone(&client)),
            users: UsersApi::new(Arc::clone(&client)),
            articles: ArticlesApi::new(Arc::clone(&client)),
            clinics: ClinicsApi::new(Arc::clone(&client)),
            comments: CommentsApi::new(Arc::clone(&client), comments_cache),
            admin: AdminApi::new(Arc::clone(&client)),
            client,
        }
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// End the session: clear stored credentials and cached comments
    pub async fn logout(&self) -> Result<()> {
        self.auth.logout().await?;
        self.comments.clear_cache();
        Ok(())
    }
}
