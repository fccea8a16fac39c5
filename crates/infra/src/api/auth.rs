//! Login, registration and session endpoints
//!
//! Both credential calls are sent without the refresh step: a 401 here means
//! bad credentials, not an expired token.

use std::sync::Arc;

use medibook_core::{ApiClient, TokenStore};
use medibook_domain::{
    ApiRequest, AuthSession, HttpMethod, LoginRequest, RegisterRequest, Result, User,
};
use tracing::{info, instrument};

/// `/auth` facade
#[derive(Clone)]
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    fn store(&self) -> &Arc<dyn TokenStore> {
        self.client.token_store()
    }

    /// Exchange email and password for a session and persist it
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: &LoginRequest) -> Result<User> {
        let body = serde_json::to_value(request)?;
        self.open_session(ApiRequest::new(HttpMethod::Post, "/auth/login").with_body(body)).await
    }

    #[instrument(skip(self, request))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        let body = serde_json::to_value(request)?;
        self.open_session(ApiRequest::new(HttpMethod::Post, "/auth/register").with_body(body))
            .await
    }

    async fn open_session(&self, request: ApiRequest) -> Result<User> {
        let session: AuthSession =
            self.client.execute(request.without_refresh()).await?.into_data();

        self.store().save_credentials(&session.credentials()).await?;
        self.store().save_user(&session.user).await?;

        info!(user_id = %session.user.id, role = %session.user.role, "Session opened");
        Ok(session.user)
    }

    /// Forget tokens and the cached profile
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        self.store().clear_user_data().await?;
        info!("Session closed");
        Ok(())
    }

    /// Profile saved at login, if any
    pub async fn current_user(&self) -> Result<Option<User>> {
        self.store().get_user().await
    }

    pub async fn is_authenticated(&self) -> Result<bool> {
        Ok(self.store().get_token().await?.is_some())
    }
}
