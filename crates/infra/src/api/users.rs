//! User endpoints

use std::sync::Arc;

use medibook_core::ApiClient;
use medibook_domain::{RequestConfig, Result, UpdateUserRequest, User, UserFilter};
use serde::de::IgnoredAny;
use tracing::{debug, instrument};
use urlencoding::encode;

/// `/users` facade
#[derive(Clone)]
pub struct UsersApi {
    client: Arc<ApiClient>,
}

impl UsersApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Profile of the signed-in user
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<User> {
        Ok(self.client.get("/users/me", RequestConfig::new()).await?.into_data())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<User> {
        let path = format!("/users/{}", encode(id));
        Ok(self.client.get(&path, RequestConfig::new()).await?.into_data())
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let users: Vec<User> =
            self.client.get("/users", RequestConfig::with_params(filter)).await?.into_data();

        debug!(count = users.len(), "Users listed");
        Ok(users)
    }

    #[instrument(skip(self, update))]
    pub async fn update(&self, id: &str, update: &UpdateUserRequest) -> Result<User> {
        let path = format!("/users/{}", encode(id));
        Ok(self.client.put(&path, update, RequestConfig::new()).await?.into_data())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = format!("/users/{}", encode(id));
        self.client.delete::<IgnoredAny>(&path, RequestConfig::new()).await?;
        Ok(())
    }
}
