//! Admin panel endpoints

use std::sync::Arc;

use medibook_core::ApiClient;
use medibook_domain::{AdminStats, RequestConfig, Result, RoleUpdate, User, UserRole};
use serde_json::json;
use tracing::{info, instrument};
use urlencoding::encode;

/// `/admin` facade; the server enforces the admin role
#[derive(Clone)]
pub struct AdminApi {
    client: Arc<ApiClient>,
}

impl AdminApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<AdminStats> {
        Ok(self.client.get("/admin/stats", RequestConfig::new()).await?.into_data())
    }

    #[instrument(skip(self))]
    pub async fn set_user_role(&self, user_id: &str, role: UserRole) -> Result<User> {
        let path = format!("/admin/users/{}/role", encode(user_id));
        let user: User =
            self.client.put(&path, &RoleUpdate { role }, RequestConfig::new()).await?.into_data();

        info!(%role, "User role changed");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn block_user(&self, user_id: &str) -> Result<User> {
        let path = format!("/admin/users/{}/block", encode(user_id));
        Ok(self.client.post(&path, &json!({}), RequestConfig::new()).await?.into_data())
    }

    #[instrument(skip(self))]
    pub async fn unblock_user(&self, user_id: &str) -> Result<User> {
        let path = format!("/admin/users/{}/unblock", encode(user_id));
        Ok(self.client.post(&path, &json!({}), RequestConfig::new()).await?.into_data())
    }
}
