//! Request interceptor

use medibook_domain::{ApiRequest, Result};

use crate::auth::ports::TokenStore;

/// Attach `Authorization: Bearer <token>` from the store
///
/// Without a stored token the request is sent as-is. A store failure is
/// returned so the request is never sent.
pub async fn attach_bearer(store: &dyn TokenStore, request: &mut ApiRequest) -> Result<()> {
    if let Some(token) = store.get_token().await? {
        request.set_bearer(&token);
    }
    Ok(())
}
