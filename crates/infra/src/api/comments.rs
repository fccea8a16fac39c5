//! Article comment endpoints with a TTL read cache
//!
//! Comment lists are cached per article. Creating or deleting a comment
//! drops that article's entry so the next read goes to the server.

use std::sync::Arc;

use medibook_common::cache::TtlCache;
use medibook_common::time::{Clock, SystemClock};
use medibook_core::ApiClient;
use medibook_domain::{Comment, NewComment, RequestConfig, Result};
use serde::de::IgnoredAny;
use tracing::{debug, instrument};
use urlencoding::encode;

/// `/articles/{id}/comments` facade
pub struct CommentsApi<C = SystemClock>
where
    C: Clock + Clone,
{
    client: Arc<ApiClient>,
    cache: TtlCache<Vec<Comment>, C>,
}

impl<C> CommentsApi<C>
where
    C: Clock + Clone,
{
    pub fn new(client: Arc<ApiClient>, cache: TtlCache<Vec<Comment>, C>) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &TtlCache<Vec<Comment>, C> {
        &self.cache
    }

    /// Comments of one article, served from cache while fresh
    #[instrument(skip(self))]
    pub async fn list(&self, article_id: &str) -> Result<Vec<Comment>> {
        if let Some(comments) = self.cache.get(article_id) {
            debug!(count = comments.len(), "Comments served from cache");
            return Ok(comments);
        }

        let path = comments_path(article_id);
        let comments: Vec<Comment> =
            self.client.get(&path, RequestConfig::new()).await?.into_data();

        self.cache.set(article_id, comments.clone());
        debug!(count = comments.len(), "Comments fetched");
        Ok(comments)
    }

    #[instrument(skip(self, comment))]
    pub async fn create(&self, article_id: &str, comment: &NewComment) -> Result<Comment> {
        let path = comments_path(article_id);
        let created: Comment =
            self.client.post(&path, comment, RequestConfig::new()).await?.into_data();

        self.cache.remove(article_id);
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, article_id: &str, comment_id: &str) -> Result<()> {
        let path = format!("{}/{}", comments_path(article_id), encode(comment_id));
        self.client.delete::<IgnoredAny>(&path, RequestConfig::new()).await?;

        self.cache.remove(article_id);
        Ok(())
    }

    /// Drop every cached comment list
    pub fn clear_cache(&self) -> usize {
        let removed = self.cache.clear();
        debug!(removed, "Comments cache cleared");
        removed
    }
}

impl<C> Clone for CommentsApi<C>
where
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self { client: Arc::clone(&self.client), cache: self.cache.clone() }
    }
}

fn comments_path(article_id: &str) -> String {
    format!("/articles/{}/comments", encode(article_id))
}
