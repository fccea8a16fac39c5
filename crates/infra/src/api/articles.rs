//! Article endpoints

use std::sync::Arc;

use medibook_core::ApiClient;
use medibook_domain::{Article, ArticleInput, ArticleQuery, RequestConfig, Result};
use serde::de::IgnoredAny;
use tracing::{debug, instrument};
use urlencoding::encode;

/// `/articles` facade
#[derive(Clone)]
pub struct ArticlesApi {
    client: Arc<ApiClient>,
}

impl ArticlesApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &ArticleQuery) -> Result<Vec<Article>> {
        let articles: Vec<Article> =
            self.client.get("/articles", RequestConfig::with_params(query)).await?.into_data();

        debug!(count = articles.len(), "Articles listed");
        Ok(articles)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Article> {
        let path = format!("/articles/{}", encode(id));
        Ok(self.client.get(&path, RequestConfig::new()).await?.into_data())
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: &ArticleInput) -> Result<Article> {
        let article: Article =
            self.client.post("/articles", input, RequestConfig::new()).await?.into_data();

        debug!(article_id = %article.id, "Article created");
        Ok(article)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: &ArticleInput) -> Result<Article> {
        let path = format!("/articles/{}", encode(id));
        Ok(self.client.put(&path, input, RequestConfig::new()).await?.into_data())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = format!("/articles/{}", encode(id));
        self.client.delete::<IgnoredAny>(&path, RequestConfig::new()).await?;
        Ok(())
    }
}
