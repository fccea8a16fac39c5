//! Health article types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::http::{push_param, QueryParams};

/// Published article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}

/// Create/update payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInput {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Filters for article listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl QueryParams for ArticleQuery {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push_param(&mut params, "category", self.category.as_deref());
        push_param(&mut params, "search", self.search.as_deref());
        push_param(&mut params, "page", self.page);
        push_param(&mut params, "limit", self.limit);
        params
    }
}
