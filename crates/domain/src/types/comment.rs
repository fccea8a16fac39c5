//! Article comment types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment attached to an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub article_id: String,
    pub user_id: String,
    #[serde(default)]
    pub author_name: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// New comment payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewComment {
    pub text: String,
}
