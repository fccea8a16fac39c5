//! User account types

use serde::{Deserialize, Serialize};

use super::http::{push_param, QueryParams};
use crate::impl_domain_status_conversions;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Patient,
    Doctor,
    Admin,
}

impl_domain_status_conversions!(UserRole {
    Patient => "patient",
    Doctor => "doctor",
    Admin => "admin",
});

/// User profile as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_blocked: bool,
}

/// Editable profile fields; unset fields are left unchanged server-side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Filters for user listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl QueryParams for UserFilter {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push_param(&mut params, "role", self.role);
        push_param(&mut params, "search", self.search.as_deref());
        push_param(&mut params, "page", self.page);
        push_param(&mut params, "limit", self.limit);
        params
    }
}
