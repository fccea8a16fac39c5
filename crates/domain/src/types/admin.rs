//! Admin panel types

use serde::{Deserialize, Serialize};

use super::user::UserRole;

/// Dashboard counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub users: u64,
    pub clinics: u64,
    pub articles: u64,
    pub appointments: u64,
}

/// Role change payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleUpdate {
    pub role: UserRole,
}
