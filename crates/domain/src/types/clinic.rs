//! Clinic directory types

use serde::{Deserialize, Serialize};

use super::http::{push_param, QueryParams};

/// Clinic listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clinic {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
}

/// Service offered by a clinic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalService {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

/// Doctor practicing at a clinic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
}

/// Filters for the clinic directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClinicQuery {
    pub city: Option<String>,
    pub service: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl QueryParams for ClinicQuery {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push_param(&mut params, "city", self.city.as_deref());
        push_param(&mut params, "service", self.service.as_deref());
        push_param(&mut params, "search", self.search.as_deref());
        push_param(&mut params, "page", self.page);
        push_param(&mut params, "limit", self.limit);
        params
    }
}
