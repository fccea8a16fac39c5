//! Clinic directory endpoints

use std::sync::Arc;

use medibook_core::ApiClient;
use medibook_domain::{Clinic, ClinicQuery, Doctor, MedicalService, RequestConfig, Result};
use tracing::instrument;
use urlencoding::encode;

/// `/clinics` facade
#[derive(Clone)]
pub struct ClinicsApi {
    client: Arc<ApiClient>,
}

impl ClinicsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &ClinicQuery) -> Result<Vec<Clinic>> {
        Ok(self.client.get("/clinics", RequestConfig::with_params(query)).await?.into_data())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Clinic> {
        let path = format!("/clinics/{}", encode(id));
        Ok(self.client.get(&path, RequestConfig::new()).await?.into_data())
    }

    /// Services offered by one clinic
    #[instrument(skip(self))]
    pub async fn services(&self, id: &str) -> Result<Vec<MedicalService>> {
        let path = format!("/clinics/{}/services", encode(id));
        Ok(self.client.get(&path, RequestConfig::new()).await?.into_data())
    }

    /// Doctors practicing at one clinic
    #[instrument(skip(self))]
    pub async fn doctors(&self, id: &str) -> Result<Vec<Doctor>> {
        let path = format!("/clinics/{}/doctors", encode(id));
        Ok(self.client.get(&path, RequestConfig::new()).await?.into_data())
    }
}
