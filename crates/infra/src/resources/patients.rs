//! Patients resource client

use std::sync::Arc;

use dentnotion_domain::{NewPatient, Patient};

use super::BulkDeleteError;
use crate::api::{ApiClient, ApiError, ListEnvelope};

/// Client for `/patients/`
pub struct PatientsApi {
    client: Arc<ApiClient>,
}

impl PatientsApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetch all patients; idempotent, safe to call again to refetch
    ///
    /// # Errors
    /// Returns error if the request fails
    pub async fn list(&self) -> Result<ListEnvelope<Patient>, ApiError> {
        self.client.get_list("/patients/", "Failed to fetch patients").await
    }

    /// Fetch one patient by id
    ///
    /// # Errors
    /// Returns error if the request fails or the patient does not exist
    pub async fn get(&self, id: &str) -> Result<Patient, ApiError> {
        self.client.get(&format!("/patients/{id}/"), "Failed to fetch patient").await
    }

    /// Create a patient
    ///
    /// # Errors
    /// Returns error if the request fails or validation rejects the payload
    pub async fn create(&self, patient: &NewPatient) -> Result<Patient, ApiError> {
        self.client.post("/patients/", patient, "Failed to create patient").await
    }

    /// Replace a patient
    ///
    /// # Errors
    /// Returns error if the request fails or validation rejects the payload
    pub async fn update(&self, id: &str, patient: &NewPatient) -> Result<Patient, ApiError> {
        self.client.put(&format!("/patients/{id}/"), patient, "Failed to update patient").await
    }

    /// Delete a patient
    ///
    /// # Errors
    /// Returns error if the request fails
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/patients/{id}/"), "Failed to delete patient").await
    }

    /// Delete several patients, strictly one at a time
    ///
    /// # Errors
    /// Returns how far the sweep got when a deletion fails; no further
    /// deletes are issued after the failure
    pub async fn delete_many(&self, ids: &[String]) -> Result<usize, BulkDeleteError> {
        let mut deleted = 0;
        for id in ids {
            if let Err(source) = self.delete(id).await {
                return Err(BulkDeleteError { deleted, failed_id: id.clone(), source });
            }
            deleted += 1;
        }
        Ok(deleted)
    }
}
