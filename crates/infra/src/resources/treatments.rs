//! Treatments resource client

use std::sync::Arc;

use dentnotion_domain::{NewTreatment, Treatment};

use super::BulkDeleteError;
use crate::api::{ApiClient, ApiError, ListEnvelope};

/// Client for `/treatments/`
pub struct TreatmentsApi {
    client: Arc<ApiClient>,
}

impl TreatmentsApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetch all treatments; idempotent, safe to call again to refetch
    ///
    /// # Errors
    /// Returns error if the request fails
    pub async fn list(&self) -> Result<ListEnvelope<Treatment>, ApiError> {
        self.client.get_list("/treatments/", "Failed to fetch treatments").await
    }

    /// Fetch one treatment by id
    ///
    /// # Errors
    /// Returns error if the request fails or the treatment does not exist
    pub async fn get(&self, id: &str) -> Result<Treatment, ApiError> {
        self.client.get(&format!("/treatments/{id}/"), "Failed to fetch treatment").await
    }

    /// Create a treatment
    ///
    /// # Errors
    /// Returns error if the request fails or validation rejects the payload
    pub async fn create(&self, treatment: &NewTreatment) -> Result<Treatment, ApiError> {
        self.client.post("/treatments/", treatment, "Failed to create treatment").await
    }

    /// Replace a treatment
    ///
    /// # Errors
    /// Returns error if the request fails or validation rejects the payload
    pub async fn update(&self, id: &str, treatment: &NewTreatment) -> Result<Treatment, ApiError> {
        self.client
            .put(&format!("/treatments/{id}/"), treatment, "Failed to update treatment")
            .await
    }

    /// Delete a treatment
    ///
    /// # Errors
    /// Returns error if the request fails
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/treatments/{id}/"), "Failed to delete treatment").await
    }

    /// Delete several treatments, strictly one at a time
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
