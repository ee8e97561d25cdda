//! Appointments resource client

use std::sync::Arc;

use dentnotion_domain::{Appointment, NewAppointment};

use super::BulkDeleteError;
use crate::api::{ApiClient, ApiError, ListEnvelope};

/// Client for `/appointments/`
pub struct AppointmentsApi {
    client: Arc<ApiClient>,
}

impl AppointmentsApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetch all appointments; idempotent, safe to call again to refetch
    ///
    /// # Errors
    /// Returns error if the request fails
    pub async fn list(&self) -> Result<ListEnvelope<Appointment>, ApiError> {
        self.client.get_list("/appointments/", "Failed to fetch appointments").await
    }

    /// Fetch one appointment by id
    ///
    /// # Errors
    /// Returns error if the request fails or the appointment does not exist
    pub async fn get(&self, id: &str) -> Result<Appointment, ApiError> {
        self.client.get(&format!("/appointments/{id}/"), "Failed to fetch appointment").await
    }

    /// Create an appointment
    ///
    /// # Errors
    /// Returns error if the request fails or validation rejects the payload
    pub async fn create(&self, appointment: &NewAppointment) -> Result<Appointment, ApiError> {
        self.client.post("/appointments/", appointment, "Failed to create appointment").await
    }

    /// Replace an appointment
    ///
    /// # Errors
    /// Returns error if the request fails or validation rejects the payload
    pub async fn update(
        &self,
        id: &str,
        appointment: &NewAppointment,
    ) -> Result<Appointment, ApiError> {
        self.client
            .put(&format!("/appointments/{id}/"), appointment, "Failed to update appointment")
            .await
    }

    /// Delete an appointment
    ///
    /// # Errors
    /// Returns error if the request fails
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/appointments/{id}/"), "Failed to delete appointment").await
    }

    /// Delete several appointments, strictly one at a time
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
