//! X-ray images resource client
//!
//! Uploads go as multipart form data with a longer timeout than ordinary
//! calls; the browser-era 30-second allowance for file transfers is kept.

use std::sync::Arc;
use std::time::Duration;

use dentnotion_domain::{NewXray, XrayImage};
use reqwest::multipart::{Form, Part};

use crate::api::{ApiClient, ApiError, ListEnvelope};

/// Timeout for image uploads
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for `/xrays/`
pub struct XraysApi {
    client: Arc<ApiClient>,
}

impl XraysApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetch all X-ray images of one patient; idempotent refetch
    ///
    /// # Errors
    /// Returns error if the request fails
    pub async fn list_for_patient(
        &self,
        patient_id: &str,
    ) -> Result<ListEnvelope<XrayImage>, ApiError> {
        self.client
            .get_list_with_query(
                "/xrays/",
                &[("patient_id", patient_id)],
                "Failed to fetch patient X-rays",
            )
            .await
    }

    /// Fetch one X-ray image by id
    ///
    /// # Errors
    /// Returns error if the request fails or the image does not exist
    pub async fn get(&self, id: &str) -> Result<XrayImage, ApiError> {
        self.client.get(&format!("/xrays/{id}/"), "Failed to fetch X-ray").await
    }

    /// Upload a new X-ray image for a patient
    ///
    /// Sends `patient_id` and `file` as multipart parts; the optional
    /// metadata parts are attached only when present.
    ///
    /// # Errors
    /// Returns error if the upload fails or validation rejects the payload
    pub async fn upload(
        &self,
        patient_id: &str,
        file_name: &str,
        file: Vec<u8>,
        metadata: &NewXray,
    ) -> Result<XrayImage, ApiError> {
        let mut form = Form::new()
            .text("patient_id", patient_id.to_string())
            .part("file", Part::bytes(file).file_name(file_name.to_string()));

        if let Some(description) = &metadata.description {
            form = form.text("description", description.clone());
        }
        if let Some(date_taken) = &metadata.date_taken {
            form = form.text("date_taken", date_taken.to_string());
        }

        self.client
            .post_multipart("/xrays/", form, UPLOAD_TIMEOUT, "Failed to upload X-ray")
            .await
    }

    /// Update the metadata of an existing image
    ///
    /// # Errors
    /// Returns error if the request fails or validation rejects the payload
    pub async fn update(&self, id: &str, metadata: &NewXray) -> Result<XrayImage, ApiError> {
        self.client.put(&format!("/xrays/{id}/"), metadata, "Failed to update X-ray").await
    }

    /// Delete an X-ray image
    ///
    /// # Errors
    /// Returns error if the request fails
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/xrays/{id}/"), "Failed to delete X-ray").await
    }
}
