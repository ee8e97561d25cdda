//! Invoices resource client

use std::sync::Arc;

use dentnotion_domain::{Invoice, NewInvoice};

use super::BulkDeleteError;
use crate::api::{ApiClient, ApiError, ListEnvelope};

/// Client for `/invoices/`
pub struct InvoicesApi {
    client: Arc<ApiClient>,
}

impl InvoicesApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetch all invoices; idempotent, safe to call again to refetch
    ///
    /// # Errors
    /// Returns error if the request fails
    pub async fn list(&self) -> Result<ListEnvelope<Invoice>, ApiError> {
        self.client.get_list("/invoices/", "Failed to fetch invoices").await
    }

    /// Fetch one invoice by id
    ///
    /// # Errors
    /// Returns error if the request fails or the invoice does not exist
    pub async fn get(&self, id: &str) -> Result<Invoice, ApiError> {
        self.client.get(&format!("/invoices/{id}/"), "Failed to fetch invoice").await
    }

    /// Create an invoice
    ///
    /// # Errors
    /// Returns error if the request fails or validation rejects the payload
    pub async fn create(&self, invoice: &NewInvoice) -> Result<Invoice, ApiError> {
        self.client.post("/invoices/", invoice, "Failed to create invoice").await
    }

    /// Replace an invoice
    ///
    /// # Errors
    /// Returns error if the request fails or validation rejects the payload
    pub async fn update(&self, id: &str, invoice: &NewInvoice) -> Result<Invoice, ApiError> {
        self.client.put(&format!("/invoices/{id}/"), invoice, "Failed to update invoice").await
    }

    /// Delete an invoice
    ///
    /// # Errors
    /// Returns error if the request fails
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/invoices/{id}/"), "Failed to delete invoice").await
    }

    /// Delete several invoices, strictly one at a time
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
