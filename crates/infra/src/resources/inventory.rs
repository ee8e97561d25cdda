//! Inventory resource client

use std::sync::Arc;

use dentnotion_domain::{InventoryItem, NewInventoryItem};
use serde_json::json;

use super::BulkDeleteError;
use crate::api::{ApiClient, ApiError, ListEnvelope};

/// Client for `/inventory/`
pub struct InventoryApi {
    client: Arc<ApiClient>,
}

impl InventoryApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetch all inventory items; idempotent, safe to call again to refetch
    ///
    /// # Errors
    /// Returns error if the request fails
    pub async fn list(&self) -> Result<ListEnvelope<InventoryItem>, ApiError> {
        self.client.get_list("/inventory/", "Failed to fetch inventory").await
    }

    /// Fetch one inventory item by id
    ///
    /// # Errors
    /// Returns error if the request fails or the item does not exist
    pub async fn get(&self, id: &str) -> Result<InventoryItem, ApiError> {
        self.client.get(&format!("/inventory/{id}/"), "Failed to fetch inventory item").await
    }

    /// Create an inventory item
    ///
    /// # Errors
    /// Returns error if the request fails or validation rejects the payload
    pub async fn create(&self, item: &NewInventoryItem) -> Result<InventoryItem, ApiError> {
        self.client.post("/inventory/", item, "Failed to create inventory item").await
    }

    /// Replace an inventory item
    ///
    /// # Errors
    /// Returns error if the request fails or validation rejects the payload
    pub async fn update(
        &self,
        id: &str,
        item: &NewInventoryItem,
    ) -> Result<InventoryItem, ApiError> {
        self.client.put(&format!("/inventory/{id}/"), item, "Failed to update inventory item").await
    }

    /// Delete an inventory item
    ///
    /// # Errors
    /// Returns error if the request fails
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("/inventory/{id}/"), "Failed to delete inventory item").await
    }

    /// Set the quantity of an item without replacing the whole record; the
    /// backend recomputes the stock status
    ///
    /// # Errors
    /// Returns error if the request fails or validation rejects the quantity
    pub async fn update_quantity(&self, id: &str, quantity: u32) -> Result<InventoryItem, ApiError> {
        self.client
            .post(
                &format!("/inventory/{id}/update_quantity/"),
                &json!({ "quantity": quantity }),
                "Failed to update inventory quantity",
            )
            .await
    }

    /// Fetch only the items that are low or out of stock
    ///
    /// # Errors
    /// Returns error if the request fails
    pub async fn low_stock(&self) -> Result<ListEnvelope<InventoryItem>, ApiError> {
        self.client.get_list("/inventory/low_stock/", "Failed to fetch low stock items").await
    }

    /// Delete several inventory items, strictly one at a time
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
