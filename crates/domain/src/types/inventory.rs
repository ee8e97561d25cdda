//! Inventory records

use serde::{Deserialize, Serialize};

/// Stock level computed server-side from the quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryStatus {
    #[serde(rename = "In stock")]
    InStock,
    #[serde(rename = "Low stock")]
    LowStock,
    #[serde(rename = "Out of stock")]
    OutOfStock,
}

/// Inventory item as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub item: String,
    #[serde(default)]
    pub quantity: u32,
    pub status: InventoryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Payload for creating or replacing an inventory item
///
/// `status` is never sent; the backend derives it from the quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub item: String,
    #[serde(default)]
    pub quantity: u32,
}
