//! Patient X-ray image records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// X-ray image record as returned by the backend
///
/// `image_url` is a short-lived signed URL minted per response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XrayImage {
    pub id: String,
    pub patient_id: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_taken: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Metadata accepted alongside an upload or metadata update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewXray {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_taken: Option<NaiveDate>,
}
