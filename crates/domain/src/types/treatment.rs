//! Treatment records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Treatment record as returned by the backend
///
/// `cost` is a decimal serialized as a string by the backend (must be
/// strictly positive server-side); it is carried verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub patient_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
    pub description: String,
    pub cost: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Payload for creating or replacing a treatment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTreatment {
    pub patient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
    pub description: String,
    pub cost: String,
    pub date: NaiveDate,
}

#[cfg(test)]
mod tests {
    //! Unit tests for types::treatment.
    use super::*;

    /// Validates a backend treatment payload parses with the stringified
    /// decimal cost.
    ///
    /// Assertions:
    /// - Confirms `cost` is carried verbatim as a string.
    /// - Confirms `appointment_id` may be absent.
    #[test]
    fn test_treatment_parses() {
        let treatment: Treatment = serde_json::from_str(
            r#"{
                "id": "t-1",
                "patient_id": "p-1",
                "patient_name": "Lina Haddad",
                "description": "Root canal",
                "cost": "250.00",
                "date": "2024-06-02"
            }"#,
        )
        .expect("treatment should parse");

        assert_eq!(treatment.cost, "250.00");
        assert!(treatment.appointment_id.is_none());
    }
}
