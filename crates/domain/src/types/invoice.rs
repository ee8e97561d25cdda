//! Invoice records

use serde::{Deserialize, Serialize};

/// Invoice payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Paid,
    #[default]
    Unpaid,
}

/// Invoice record as returned by the backend
///
/// `patient_name` and `treatment_description` are denormalized server-side
/// and read-only. `amount` is a decimal serialized as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub patient_name: String,
    pub treatment_id: String,
    #[serde(default)]
    pub treatment_description: String,
    pub amount: String,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Invoice {
    /// Numeric amount for aggregation; unparsable amounts count as zero,
    /// matching how the original dashboard summed them.
    #[must_use]
    pub fn amount_value(&self) -> f64 {
        self.amount.parse().unwrap_or(0.0)
    }
}

/// Payload for creating or replacing an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub patient_id: String,
    pub treatment_id: String,
    pub amount: String,
    #[serde(default)]
    pub status: InvoiceStatus,
}

#[cfg(test)]
mod tests {
    //! Unit tests for types::invoice.
    use super::*;

    /// Validates the invoice status default and amount parsing.
    ///
    /// Assertions:
    /// - Confirms the default status is `Unpaid`.
    /// - Confirms `amount_value` parses the decimal string.
    /// - Confirms an unparsable amount counts as zero.
    #[test]
    fn test_invoice_amount_value() {
        let mut invoice: Invoice = serde_json::from_str(
            r#"{
                "id": "i-1",
                "patient_id": "p-1",
                "treatment_id": "t-1",
                "amount": "120.50"
            }"#,
        )
        .expect("invoice should parse");

        assert_eq!(invoice.status, InvoiceStatus::Unpaid);
        assert!((invoice.amount_value() - 120.5).abs() < f64::EPSILON);

        invoice.amount = "not-a-number".to_string();
        assert_eq!(invoice.amount_value(), 0.0);
    }
}
