//! List response normalization
//!
//! The backend may answer a "get many" call with a bare array, a paginated
//! `{count, results}` object, or (on misconfiguration) something else
//! entirely. Every shape normalizes to one envelope so per-call shape
//! sniffing never reappears in resource code.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ApiError;

/// Normalized shape of any "get many" response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    /// Total item count; the server's explicit count when it reports one,
    /// otherwise the number of items returned
    pub count: u64,
    /// Items in server order
    pub results: Vec<T>,
}

impl<T> Default for ListEnvelope<T> {
    fn default() -> Self {
        Self { count: 0, results: Vec::new() }
    }
}

impl<T> ListEnvelope<T> {
    /// The empty envelope, used for absent or malformed payloads
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

impl ListEnvelope<Value> {
    /// Deserialize every item, converting the envelope to a typed one
    ///
    /// # Errors
    /// Returns `MalformedResponse` if any item fails to deserialize
    pub fn into_typed<T: DeserializeOwned>(self, url: &str) -> Result<ListEnvelope<T>, ApiError> {
        let mut results = Vec::with_capacity(self.results.len());
        for item in self.results {
            let typed = serde_json::from_value(item).map_err(|err| {
                ApiError::MalformedResponse { message: err.to_string(), url: url.to_string() }
            })?;
            results.push(typed);
        }
        Ok(ListEnvelope { count: self.count, results })
    }
}

/// Normalize an arbitrary list payload into the envelope shape
///
/// - An object with a `results` key keeps an explicitly reported positive
///   `count`; a zero, missing, or non-numeric count is recomputed from the
///   items. A non-array `results` value counts as no items.
/// - A bare array counts its items.
/// - Anything else (including null) is the empty envelope.
#[must_use]
pub fn normalize_list(data: Value) -> ListEnvelope<Value> {
    if let Value::Object(map) = &data {
        if map.contains_key("results") {
            let results = match map.get("results") {
                Some(Value::Array(items)) => items.clone(),
                _ => Vec::new(),
            };
            let count = match map.get("count").and_then(Value::as_u64) {
                Some(count) if count > 0 => count,
                _ => results.len() as u64,
            };
            return ListEnvelope { count, results };
        }
    }

    if let Value::Array(items) = data {
        return ListEnvelope { count: items.len() as u64, results: items };
    }

    ListEnvelope::empty()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_bare_array_counts_items() {
        let envelope = normalize_list(json!([{"id": "a"}, {"id": "b"}]));
        assert_eq!(envelope.count, 2);
        assert_eq!(envelope.results.len(), 2);
    }

    #[test]
    fn test_empty_array() {
        let envelope = normalize_list(json!([]));
        assert_eq!(envelope, ListEnvelope::empty());
    }

    #[test]
    fn test_paginated_object_without_count() {
        let envelope = normalize_list(json!({"results": [{"id": "a"}, {"id": "b"}]}));
        assert_eq!(envelope.count, 2);
        assert_eq!(envelope.results.len(), 2);
    }

    #[test]
    fn test_explicit_count_is_not_recomputed() {
        // A paginated page may carry fewer items than the total count
        let envelope = normalize_list(json!({"count": 5, "results": [{"id": "a"}, {"id": "b"}]}));
        assert_eq!(envelope.count, 5);
        assert_eq!(envelope.results.len(), 2);
    }

    #[test]
    fn test_zero_count_recounts_items() {
        let envelope = normalize_list(json!({"count": 0, "results": [{"id": "a"}]}));
        assert_eq!(envelope.count, 1);
    }

    #[test]
    fn test_null_and_scalar_payloads_are_empty() {
        assert_eq!(normalize_list(Value::Null), ListEnvelope::empty());
        assert_eq!(normalize_list(json!("oops")), ListEnvelope::empty());
        assert_eq!(normalize_list(json!({"detail": "error"})), ListEnvelope::empty());
    }

    #[test]
    fn test_non_array_results_value() {
        let envelope = normalize_list(json!({"results": null}));
        assert_eq!(envelope, ListEnvelope::empty());
    }

    #[test]
    fn test_into_typed_rejects_mismatched_items() {
        #[derive(Debug, Deserialize)]
        struct Item {
            #[allow(dead_code)]
            id: String,
        }

        let envelope = normalize_list(json!([{"id": "a"}, {"wrong": true}]));
        let result = envelope.into_typed::<Item>("http://localhost:8000/api/patients/");
        assert!(matches!(result, Err(ApiError::MalformedResponse { .. })));
    }
}
