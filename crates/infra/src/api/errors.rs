//! API-specific error types
//!
//! One failure shape for every network operation. Non-2xx responses keep
//! the parsed error body so validation details survive normalization.

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;

/// Failure classification for UI behavior decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Transport-level failure (DNS, connection refused, abort)
    NetworkUnreachable,
    /// The configured timeout elapsed and the request was aborted
    Timeout,
    /// The backend answered with a status outside 2xx
    HttpError,
    /// A success response carried a body that could not be parsed
    MalformedResponse,
    /// Client-side misconfiguration
    Config,
}

/// Normalized API operation error
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response; `message` is "{context}: {status} - {detail}"
    #[error("{message}")]
    Http { status: u16, message: String, url: String, detail: Option<serde_json::Value> },

    #[error("Request timed out after {timeout:?}. The backend server may be unresponsive or slow.")]
    Timeout { timeout: Duration, url: String },

    #[error("Network error: {message}")]
    Unreachable { message: String, url: String },

    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { message: String, url: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Structured field messages extracted from a validation failure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationMessages {
    /// Per-field messages keyed by field name
    pub field_errors: BTreeMap<String, Vec<String>>,
    /// Messages not tied to a specific field
    pub non_field_errors: Vec<String>,
}

impl ValidationMessages {
    /// Whether any message was extracted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }
}

impl ApiError {
    /// Get the failure kind for this error
    #[must_use]
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Self::Http { .. } => ApiErrorKind::HttpError,
            Self::Timeout { .. } => ApiErrorKind::Timeout,
            Self::Unreachable { .. } => ApiErrorKind::NetworkUnreachable,
            Self::MalformedResponse { .. } => ApiErrorKind::MalformedResponse,
            Self::Config(_) => ApiErrorKind::Config,
        }
    }

    /// HTTP status, when the backend answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// URL of the failed call, when one was issued
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Http { url, .. }
            | Self::Timeout { url, .. }
            | Self::Unreachable { url, .. }
            | Self::MalformedResponse { url, .. } => Some(url),
            Self::Config(_) => None,
        }
    }

    /// Whether the UI should offer a retry affordance
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self.kind(), ApiErrorKind::Timeout | ApiErrorKind::NetworkUnreachable)
    }

    /// Structured validation messages, for 400 responses whose body carried
    /// a `detail` payload; `None` for every other failure.
    #[must_use]
    pub fn validation_messages(&self) -> Option<ValidationMessages> {
        let Self::Http { status: 400, detail: Some(body), .. } = self else {
            return None;
        };

        let mut messages = ValidationMessages::default();
        match body.get("detail") {
            Some(serde_json::Value::Object(fields)) => {
                for (field, value) in fields {
                    messages.field_errors.insert(field.clone(), collect_messages(value));
                }
            }
            Some(serde_json::Value::Array(items)) => {
                for item in items {
                    messages.non_field_errors.extend(collect_messages(item));
                }
            }
            Some(serde_json::Value::String(text)) => {
                messages.non_field_errors.push(text.clone());
            }
            _ => return None,
        }

        (!messages.is_empty()).then_some(messages)
    }
}

fn collect_messages(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::String(text) => vec![text.clone()],
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect(),
        other => vec![other.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_error(status: u16, detail: Option<serde_json::Value>) -> ApiError {
        ApiError::Http {
            status,
            message: format!("Failed to create appointment: {status} - Validation error"),
            url: "http://localhost:8000/api/appointments/".to_string(),
            detail,
        }
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(http_error(500, None).kind(), ApiErrorKind::HttpError);
        assert_eq!(
            ApiError::Timeout {
                timeout: Duration::from_secs(10),
                url: "http://x".to_string()
            }
            .kind(),
            ApiErrorKind::Timeout
        );
        assert_eq!(
            ApiError::Unreachable { message: "down".to_string(), url: "http://x".to_string() }
                .kind(),
            ApiErrorKind::NetworkUnreachable
        );
        assert_eq!(ApiError::Config("bad".to_string()).kind(), ApiErrorKind::Config);
    }

    #[test]
    fn test_transient_errors() {
        assert!(ApiError::Timeout {
            timeout: Duration::from_secs(10),
            url: "http://x".to_string()
        }
        .is_transient());
        assert!(ApiError::Unreachable {
            message: "down".to_string(),
            url: "http://x".to_string()
        }
        .is_transient());
        assert!(!http_error(500, None).is_transient());
        assert!(!ApiError::Config("bad".to_string()).is_transient());
    }

    #[test]
    fn test_validation_messages_field_map() {
        let body = serde_json::json!({
            "error": "Validation error",
            "detail": {
                "email": ["This field is required."],
                "cost": ["Cost must be greater than 0"]
            },
            "error_code": "VALIDATION_ERROR"
        });

        let messages = http_error(400, Some(body)).validation_messages().unwrap();
        assert_eq!(
            messages.field_errors.get("email"),
            Some(&vec!["This field is required.".to_string()])
        );
        assert_eq!(
            messages.field_errors.get("cost"),
            Some(&vec!["Cost must be greater than 0".to_string()])
        );
        assert!(messages.non_field_errors.is_empty());
    }

    #[test]
    fn test_validation_messages_string_detail() {
        let body = serde_json::json!({ "detail": "Amount cannot be empty" });
        let messages = http_error(400, Some(body)).validation_messages().unwrap();
        assert_eq!(messages.non_field_errors, vec!["Amount cannot be empty".to_string()]);
    }

    #[test]
    fn test_validation_messages_absent_for_other_statuses() {
        let body = serde_json::json!({ "detail": { "email": ["bad"] } });
        assert!(http_error(404, Some(body)).validation_messages().is_none());
        assert!(http_error(400, None).validation_messages().is_none());
    }
}
