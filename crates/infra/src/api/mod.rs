//! Resilient API call layer
//!
//! Turns every resource call (URL + method + body) into one normalized
//! outcome: success payloads are parsed JSON (lists through the envelope
//! normalizer), and every transport failure or non-2xx response surfaces as
//! exactly one typed [`ApiError`]; a raw exception never reaches callers.
//!
//! # Architecture
//!
//! - Uses the transport [`crate::http::HttpClient`] (no direct reqwest)
//! - Bearer credentials flow in through [`AccessTokenProvider`]
//! - Timeout on all external calls, overridable per call
//! - No automatic retry: refetch is an explicit caller operation

pub mod auth;
pub mod client;
pub mod envelope;
pub mod errors;

pub use auth::AccessTokenProvider;
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use envelope::{normalize_list, ListEnvelope};
pub use errors::{ApiError, ApiErrorKind, ValidationMessages};
