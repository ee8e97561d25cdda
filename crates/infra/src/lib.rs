//! # DentNotion Infra
//!
//! Network and configuration infrastructure for the DentNotion client:
//! the resilient API client shared by every domain resource, the typed
//! resource clients themselves, dashboard aggregation, and configuration
//! loading.
//!
//! ## Architecture
//! - `http`: transport wrapper with per-call timeout and failure
//!   classification (no retries; refetch is an explicit caller operation)
//! - `api`: outcome normalization; every transport failure and non-2xx
//!   response becomes one typed [`api::ApiError`], list payloads become one
//!   [`api::ListEnvelope`] shape
//! - `resources`: thin typed clients for the domain resources
//! - `dashboard`: concurrent read aggregation
//! - `config`: environment/file configuration loading

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod api;
pub mod config;
pub mod dashboard;
pub mod http;
pub mod resources;

// Re-export commonly used types for convenience
pub use api::{
    AccessTokenProvider, ApiClient, ApiClientConfig, ApiError, ApiErrorKind, ListEnvelope,
};
pub use dashboard::DashboardStats;
pub use http::HttpClient;
pub use resources::{BulkDeleteError, DentNotion};
