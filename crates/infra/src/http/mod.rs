//! HTTP transport layer
//!
//! Reqwest wrapper with bounded per-call timeouts and transport failure
//! classification.

pub mod client;

// Re-export commonly used items
pub use client::{HttpClient, HttpClientBuilder};
