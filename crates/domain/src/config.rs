//! Application configuration structures
//!
//! Plain data; loading lives in `dentnotion-infra::config`.

use serde::{Deserialize, Serialize};

/// Default backend base URL (dev backend on localhost).
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Default per-request timeout in seconds.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Default directory for the persisted session record.
pub const DEFAULT_STORAGE_DIR: &str = ".dentnotion";

/// Default guard-hint max-age in seconds (upper bound on how long the
/// pre-mount auth hint is honored without consulting the full session).
pub const DEFAULT_GUARD_HINT_MAX_AGE_SECS: u64 = 3600;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the REST backend (e.g. "http://localhost:8000/api")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), timeout_secs: default_timeout_secs() }
    }
}

/// Session persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted session record and guard hint
    #[serde(default = "default_storage_dir")]
    pub dir: String,

    /// Guard-hint max-age in seconds
    #[serde(default = "default_guard_hint_max_age")]
    pub guard_hint_max_age_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { dir: default_storage_dir(), guard_hint_max_age_secs: default_guard_hint_max_age() }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_API_TIMEOUT_SECS
}

fn default_storage_dir() -> String {
    DEFAULT_STORAGE_DIR.to_string()
}

fn default_guard_hint_max_age() -> u64 {
    DEFAULT_GUARD_HINT_MAX_AGE_SECS
}
