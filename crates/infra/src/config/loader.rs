//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Loads a local `.env` file if present
//! 2. If any `DENTNOTION_*` variable is set, builds the config from the
//!    environment (unset variables keep their defaults)
//! 3. Otherwise probes for a config file (JSON or TOML)
//! 4. Falls back to the built-in defaults
//!
//! ## Environment Variables
//! - `DENTNOTION_API_URL`: Backend base URL
//! - `DENTNOTION_API_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `DENTNOTION_STORAGE_DIR`: Session storage directory
//! - `DENTNOTION_GUARD_HINT_MAX_AGE_SECS`: Guard-hint max-age in seconds
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./dentnotion.json` or `./dentnotion.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)

use std::path::{Path, PathBuf};

use dentnotion_domain::{Config, DentNotionError, Result};

const ENV_API_URL: &str = "DENTNOTION_API_URL";
const ENV_API_TIMEOUT: &str = "DENTNOTION_API_TIMEOUT_SECS";
const ENV_STORAGE_DIR: &str = "DENTNOTION_STORAGE_DIR";
const ENV_GUARD_HINT_MAX_AGE: &str = "DENTNOTION_GUARD_HINT_MAX_AGE_SECS";

const ENV_VARS: &[&str] =
    &[ENV_API_URL, ENV_API_TIMEOUT, ENV_STORAGE_DIR, ENV_GUARD_HINT_MAX_AGE];

/// Load configuration with automatic fallback strategy
///
/// Environment variables win over config files; with neither present the
/// built-in defaults are used.
///
/// # Errors
/// Returns `DentNotionError::Config` if a present source is malformed
pub fn load() -> Result<Config> {
    dotenvy::dotenv().ok();

    if ENV_VARS.iter().any(|var| std::env::var_os(var).is_some()) {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::debug!("No configuration source found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// Every variable is optional; unset variables keep their default value.
///
/// # Errors
/// Returns `DentNotionError::Config` if a set variable has an invalid value
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    if let Ok(base_url) = std::env::var(ENV_API_URL) {
        config.api.base_url = base_url;
    }
    if let Some(timeout) = env_u64(ENV_API_TIMEOUT)? {
        config.api.timeout_secs = timeout;
    }
    if let Ok(dir) = std::env::var(ENV_STORAGE_DIR) {
        config.storage.dir = dir;
    }
    if let Some(max_age) = env_u64(ENV_GUARD_HINT_MAX_AGE)? {
        config.storage.guard_hint_max_age_secs = max_age;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `DentNotionError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DentNotionError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DentNotionError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DentNotionError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DentNotionError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DentNotionError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(DentNotionError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("dentnotion.json"),
            cwd.join("dentnotion.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
        ]);
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Parse an optional u64 environment variable
fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|e| DentNotionError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_env_defaults_when_unset() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let config = load_from_env().expect("defaults should load");
        assert_eq!(config.api.base_url, dentnotion_domain::DEFAULT_API_BASE_URL);
        assert_eq!(config.api.timeout_secs, dentnotion_domain::DEFAULT_API_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_from_env_overrides() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_API_URL, "https://clinic.example/api");
        std::env::set_var(ENV_API_TIMEOUT, "20");
        std::env::set_var(ENV_GUARD_HINT_MAX_AGE, "600");

        let config = load_from_env().expect("env config should load");
        assert_eq!(config.api.base_url, "https://clinic.example/api");
        assert_eq!(config.api.timeout_secs, 20);
        assert_eq!(config.storage.guard_hint_max_age_secs, 600);
        // Unset variables keep their defaults
        assert_eq!(config.storage.dir, dentnotion_domain::DEFAULT_STORAGE_DIR);

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_API_TIMEOUT, "not-a-number");

        let result = load_from_env();
        assert!(result.is_err(), "Should fail with invalid timeout");

        let err = result.unwrap_err();
        assert!(matches!(err, DentNotionError::Config(_)), "Should be a Config error");

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{
            "api": {
                "base_url": "https://clinic.example/api",
                "timeout_secs": 15
            },
            "storage": {
                "dir": "/tmp/dentnotion-test",
                "guard_hint_max_age_secs": 1800
            }
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).expect("JSON config should load");
        assert_eq!(config.api.base_url, "https://clinic.example/api");
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.storage.guard_hint_max_age_secs, 1800);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
[api]
base_url = "https://clinic.example/api"
timeout_secs = 25

[storage]
dir = "/tmp/dentnotion-test"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).expect("TOML config should load");
        assert_eq!(config.api.timeout_secs, 25);
        // Omitted fields take their defaults
        assert_eq!(
            config.storage.guard_hint_max_age_secs,
            dentnotion_domain::DEFAULT_GUARD_HINT_MAX_AGE_SECS
        );

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(result.is_err(), "Should fail when file not found");

        let err = result.unwrap_err();
        assert!(matches!(err, DentNotionError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let invalid_json = r#"{ "this is": "not valid json" "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(invalid_json.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_err(), "Should fail with invalid JSON");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let content = "some content";
        let path = PathBuf::from("test.yaml");
        let result = parse_config(content, &path);
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
