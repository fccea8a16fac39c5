//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Loads a `.env` file into the process environment when present
//! 2. Attempts to load from environment variables
//! 3. If `MEDIBOOK_API_BASE_URL` is missing, falls back to a config file
//! 4. Probes multiple paths for config files
//! 5. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `MEDIBOOK_API_BASE_URL`: API base URL (required for env loading)
//! - `MEDIBOOK_API_TIMEOUT_SECS`: Request timeout in seconds
//! - `MEDIBOOK_REFRESH_PATH`: Refresh endpoint path
//! - `MEDIBOOK_REFRESH_TIMEOUT_SECS`: Upper bound on one refresh call
//! - `MEDIBOOK_CACHE_TTL_SECS`: Comments cache TTL in seconds
//! - `MEDIBOOK_LOG_LEVEL`: Default log filter when `RUST_LOG` is unset
//! - `MEDIBOOK_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./medibook.json` or `./medibook.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use medibook_domain::{ApiError, Config, Result};
use url::Url;

use crate::errors::InfraError;

const BASE_URL_VAR: &str = "MEDIBOOK_API_BASE_URL";

/// Load configuration with automatic fallback strategy
///
/// Loads from environment variables when `MEDIBOOK_API_BASE_URL` is set;
/// otherwise falls back to a config file. A malformed variable is reported
/// as is and never triggers the fallback.
///
/// # Errors
/// Returns `ApiError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A value is malformed (bad number, bad URL)
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    if std::env::var_os(BASE_URL_VAR).is_none() {
        tracing::debug!("{BASE_URL_VAR} not set, loading configuration from file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// `MEDIBOOK_API_BASE_URL` is required; every other variable falls back to
/// its default.
///
/// # Errors
/// Returns `ApiError::Config` if the base URL is missing or a variable
/// has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.api.base_url = env_var(BASE_URL_VAR)?;
    if let Some(timeout) = env_parse::<u64>("MEDIBOOK_API_TIMEOUT_SECS")? {
        config.api.timeout_seconds = timeout;
    }
    if let Ok(path) = std::env::var("MEDIBOOK_REFRESH_PATH") {
        config.auth.refresh_path = path;
    }
    if let Some(timeout) = env_parse::<u64>("MEDIBOOK_REFRESH_TIMEOUT_SECS")? {
        config.auth.refresh_timeout_seconds = timeout;
    }
    if let Some(ttl) = env_parse::<u64>("MEDIBOOK_CACHE_TTL_SECS")? {
        config.cache.ttl_seconds = ttl;
    }
    if let Ok(level) = std::env::var("MEDIBOOK_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("MEDIBOOK_LOG_JSON", config.logging.json);

    validate(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ApiError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ApiError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ApiError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ApiError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path).and_then(validate)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| InfraError::from(e).into()),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ApiError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ApiError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Reject configurations the transport could not use
fn validate(config: Config) -> Result<Config> {
    let url = Url::parse(&config.api.base_url).map_err(|e| {
        ApiError::Config(format!("Invalid base URL '{}': {}", config.api.base_url, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::Config(format!("Unsupported base URL scheme: {}", url.scheme())));
    }
    if config.api.timeout_seconds == 0 {
        return Err(ApiError::Config("API timeout must be greater than zero".to_string()));
    }
    if config.auth.refresh_timeout_seconds == 0 {
        return Err(ApiError::Config("Refresh timeout must be greater than zero".to_string()));
    }
    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("medibook.json"),
        dir.join("medibook.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
    ]
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| ApiError::Config(format!("Missing required environment variable: {}", key)))
}

/// Parse an optional environment variable
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ApiError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 7] = [
        "MEDIBOOK_API_BASE_URL",
        "MEDIBOOK_API_TIMEOUT_SECS",
        "MEDIBOOK_REFRESH_PATH",
        "MEDIBOOK_REFRESH_TIMEOUT_SECS",
        "MEDIBOOK_CACHE_TTL_SECS",
        "MEDIBOOK_LOG_LEVEL",
        "MEDIBOOK_LOG_JSON",
    ];

    fn clear_vars() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("MEDIBOOK_TEST_BOOL_ON", "ON");
        std::env::set_var("MEDIBOOK_TEST_BOOL_OFF", "off");
        std::env::remove_var("MEDIBOOK_TEST_BOOL_MISSING");

        assert!(env_bool("MEDIBOOK_TEST_BOOL_ON", false));
        assert!(!env_bool("MEDIBOOK_TEST_BOOL_OFF", true));
        assert!(env_bool("MEDIBOOK_TEST_BOOL_MISSING", true));

        std::env::remove_var("MEDIBOOK_TEST_BOOL_ON");
        std::env::remove_var("MEDIBOOK_TEST_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_vars();

        std::env::set_var("MEDIBOOK_API_BASE_URL", "http://localhost:8080/api");
        std::env::set_var("MEDIBOOK_API_TIMEOUT_SECS", "10");
        std::env::set_var("MEDIBOOK_REFRESH_PATH", "/auth/token");
        std::env::set_var("MEDIBOOK_REFRESH_TIMEOUT_SECS", "15");
        std::env::set_var("MEDIBOOK_CACHE_TTL_SECS", "60");
        std::env::set_var("MEDIBOOK_LOG_LEVEL", "medibook=debug");
        std::env::set_var("MEDIBOOK_LOG_JSON", "true");

        let result = load_from_env();
        clear_vars();

        let config = result.expect("config from env");
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.api.timeout_seconds, 10);
        assert_eq!(config.auth.refresh_path, "/auth/token");
        assert_eq!(config.auth.refresh_timeout_seconds, 15);
        assert_eq!(config.cache.ttl_seconds, 60);
        assert_eq!(config.logging.level, "medibook=debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_from_env_missing_base_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_vars();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, ApiError::Config(msg) if msg.contains("MEDIBOOK_API_BASE_URL")));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_vars();

        std::env::set_var("MEDIBOOK_API_BASE_URL", "http://localhost:8080");
        std::env::set_var("MEDIBOOK_API_TIMEOUT_SECS", "soon");

        let result = load_from_env();
        clear_vars();

        assert!(matches!(result, Err(ApiError::Config(msg)) if msg.contains("TIMEOUT")));
    }

    #[test]
    fn test_load_reports_malformed_env_instead_of_falling_back() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_vars();

        std::env::set_var("MEDIBOOK_API_BASE_URL", "http://localhost:8080");
        std::env::set_var("MEDIBOOK_API_TIMEOUT_SECS", "soon");

        let result = load();
        clear_vars();

        match result {
            Err(ApiError::Config(msg)) => {
                assert!(msg.contains("MEDIBOOK_API_TIMEOUT_SECS"), "unexpected message: {msg}");
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_invalid_env_base_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_vars();

        std::env::set_var("MEDIBOOK_API_BASE_URL", "ftp://files.example.com");

        let result = load();
        clear_vars();

        assert!(matches!(result, Err(ApiError::Config(msg)) if msg.contains("scheme")));
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.api.base_url = "ftp://files.example.com".to_string();
        assert!(validate(config).is_err());

        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(validate(config).is_err());
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_content = r#"
[api]
base_url = "https://staging.medibook.app/api"
timeout_seconds = 12

[cache]
ttl_seconds = 120
"#;

        let config = parse_config(toml_content, Path::new("medibook.toml")).unwrap();
        assert_eq!(config.api.timeout_seconds, 12);
        assert_eq!(config.cache.ttl_seconds, 120);
        assert_eq!(config.cache.key_prefix, "comments_cache_");
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", Path::new("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(matches!(result, Err(ApiError::Config(_))));
    }
}
