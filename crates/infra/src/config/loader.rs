//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Whatever the source, the result is validated before it is returned.
//!
//! ## Environment Variables
//! - `DIRGRAPH_BASE_URL`: Service root (default `https://graph.windows.net`)
//! - `DIRGRAPH_TENANT`: Tenant segment (required)
//! - `DIRGRAPH_ACCESS_TOKEN`: Bearer token (required)
//! - `DIRGRAPH_NEXT_LINK_FIELD`: Continuation link field name
//! - `DIRGRAPH_HTTP_TIMEOUT_SECS`: Request timeout in seconds
//! - `DIRGRAPH_HTTP_MAX_ATTEMPTS`: Attempts per request, retries included
//! - `DIRGRAPH_HTTP_BACKOFF_MS`: Base retry backoff in milliseconds
//! - `DIRGRAPH_LOG_LEVEL`: Default log filter
//! - `DIRGRAPH_LOG_JSON`: JSON log output (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./dirgraph.json` or `./dirgraph.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names next to the executable
//!
//! Files may omit the access token; `DIRGRAPH_ACCESS_TOKEN` fills it in.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use dirgraph_domain::{ApiConfig, Config, DirectoryError, HttpConfig, LoggingConfig, Result};

const ENV_BASE_URL: &str = "DIRGRAPH_BASE_URL";
const ENV_TENANT: &str = "DIRGRAPH_TENANT";
const ENV_ACCESS_TOKEN: &str = "DIRGRAPH_ACCESS_TOKEN";
const ENV_NEXT_LINK_FIELD: &str = "DIRGRAPH_NEXT_LINK_FIELD";
const ENV_HTTP_TIMEOUT: &str = "DIRGRAPH_HTTP_TIMEOUT_SECS";
const ENV_HTTP_MAX_ATTEMPTS: &str = "DIRGRAPH_HTTP_MAX_ATTEMPTS";
const ENV_HTTP_BACKOFF: &str = "DIRGRAPH_HTTP_BACKOFF_MS";
const ENV_LOG_LEVEL: &str = "DIRGRAPH_LOG_LEVEL";
const ENV_LOG_JSON: &str = "DIRGRAPH_LOG_JSON";

const CONFIG_FILE_NAMES: &[&str] = &["dirgraph.json", "dirgraph.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `DirectoryError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Tenant and access token are required; everything else falls back to the
/// defaults.
///
/// # Errors
/// Returns `DirectoryError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let api_defaults = ApiConfig::default();
    let http_defaults = HttpConfig::default();
    let logging_defaults = LoggingConfig::default();

    let config = Config {
        api: ApiConfig {
            base_url: env_or(ENV_BASE_URL, api_defaults.base_url),
            tenant: env_var(ENV_TENANT)?,
            access_token: env_var(ENV_ACCESS_TOKEN)?,
            next_link_field: env_or(ENV_NEXT_LINK_FIELD, api_defaults.next_link_field),
        },
        http: HttpConfig {
            timeout_seconds: env_parse(ENV_HTTP_TIMEOUT, http_defaults.timeout_seconds)?,
            max_attempts: env_parse(ENV_HTTP_MAX_ATTEMPTS, http_defaults.max_attempts)?,
            base_backoff_ms: env_parse(ENV_HTTP_BACKOFF, http_defaults.base_backoff_ms)?,
            user_agent: http_defaults.user_agent,
        },
        logging: LoggingConfig {
            level: env_or(ENV_LOG_LEVEL, logging_defaults.level),
            json: env_bool(ENV_LOG_JSON, logging_defaults.json),
        },
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension). A
/// missing `access_token` is taken from `DIRGRAPH_ACCESS_TOKEN`.
///
/// # Errors
/// Returns `DirectoryError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DirectoryError::config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DirectoryError::config("No config file found in any of the standard locations")
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DirectoryError::config(format!("Failed to read config file: {}", e)))?;

    let mut config = parse_config(&contents, &config_path)?;
    if config.api.access_token.is_empty() {
        if let Ok(token) = std::env::var(ENV_ACCESS_TOKEN) {
            config.api.access_token = token;
        }
    }

    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `DirectoryError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DirectoryError::config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DirectoryError::config(format!("Invalid JSON format: {}", e))),
        _ => Err(DirectoryError::config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory first, then the directory of the
/// running executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `DirectoryError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        DirectoryError::config(format!("Missing required environment variable: {}", key))
    })
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).ok().filter(|value| !value.is_empty()).unwrap_or(default)
}

/// Parse an optional numeric variable.
///
/// # Errors
/// Returns `DirectoryError::Config` when the variable is set but invalid.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| DirectoryError::config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(default),
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
