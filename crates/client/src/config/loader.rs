//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Start from the defaults, or from a config file when one is found
//! 2. Override with whatever environment variables are set
//!
//! ## Environment Variables
//! - `BLEEMEO_USER` / `BLEEMEO_PASSWORD`: credentials
//! - `BLEEMEO_ACCOUNT_ID`: sent as the `X-Bleemeo-Account` header
//! - `BLEEMEO_OAUTH_CLIENT_ID` / `BLEEMEO_OAUTH_CLIENT_SECRET`: OAuth client
//! - `BLEEMEO_API_URL`: API endpoint
//! - `BLEEMEO_OAUTH_INITIAL_REFRESH_TOKEN`: seed refresh token
//! - `BLEEMEO_THROTTLE_MAX_AUTO_RETRY_DELAY`: seconds
//!
//! ## File Locations
//! `./bleemeo.toml`, `./bleemeo.json`, then the same names next to the
//! executable.

use std::path::{Path, PathBuf};

use bleemeo_domain::ClientConfig;

use crate::api::ApiError;

const CONFIG_FILE_NAMES: [&str; 2] = ["bleemeo.toml", "bleemeo.json"];

/// Load configuration from an optional file, then the environment.
///
/// # Errors
/// Returns `ApiError::Config` if a found file is invalid or an environment
/// variable has an invalid value.
pub fn load() -> Result<ClientConfig, ApiError> {
    let config = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, starting from defaults");
            ClientConfig::default()
        }
    };

    apply_env(config, |key| std::env::var(key).ok())
}

/// Load configuration from environment variables over the defaults.
///
/// # Errors
/// Returns `ApiError::Config` if a variable has an invalid value.
pub fn load_from_env() -> Result<ClientConfig, ApiError> {
    let config = apply_env(ClientConfig::default(), |key| std::env::var(key).ok())?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Override `config` with the variables `lookup` knows about.
///
/// A variable set to an empty string still overrides.
///
/// # Errors
/// Returns `ApiError::Config` if the throttle delay is not a number of
/// seconds.
pub fn apply_env(
    mut config: ClientConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig, ApiError> {
    if let Some(username) = lookup("BLEEMEO_USER") {
        config.username = Some(username);
    }
    if let Some(password) = lookup("BLEEMEO_PASSWORD") {
        config.password = Some(password);
    }
    if let Some(account_id) = lookup("BLEEMEO_ACCOUNT_ID") {
        config.account_id = Some(account_id);
    }
    if let Some(client_id) = lookup("BLEEMEO_OAUTH_CLIENT_ID") {
        config.oauth_client_id = client_id;
    }
    if let Some(secret) = lookup("BLEEMEO_OAUTH_CLIENT_SECRET") {
        config.oauth_client_secret = Some(secret);
    }
    if let Some(endpoint) = lookup("BLEEMEO_API_URL") {
        config.endpoint = endpoint;
    }
    if let Some(refresh) = lookup("BLEEMEO_OAUTH_INITIAL_REFRESH_TOKEN") {
        config.initial_refresh_token = Some(refresh);
    }
    if let Some(delay) = lookup("BLEEMEO_THROTTLE_MAX_AUTO_RETRY_DELAY") {
        config.throttle_max_auto_retry_delay_secs = delay.trim().parse::<u64>().map_err(|e| {
            ApiError::Config(format!("Invalid throttle max auto retry delay {delay:?}: {e}"))
        })?;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected by
/// file extension (`.json` or `.toml`); missing fields keep their defaults.
///
/// # Errors
/// Returns `ApiError::Config` if no file is found, it cannot be read, or it
/// does not parse.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig, ApiError> {
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
        .map_err(|e| ApiError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig, ApiError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ApiError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ApiError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ApiError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file in the standard locations, if any.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}
