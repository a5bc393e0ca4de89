//! Configuration loader
//!
//! Loads application configuration from files and environment variables.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file from the working directory, if present
//! 2. Probes multiple paths for a config file (JSON or TOML); when none is
//!    found, starts from [`Config::default`]
//! 3. Applies environment variable overrides on top
//!
//! ## Environment Variables
//! - `MAAYEGUE_SYNC_INTERVAL`: Automatic sync period in seconds
//! - `MAAYEGUE_SYNC_ENABLED`: Whether periodic sync runs (true/false)
//! - `MAAYEGUE_SYNC_ON_RECONNECT`: Sync when connectivity returns (true/false)
//! - `MAAYEGUE_RESEND_COOLDOWN`: Verification email cooldown in seconds
//! - `MAAYEGUE_VERIFICATION_POLL`: Verification status poll period in seconds
//! - `MAAYEGUE_ROLE_CACHE_TTL`: Role lookup cache lifetime in seconds
//! - `MAAYEGUE_ROLE_CACHE_CAPACITY`: Maximum number of cached user roles
//! - `MAAYEGUE_VERIFY_ROLE_WITH_STORE`: Check roles against the role store
//!   (true/false)
//! - `MAAYEGUE_LOG_FILTER`: Default tracing filter directive
//! - `MAAYEGUE_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./maayegue.json` or `./maayegue.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use maayegue_domain::{Config, MaayegueError, Result};

const FILE_NAMES: [&str; 4] = ["config.json", "config.toml", "maayegue.json", "maayegue.toml"];

/// Load configuration with automatic fallback strategy
///
/// Starts from the first config file found by [`probe_config_paths`] (or
/// the defaults when there is none) and applies environment overrides.
///
/// # Errors
/// Returns `MaayegueError::Config` if a config file exists but cannot be
/// parsed, or if an environment variable holds an invalid value.
pub fn load() -> Result<Config> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "No .env file loaded");
    }

    let base = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    };

    apply_env_overrides(base)
}

/// Load configuration from defaults plus environment variables
///
/// Variables that are not set keep their default values.
///
/// # Errors
/// Returns `MaayegueError::Config` if a variable is set to an invalid value.
pub fn load_from_env() -> Result<Config> {
    let config = apply_env_overrides(Config::default())?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `MaayegueError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - A sync or poll interval is zero
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(MaayegueError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            MaayegueError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| MaayegueError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content, by file extension
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| MaayegueError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| MaayegueError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(MaayegueError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent, and the directory
/// of the running executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn apply_env_overrides(mut config: Config) -> Result<Config> {
    if let Some(secs) = env_parse::<u64>("MAAYEGUE_SYNC_INTERVAL")? {
        config.sync.interval_seconds = secs;
    }
    config.sync.enabled = env_bool("MAAYEGUE_SYNC_ENABLED", config.sync.enabled);
    config.sync.sync_on_reconnect =
        env_bool("MAAYEGUE_SYNC_ON_RECONNECT", config.sync.sync_on_reconnect);

    if let Some(secs) = env_parse::<u64>("MAAYEGUE_RESEND_COOLDOWN")? {
        config.access.resend_cooldown_seconds = secs;
    }
    if let Some(secs) = env_parse::<u64>("MAAYEGUE_VERIFICATION_POLL")? {
        config.access.verification_poll_seconds = secs;
    }
    if let Some(secs) = env_parse::<u64>("MAAYEGUE_ROLE_CACHE_TTL")? {
        config.access.role_cache_ttl_seconds = secs;
    }
    if let Some(capacity) = env_parse::<u64>("MAAYEGUE_ROLE_CACHE_CAPACITY")? {
        config.access.role_cache_max_capacity = capacity;
    }
    config.access.verify_role_with_store =
        env_bool("MAAYEGUE_VERIFY_ROLE_WITH_STORE", config.access.verify_role_with_store);

    if let Ok(filter) = std::env::var("MAAYEGUE_LOG_FILTER") {
        config.logging.filter = filter;
    }
    config.logging.json = env_bool("MAAYEGUE_LOG_JSON", config.logging.json);

    validate(&config)?;
    Ok(config)
}

/// Reject values the scheduler and the verification poller cannot run with
///
/// # Errors
/// Returns `MaayegueError::Config` naming the first invalid field.
fn validate(config: &Config) -> Result<()> {
    if config.sync.interval_seconds == 0 {
        return Err(MaayegueError::Config("Sync interval must be greater than zero".to_string()));
    }
    if config.access.verification_poll_seconds == 0 {
        return Err(MaayegueError::Config(
            "Verification poll interval must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `MaayegueError::Config` if the variable is set but does not parse.
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
            .map_err(|e| MaayegueError::Config(format!("Invalid value for {key}: {e}"))),
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
