//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `OPENSLOT_DB_PATH`: Database file path (required)
//! - `OPENSLOT_DB_POOL_SIZE`: Connection pool size
//! - `OPENSLOT_HTTP_ADDR`: HTTP bind address
//! - `OPENSLOT_GOOGLE_CLIENT_ID`: Google OAuth client id (required)
//! - `OPENSLOT_GOOGLE_CLIENT_SECRET`: Google OAuth client secret (required)
//! - `OPENSLOT_GOOGLE_REDIRECT_URI`: OAuth redirect URI
//! - `OPENSLOT_DAY_START_HOUR`: Working day start hour
//! - `OPENSLOT_DAY_END_HOUR`: Working day end hour
//! - `OPENSLOT_MIN_GAP_MINUTES`: Minimum interior gap reported as free
//! - `OPENSLOT_HORIZON_DAYS`: Availability lookahead in days
//! - `OPENSLOT_MEETING_LINK_BASE`: Base URL for generated meeting links
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./openslot.json` or `./openslot.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use openslot_domain::constants::{
    DEFAULT_DAY_END_HOUR, DEFAULT_DAY_START_HOUR, DEFAULT_DB_POOL_SIZE, DEFAULT_GOOGLE_REDIRECT_URI,
    DEFAULT_HORIZON_DAYS, DEFAULT_HTTP_BIND_ADDR, DEFAULT_MEETING_LINK_BASE,
    DEFAULT_MIN_GAP_MINUTES,
};
use openslot_domain::{
    AvailabilityConfig, Config, DatabaseConfig, GoogleConfig, HttpConfig, OpenSlotError, Result,
    SchedulingConfig,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `OpenSlotError::Config` if configuration cannot be loaded from
/// either source, the file format is invalid, or required fields are missing.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// The database path and Google client credentials must be present; all
/// other settings fall back to their defaults.
///
/// # Errors
/// Returns `OpenSlotError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<Config> {
    let database = DatabaseConfig {
        path: env_var("OPENSLOT_DB_PATH")?,
        pool_size: env_parse("OPENSLOT_DB_POOL_SIZE", DEFAULT_DB_POOL_SIZE)?,
    };

    let http = HttpConfig { bind_addr: env_or("OPENSLOT_HTTP_ADDR", DEFAULT_HTTP_BIND_ADDR) };

    let google = GoogleConfig {
        client_id: env_var("OPENSLOT_GOOGLE_CLIENT_ID")?,
        client_secret: env_var("OPENSLOT_GOOGLE_CLIENT_SECRET")?,
        redirect_uri: env_or("OPENSLOT_GOOGLE_REDIRECT_URI", DEFAULT_GOOGLE_REDIRECT_URI),
    };

    let availability = AvailabilityConfig {
        day_start_hour: env_parse("OPENSLOT_DAY_START_HOUR", DEFAULT_DAY_START_HOUR)?,
        day_end_hour: env_parse("OPENSLOT_DAY_END_HOUR", DEFAULT_DAY_END_HOUR)?,
        min_gap_minutes: env_parse("OPENSLOT_MIN_GAP_MINUTES", DEFAULT_MIN_GAP_MINUTES)?,
        horizon_days: env_parse("OPENSLOT_HORIZON_DAYS", DEFAULT_HORIZON_DAYS)?,
    };

    let scheduling = SchedulingConfig {
        meeting_link_base: env_or("OPENSLOT_MEETING_LINK_BASE", DEFAULT_MEETING_LINK_BASE),
    };

    let config = Config { database, http, google, availability, scheduling };
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `OpenSlotError::Config` if the file is missing, malformed, or
/// describes an invalid working-hours policy.
pub fn load_from_file(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(explicit) => {
            if !explicit.exists() {
                return Err(OpenSlotError::Config(format!(
                    "config file not found: {}",
                    explicit.display()
                )));
            }
            explicit.to_path_buf()
        }
        None => probe_config_paths()
            .into_iter()
            .find(|candidate| candidate.exists())
            .ok_or_else(|| OpenSlotError::Config("no config file found".to_string()))?,
    };

    tracing::info!(path = %path.display(), "Loading configuration from file");
    let config = parse_config_file(&path)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    config.availability.policy().validate().map_err(|err| {
        OpenSlotError::Config(format!("invalid working-hours configuration: {err}"))
    })?;
    if config.availability.horizon_days <= 0 {
        return Err(OpenSlotError::Config("horizon days must be positive".to_string()));
    }
    Ok(())
}

fn parse_config_file(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path).map_err(|err| {
        OpenSlotError::Config(format!("failed to read {}: {err}", path.display()))
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&contents)
            .map_err(|err| OpenSlotError::Config(format!("invalid JSON config: {err}"))),
        Some("toml") => toml::from_str(&contents)
            .map_err(|err| OpenSlotError::Config(format!("invalid TOML config: {err}"))),
        _ => Err(OpenSlotError::Config(format!(
            "unsupported config format: {}",
            path.display()
        ))),
    }
}

fn probe_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for dir in [".", "..", "../.."] {
        for name in ["config", "openslot"] {
            for ext in ["json", "toml"] {
                paths.push(PathBuf::from(dir).join(format!("{name}.{ext}")));
            }
        }
    }

    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        for name in ["config", "openslot"] {
            for ext in ["json", "toml"] {
                paths.push(exe_dir.join(format!("{name}.{ext}")));
            }
        }
    }

    paths
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| OpenSlotError::Config(format!("missing environment variable: {name}")))
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| OpenSlotError::Config(format!("invalid value for {name}: {err}"))),
        Err(_) => Ok(default),
    }
}
