//! Configuration structures
//!
//! Plain data carried from the loader into the application context. The
//! loader in `openslot-infra` fills these from environment variables or a
//! config file; nothing here reads process state.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DAY_END_HOUR, DEFAULT_DAY_START_HOUR, DEFAULT_DB_POOL_SIZE, DEFAULT_HORIZON_DAYS,
    DEFAULT_HTTP_BIND_ADDR, DEFAULT_MEETING_LINK_BASE, DEFAULT_MIN_GAP_MINUTES,
};
use crate::types::WorkingHoursPolicy;

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub google: GoogleConfig,
    #[serde(default)]
    pub availability: AvailabilityConfig,
    #[serde(default)]
    pub scheduling: SchedulingConfig,
}

/// SQLite database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_pool_size() -> u32 {
    DEFAULT_DB_POOL_SIZE
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub bind_addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { bind_addr: DEFAULT_HTTP_BIND_ADDR.to_string() }
    }
}

/// Google OAuth application credentials.
///
/// An explicit value passed into the OAuth flow; there is no process-wide
/// OAuth state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Working-hours policy and lookahead settings for availability queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityConfig {
    pub day_start_hour: u32,
    pub day_end_hour: u32,
    pub min_gap_minutes: i64,
    pub horizon_days: i64,
}

impl AvailabilityConfig {
    /// Working-hours policy described by this configuration.
    pub fn policy(&self) -> WorkingHoursPolicy {
        WorkingHoursPolicy {
            day_start_hour: self.day_start_hour,
            day_end_hour: self.day_end_hour,
            min_gap_minutes: self.min_gap_minutes,
        }
    }
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            day_start_hour: DEFAULT_DAY_START_HOUR,
            day_end_hour: DEFAULT_DAY_END_HOUR,
            min_gap_minutes: DEFAULT_MIN_GAP_MINUTES,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

/// Meeting link generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingConfig {
    pub meeting_link_base: String,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self { meeting_link_base: DEFAULT_MEETING_LINK_BASE.to_string() }
    }
}
