//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Working-hours defaults (per-user configuration is still an open question
// upstream, so these stay overridable through `AvailabilityConfig`)
pub const DEFAULT_DAY_START_HOUR: u32 = 9;
pub const DEFAULT_DAY_END_HOUR: u32 = 17;
pub const DEFAULT_MIN_GAP_MINUTES: i64 = 30;
pub const DEFAULT_HORIZON_DAYS: i64 = 7;

// Database defaults
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;

// HTTP defaults
pub const DEFAULT_HTTP_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_REQUEST_BODY_LIMIT_BYTES: usize = 1_048_576;

// OAuth defaults
pub const DEFAULT_GOOGLE_REDIRECT_URI: &str = "http://localhost:8080/oauth2callback";

// Meeting links are generated locally; no provider call is made
pub const DEFAULT_MEETING_LINK_BASE: &str = "https://meet.openslot.dev";
