//! Common data types used throughout the application

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{OpenSlotError, Result};

/// One calendar event's occupied time, as reported by the calendar provider.
///
/// Invariant: `start <= end`. Upstream data should already guarantee this;
/// intervals that violate it are tolerated downstream by being ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_all_day: bool,
}

impl BusyInterval {
    /// Create a timed busy interval.
    pub fn timed(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end, is_all_day: false }
    }

    /// Create an all-day busy interval.
    pub fn all_day(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end, is_all_day: true }
    }
}

/// A gap within working hours not covered by any busy interval.
///
/// Invariant: `start < end`. Zero-length gaps are never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FreeInterval {
    /// Human-readable `"HH:MM to HH:MM"` rendering of the slot.
    pub fn label(&self) -> String {
        format!("{} to {}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Free slots for a single calendar day, in ascending start order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySlots {
    pub date: NaiveDate,
    pub slots: Vec<FreeInterval>,
}

/// Per-day working window bounds and the minimum acceptable interior gap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorkingHoursPolicy {
    pub day_start_hour: u32,
    pub day_end_hour: u32,
    pub min_gap_minutes: i64,
}

impl WorkingHoursPolicy {
    /// Reject policies that cannot describe a working day.
    pub fn validate(&self) -> Result<()> {
        if self.day_start_hour > 23 || self.day_end_hour > 23 {
            return Err(OpenSlotError::InvalidInput(format!(
                "working hours out of range: {}-{}",
                self.day_start_hour, self.day_end_hour
            )));
        }
        if self.day_start_hour >= self.day_end_hour {
            return Err(OpenSlotError::InvalidInput(format!(
                "day start hour {} must be before day end hour {}",
                self.day_start_hour, self.day_end_hour
            )));
        }
        if self.min_gap_minutes < 0 {
            return Err(OpenSlotError::InvalidInput(
                "minimum gap must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Minimum interior gap as a duration.
    pub fn min_gap(&self) -> Duration {
        Duration::minutes(self.min_gap_minutes)
    }
}

impl Default for WorkingHoursPolicy {
    fn default() -> Self {
        Self {
            day_start_hour: crate::constants::DEFAULT_DAY_START_HOUR,
            day_end_hour: crate::constants::DEFAULT_DAY_END_HOUR,
            min_gap_minutes: crate::constants::DEFAULT_MIN_GAP_MINUTES,
        }
    }
}

/// The query window over which availability is computed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Horizon {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl Horizon {
    /// Horizon covering `days` days starting at `from`.
    pub fn next_days(from: DateTime<Utc>, days: i64) -> Self {
        Self { from, to: from + Duration::days(days.max(0)) }
    }

    /// Calendar dates touched by this horizon, in ascending order.
    ///
    /// Empty when `to` is earlier than `from`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.to.date_naive();
        self.from.date_naive().iter_days().take_while(move |day| *day <= last)
    }
}

/// OAuth credential set for one user, as persisted by the token store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub id_token: Option<String>,
}

impl TokenSet {
    /// Whether the access token has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Generated meeting link for a scheduled slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingLink {
    pub url: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
