//! Google Calendar event fetching.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use openslot_core::CalendarPort;
use openslot_domain::{BusyInterval, Horizon, OpenSlotError, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::warn;

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar client fetching busy intervals for the primary calendar.
pub struct GoogleCalendarClient {
    http: Client,
    base_url: String,
}

impl GoogleCalendarClient {
    /// Create a client against the Google Calendar API.
    pub fn new() -> Self {
        Self { http: Client::new(), base_url: GOOGLE_CALENDAR_API_BASE.to_string() }
    }

    /// Create a client against an alternate base URL (primarily for tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http: Client::new(), base_url }
    }
}

impl Default for GoogleCalendarClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CalendarPort for GoogleCalendarClient {
    async fn list_busy_intervals(
        &self,
        access_token: &str,
        horizon: &Horizon,
    ) -> Result<Vec<BusyInterval>> {
        let url = format!("{}/calendars/primary/events", self.base_url);
        let query = [
            ("timeMin", horizon.from.to_rfc3339()),
            ("timeMax", horizon.to.to_rfc3339()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ];

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&query)
            .send()
            .await
            .map_err(|err| {
                OpenSlotError::Network(format!("Google API request failed: {err}"))
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(OpenSlotError::Auth(
                "calendar access credential expired or revoked".to_string(),
            ));
        }
        if !status.is_success() {
            let error_text =
                response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OpenSlotError::Network(format!(
                "Google API error ({status}): {error_text}"
            )));
        }

        let events: GoogleEventsResponse = response.json().await.map_err(|err| {
            OpenSlotError::Network(format!("failed to parse Google response: {err}"))
        })?;

        let mut busy: Vec<BusyInterval> =
            events.items.into_iter().filter_map(busy_interval_from_event).collect();

        // The API orders by start time; guarantee it for the engine anyway.
        busy.sort_by_key(|interval| interval.start);
        Ok(busy)
    }
}

/// Map one provider event to a busy interval.
///
/// Events with unparseable times are skipped rather than failing the whole
/// fetch; availability stays best-effort over the remaining records.
fn busy_interval_from_event(event: GoogleEvent) -> Option<BusyInterval> {
    let is_all_day = event.start.date.is_some();

    let Some(start) = parse_event_time(&event.start) else {
        warn!(event_id = %event.id, "skipping event with unparseable start time");
        return None;
    };
    let Some(end) = parse_event_time(&event.end) else {
        warn!(event_id = %event.id, "skipping event with unparseable end time");
        return None;
    };

    Some(BusyInterval { start, end, is_all_day })
}

/// Timed events carry an RFC 3339 `dateTime`; all-day events carry a
/// date-only `date`, interpreted as midnight UTC.
fn parse_event_time(moment: &EventDateTime) -> Option<DateTime<Utc>> {
    if let Some(ts) = &moment.date_time {
        return DateTime::parse_from_rfc3339(ts).ok().map(|parsed| parsed.with_timezone(&Utc));
    }
    let date = moment.date.as_deref()?;
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(parsed.and_hms_opt(0, 0, 0)?.and_utc())
}

#[derive(Debug, Deserialize)]
struct GoogleEventsResponse {
    #[serde(default)]
    items: Vec<GoogleEvent>,
}

#[derive(Debug, Deserialize)]
struct GoogleEvent {
    id: String,
    start: EventDateTime,
    end: EventDateTime,
}

#[derive(Debug, Deserialize)]
struct EventDateTime {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    date: Option<String>,
}
