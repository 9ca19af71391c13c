//! Meeting link generation.
//!
//! Links are generated locally; no conferencing provider is called.

use chrono::{DateTime, Utc};
use openslot_domain::{MeetingLink, OpenSlotError, Result};
use uuid::Uuid;

/// Meeting scheduler
pub struct MeetingScheduler {
    link_base: String,
}

impl MeetingScheduler {
    /// Create a scheduler issuing links under the given base URL.
    pub fn new(link_base: impl Into<String>) -> Self {
        let link_base = link_base.into().trim_end_matches('/').to_string();
        Self { link_base }
    }

    /// Issue a meeting link for the given slot.
    pub fn schedule(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<MeetingLink> {
        if end <= start {
            return Err(OpenSlotError::InvalidInput(
                "meeting end must be after meeting start".to_string(),
            ));
        }

        let url = format!("{}/{}", self.link_base, Uuid::new_v4());
        Ok(MeetingLink { url, start, end })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn scheduler() -> MeetingScheduler {
        MeetingScheduler::new("https://meet.openslot.dev/")
    }

    #[test]
    fn issues_link_under_base_url() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 4, 11, 0, 0).unwrap();

        let link = scheduler().schedule(start, end).unwrap();

        assert!(link.url.starts_with("https://meet.openslot.dev/"));
        assert_eq!(link.start, start);
        assert_eq!(link.end, end);
    }

    #[test]
    fn links_are_unique() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 4, 11, 0, 0).unwrap();

        let s = scheduler();
        assert_ne!(s.schedule(start, end).unwrap().url, s.schedule(start, end).unwrap().url);
    }

    #[test]
    fn rejects_inverted_slot() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 11, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();

        assert!(scheduler().schedule(start, end).is_err());
    }
}
