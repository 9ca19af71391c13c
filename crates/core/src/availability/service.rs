//! Availability use case - resolve the credential, fetch busy intervals,
//! run the engine, and group the result per day.

use std::sync::Arc;

use openslot_domain::{DaySlots, FreeInterval, Horizon, Result, WorkingHoursPolicy};
use tracing::debug;

use super::engine;
use super::ports::{CalendarPort, TokenRepository};

/// Availability service
pub struct AvailabilityService {
    tokens: Arc<dyn TokenRepository>,
    calendar: Arc<dyn CalendarPort>,
    policy: WorkingHoursPolicy,
}

impl AvailabilityService {
    /// Create a new availability service.
    pub fn new(
        tokens: Arc<dyn TokenRepository>,
        calendar: Arc<dyn CalendarPort>,
        policy: WorkingHoursPolicy,
    ) -> Self {
        Self { tokens, calendar, policy }
    }

    /// Working-hours policy in effect for this service.
    pub fn policy(&self) -> &WorkingHoursPolicy {
        &self.policy
    }

    /// Compute the user's free slots over the horizon.
    ///
    /// Fails with `NotFound` when the user never authorized calendar access;
    /// provider and credential failures propagate unchanged from the
    /// calendar port.
    pub async fn check_availability(
        &self,
        user_email: &str,
        horizon: &Horizon,
    ) -> Result<Vec<DaySlots>> {
        let credential = self.tokens.get(user_email).await?;
        let busy = self.calendar.list_busy_intervals(&credential.access_token, horizon).await?;
        debug!(user_email, busy_count = busy.len(), "computing availability");

        let free = engine::compute_free_slots(&busy, &self.policy, horizon)?;
        Ok(group_by_day(free))
    }
}

/// Group engine output by calendar date.
///
/// The engine emits slots in date order and never spans a day boundary, so a
/// single forward pass suffices.
fn group_by_day(free: Vec<FreeInterval>) -> Vec<DaySlots> {
    let mut days: Vec<DaySlots> = Vec::new();
    for slot in free {
        let date = slot.start.date_naive();
        match days.last_mut() {
            Some(day) if day.date == date => day.slots.push(slot),
            _ => days.push(DaySlots { date, slots: vec![slot] }),
        }
    }
    days
}
