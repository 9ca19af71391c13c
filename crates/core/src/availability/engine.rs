//! Free-slot computation over busy calendar intervals.
//!
//! The engine is a pure function of its inputs: an ordered set of busy
//! intervals, a working-hours policy, and a horizon deterministically produce
//! an ordered sequence of free intervals. It performs no I/O and holds no
//! state, so concurrent invocations for different users are independent.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use openslot_domain::{BusyInterval, FreeInterval, Horizon, Result, WorkingHoursPolicy};
use tracing::warn;

/// Compute the free intervals within working hours across the horizon.
///
/// The horizon is processed one calendar day at a time and the per-day
/// results are concatenated in date order; no free interval ever spans a day
/// boundary. The leading and trailing slack of each working day is always
/// reported, while interior gaps must exceed the policy's minimum gap.
///
/// # Errors
/// Returns `InvalidInput` when the policy cannot describe a working day.
/// Malformed intervals (`end < start`) are ignored with a warning rather
/// than failing the computation.
pub fn compute_free_slots(
    busy: &[BusyInterval],
    policy: &WorkingHoursPolicy,
    horizon: &Horizon,
) -> Result<Vec<FreeInterval>> {
    policy.validate()?;

    // The fetcher orders by start time; sort defensively instead of
    // rejecting unsorted input.
    let mut sorted = busy.to_vec();
    sorted.sort_by_key(|interval| interval.start);

    let mut free = Vec::new();
    for day in horizon.days() {
        collect_day_slots(&sorted, policy, horizon, day, &mut free);
    }
    Ok(free)
}

/// Working window of one calendar day, clamped to the horizon.
struct DayWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

fn working_window(
    policy: &WorkingHoursPolicy,
    horizon: &Horizon,
    day: NaiveDate,
) -> Option<DayWindow> {
    let start = day.and_hms_opt(policy.day_start_hour, 0, 0)?.and_utc().max(horizon.from);
    let end = day.and_hms_opt(policy.day_end_hour, 0, 0)?.and_utc().min(horizon.to);
    (start < end).then_some(DayWindow { start, end })
}

fn collect_day_slots(
    busy: &[BusyInterval],
    policy: &WorkingHoursPolicy,
    horizon: &Horizon,
    day: NaiveDate,
    out: &mut Vec<FreeInterval>,
) {
    let Some(window) = working_window(policy, horizon, day) else {
        return;
    };

    let mut watermark = window.start;
    let mut saw_busy = false;

    for interval in busy {
        let Some((start, end)) = clip_to_window(interval, &window, day) else {
            continue;
        };
        if start > watermark {
            let gap = start - watermark;
            // The threshold applies to interior gaps only; slack against the
            // workday boundary is always reported.
            if !saw_busy || gap > policy.min_gap() {
                out.push(FreeInterval { start: watermark, end: start });
            }
        }
        // Overlapping or nested events must not regress the watermark.
        if end > watermark {
            watermark = end;
        }
        saw_busy = true;
    }

    if watermark < window.end {
        out.push(FreeInterval { start: watermark, end: window.end });
    }
}

/// Clip one busy interval to the day's working window.
///
/// Returns `None` for intervals that contribute nothing to this day:
/// malformed, zero-length, wholly outside the window, or all-day events
/// belonging to other days. An all-day event consumes the entire working
/// window of its day rather than the full 24 hours.
fn clip_to_window(
    interval: &BusyInterval,
    window: &DayWindow,
    day: NaiveDate,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    if interval.end < interval.start {
        warn!(start = %interval.start, end = %interval.end, "ignoring malformed busy interval");
        return None;
    }

    if interval.is_all_day {
        return covers_day(interval, day).then_some((window.start, window.end));
    }

    let start = interval.start.max(window.start);
    let end = interval.end.min(window.end);
    (start < end).then_some((start, end))
}

/// All-day events arrive as date-granular spans with exclusive end midnights.
fn covers_day(interval: &BusyInterval, day: NaiveDate) -> bool {
    let first = interval.start.date_naive();
    let mut last = interval.end.date_naive();
    if interval.end.time() == NaiveTime::MIN && last > first {
        last = last.pred_opt().unwrap_or(last);
    }
    (first..=last).contains(&day)
}
