// Trigger calculation
// Converts appointment time + lead minutes into an absolute calendar trigger

use chrono::{DateTime, Duration, Local, TimeZone};

use crate::models::reminder::CalendarTrigger;

/// Computes where on the local calendar a reminder should fire.
///
/// Stateless; `now` is always passed in so callers (and tests) control the
/// clock.
pub struct TriggerCalculator;

impl TriggerCalculator {
    /// Subtract `lead_minutes` from the appointment's wall-clock time and
    /// express the result as absolute local calendar components.
    ///
    /// The subtraction happens on the local calendar, not on the
    /// elapsed-seconds timeline: a 1440-minute lead always lands at the
    /// same wall-clock time the previous day, even when a DST transition
    /// sits between trigger and appointment. A trigger whose wall-clock
    /// time falls inside a DST gap does not exist and is skipped.
    ///
    /// Returns `None` when the computed trigger is not strictly after
    /// `now`; that offset is skipped, never an error. A trigger landing
    /// exactly on `now` is treated as past.
    pub fn compute(
        appointment: DateTime<Local>,
        lead_minutes: i64,
        now: DateTime<Local>,
    ) -> Option<CalendarTrigger> {
        let fire_wall = appointment
            .naive_local()
            .checked_sub_signed(Duration::minutes(lead_minutes))?;
        // Ambiguous wall-clock times (DST fall-back) resolve to the
        // earlier instant for the future check.
        let fire_at = Local.from_local_datetime(&fire_wall).earliest()?;
        if fire_at <= now {
            return None;
        }
        Some(CalendarTrigger::from_naive(fire_wall))
    }
}
