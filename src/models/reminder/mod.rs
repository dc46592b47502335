// Reminder module
// Trigger components, notification content, and the reminder lifecycle

use chrono::{DateTime, Datelike, Local, NaiveDateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

/// A fire time expressed as absolute local calendar components.
///
/// This is the shape the platform calendar-trigger API consumes: the OS
/// re-evaluates the components against the device calendar at fire time, so
/// the trigger stays correct across timezone and DST changes after
/// scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarTrigger {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl CalendarTrigger {
    pub fn from_local(at: DateTime<Local>) -> Self {
        Self::from_naive(at.naive_local())
    }

    /// Build from wall-clock components that have not been resolved to an
    /// instant yet.
    pub fn from_naive(at: NaiveDateTime) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
            day: at.day(),
            hour: at.hour(),
            minute: at.minute(),
        }
    }

    /// Resolve the components back to a local instant.
    ///
    /// Returns `None` for components that do not exist in the local
    /// timezone (DST gap); ambiguous times resolve to the earlier instant.
    pub fn to_local_datetime(&self) -> Option<DateTime<Local>> {
        Local
            .with_ymd_and_hms(self.year, self.month, self.day, self.hour, self.minute, 0)
            .earliest()
    }
}

/// Title and body handed to the notification store for one registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

/// Lifecycle of a single reminder registration.
///
/// `Scheduled` moves to `Delivered` under OS control (unobservable here
/// except through badge queries) or to `Cancelled` via cancellation.
/// `Skipped` and `Failed` are terminal at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderStatus {
    Scheduled,
    Delivered,
    Cancelled,
    Skipped,
    Failed,
}

impl ReminderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Skipped | Self::Failed)
    }
}

/// Outcome record for one offset of a schedule batch.
///
/// Not persisted anywhere app-side; the OS store is the sole source of
/// truth for what is actually pending.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledReminder {
    /// Encoded registration identifier; empty for skipped offsets, which
    /// never reach the store.
    pub identifier: String,
    pub lead_minutes: i64,
    pub trigger: Option<CalendarTrigger>,
    pub status: ReminderStatus,
}
