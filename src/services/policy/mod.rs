// Reminder policy
// Fixed lead-time offsets and deterministic message templating

use crate::models::appointment::AppointmentContext;
use crate::models::reminder::NotificationContent;

/// One lead time at which a reminder fires, with its display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderOffset {
    pub lead_minutes: i64,
    pub label: &'static str,
}

/// Pure configuration: the ordered set of lead times before an appointment
/// and the message built for each. Stateless, no side effects; message text
/// is deterministic for a given context and label so tests can assert on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderPolicy {
    offsets: Vec<ReminderOffset>,
}

impl ReminderPolicy {
    /// The production policy: one day, one hour, and fifteen minutes ahead.
    pub fn standard() -> Self {
        Self {
            offsets: vec![
                ReminderOffset { lead_minutes: 1440, label: "Tomorrow" },
                ReminderOffset { lead_minutes: 60, label: "1 Hour" },
                ReminderOffset { lead_minutes: 15, label: "15 Minutes" },
            ],
        }
    }

    /// Custom offset set, largest lead first by convention. Used by tests;
    /// production callers stick to [`ReminderPolicy::standard`].
    pub fn with_offsets(offsets: Vec<ReminderOffset>) -> Self {
        Self { offsets }
    }

    pub fn offsets(&self) -> &[ReminderOffset] {
        &self.offsets
    }

    /// Build the notification content for one offset of an appointment.
    pub fn message(&self, context: &AppointmentContext, label: &str) -> NotificationContent {
        NotificationContent {
            title: format!("Appointment reminder ({})", label),
            body: format!(
                "{}, your {} appointment with {} is at {}.",
                context.patient_name,
                context.specialty,
                context.provider_name,
                context.start.format("%H:%M on %d/%m/%Y"),
            ),
        }
    }
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self::standard()
    }
}
