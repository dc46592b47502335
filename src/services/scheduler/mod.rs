// Reminder scheduler
// Fans one confirmed appointment out into a batch of OS registrations

use std::sync::Arc;

use chrono::{DateTime, Local};
use thiserror::Error;
use tokio::task::JoinSet;

use crate::models::appointment::{AppointmentContext, AppointmentKey, AppointmentRequest, ParseError};
use crate::models::identifier::ReminderIdentifier;
use crate::models::reminder::{ReminderStatus, ScheduledReminder};
use crate::services::notification_store::{NotificationStore, PendingRegistration};
use crate::services::policy::ReminderPolicy;
use crate::services::trigger::TriggerCalculator;

/// Why a schedule batch produced no registrations.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Malformed booking input; the batch aborts before any OS call.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Every policy offset was already in the past; zero side effects.
    #[error("all reminder offsets are in the past")]
    NoFutureOffsets,
    /// Offsets were attempted but the OS refused every registration.
    #[error("all {attempted} reminder registrations failed")]
    AllRegistrationsFailed { attempted: usize },
}

/// Aggregated result of one schedule batch.
///
/// Partial success is a valid, expected outcome: individual offset failures
/// never roll back their siblings.
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    pub key: AppointmentKey,
    pub scheduled_count: usize,
    pub skipped_count: usize,
    pub failed_count: usize,
    pub reminders: Vec<ScheduledReminder>,
}

/// Turns a booked appointment into time-offset local notifications.
///
/// Explicitly constructed and injected by the app's composition root; holds
/// no global state. Scheduling is a best-effort step after a booking is
/// already confirmed; no error from here may fail the booking flow.
pub struct ReminderScheduler {
    store: Arc<dyn NotificationStore>,
    policy: ReminderPolicy,
}

impl ReminderScheduler {
    pub fn new(store: Arc<dyn NotificationStore>, policy: ReminderPolicy) -> Self {
        Self { store, policy }
    }

    /// Register reminders for one appointment at every policy offset still
    /// in the future.
    ///
    /// Precondition: callers rescheduling an appointment must cancel its
    /// existing reminders first. Scheduling the same context twice is not
    /// deduplicated and leaves two independent registration sets in the OS
    /// store.
    pub async fn schedule(
        &self,
        request: &AppointmentRequest,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        self.schedule_at(request, Local::now()).await
    }

    /// [`Self::schedule`] with an explicit clock, for tests.
    pub async fn schedule_at(
        &self,
        request: &AppointmentRequest,
        now: DateTime<Local>,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        // Fail fast on bad input: no registration may be attempted.
        let context = AppointmentContext::from_request(request)?;
        let key = context.key();

        let mut reminders: Vec<Option<ScheduledReminder>> = Vec::new();
        let mut tasks: JoinSet<(usize, ScheduledReminder)> = JoinSet::new();
        let mut attempted = 0usize;

        for offset in self.policy.offsets() {
            let slot = reminders.len();
            reminders.push(None);

            let Some(trigger) = TriggerCalculator::compute(context.start, offset.lead_minutes, now)
            else {
                log::debug!(
                    "skipping {}m reminder for {}: trigger not in the future",
                    offset.lead_minutes,
                    key
                );
                reminders[slot] = Some(ScheduledReminder {
                    identifier: String::new(),
                    lead_minutes: offset.lead_minutes,
                    trigger: None,
                    status: ReminderStatus::Skipped,
                });
                continue;
            };

            let identifier =
                ReminderIdentifier::new(key.clone(), offset.lead_minutes, context.start.timestamp())
                    .encode();
            let registration = PendingRegistration {
                identifier: identifier.clone(),
                content: self.policy.message(&context, offset.label),
                trigger,
            };

            attempted += 1;
            let store = Arc::clone(&self.store);
            let lead_minutes = offset.lead_minutes;
            tasks.spawn(async move {
                let status = match store.register(registration).await {
                    Ok(()) => ReminderStatus::Scheduled,
                    Err(err) => {
                        log::warn!("failed to register {}m reminder {}: {}", lead_minutes, identifier, err);
                        ReminderStatus::Failed
                    }
                };
                (
                    slot,
                    ScheduledReminder {
                        identifier,
                        lead_minutes,
                        trigger: Some(trigger),
                        status,
                    },
                )
            });
        }

        if attempted == 0 {
            return Err(ScheduleError::NoFutureOffsets);
        }

        // Completion barrier: the batch resolves only once every
        // registration has come back, success or failure. The batch also
        // runs to completion regardless of what the caller does meanwhile.
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, reminder)) => reminders[slot] = Some(reminder),
                Err(err) => log::warn!("reminder registration task panicked: {}", err),
            }
        }

        let reminders: Vec<ScheduledReminder> = reminders.into_iter().flatten().collect();
        let scheduled_count = reminders
            .iter()
            .filter(|r| r.status == ReminderStatus::Scheduled)
            .count();
        let skipped_count = reminders
            .iter()
            .filter(|r| r.status == ReminderStatus::Skipped)
            .count();
        let failed_count = reminders
            .iter()
            .filter(|r| r.status == ReminderStatus::Failed)
            .count();

        if scheduled_count == 0 {
            return Err(ScheduleError::AllRegistrationsFailed { attempted });
        }

        log::info!(
            "scheduled {} reminder(s) for {} ({} skipped, {} failed)",
            scheduled_count,
            key,
            skipped_count,
            failed_count
        );

        Ok(ScheduleOutcome {
            key,
            scheduled_count,
            skipped_count,
            failed_count,
            reminders,
        })
    }
}
