// Cancellation
// Locates and removes every pending reminder belonging to one appointment

use std::sync::Arc;

use crate::models::appointment::AppointmentKey;
use crate::models::identifier::ReminderIdentifier;
use crate::services::notification_store::{NotificationStore, StoreError};

/// Cancels reminders by appointment key.
///
/// There is no app-side index: the pending list in the OS store is queried
/// and each identifier decoded, so the scan is linear in the system-wide
/// pending count. N stays small (a handful of appointments at three offsets
/// each). A `schedule` racing between the query and the removal can add a
/// registration this pass misses; accepted given one booking or
/// cancellation per user action.
pub struct CancellationIndex {
    store: Arc<dyn NotificationStore>,
}

impl CancellationIndex {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Remove every pending registration whose identifier decodes to `key`.
    ///
    /// Returns how many were removed. No matches is a no-op `Ok(0)`, not an
    /// error. Identifiers that fail to decode belong to other subsystems
    /// and are left untouched.
    pub async fn cancel(&self, key: &AppointmentKey) -> Result<usize, StoreError> {
        let pending = self.store.pending().await?;

        let matching: Vec<String> = pending
            .into_iter()
            .filter(|registration| {
                ReminderIdentifier::decode(&registration.identifier)
                    .is_some_and(|id| id.belongs_to(key))
            })
            .map(|registration| registration.identifier)
            .collect();

        if matching.is_empty() {
            return Ok(0);
        }

        self.store.remove(&matching).await?;
        log::info!("cancelled {} reminder(s) for {}", matching.len(), key);
        Ok(matching.len())
    }
}
