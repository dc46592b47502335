// Notification store seam
// Async interfaces over the OS notification subsystem and permission prompt

mod memory;

pub use memory::InMemoryNotificationStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::reminder::{CalendarTrigger, NotificationContent};

/// One request to the OS store to fire a single reminder at a single
/// trigger time.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRegistration {
    pub identifier: String,
    pub content: NotificationContent,
    pub trigger: CalendarTrigger,
}

/// Failure reported by the OS store or permission API, carrying the
/// OS-provided reason.
#[derive(Debug, Clone, Error)]
#[error("notification store: {reason}")]
pub struct StoreError {
    pub reason: String,
}

impl StoreError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// The OS local-notification store.
///
/// Every call is async and non-blocking; the engine issues a single attempt
/// per call, no retries or timeouts. The store is the sole source of truth
/// for what is pending; the engine keeps no parallel index.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Register one reminder to fire at its calendar trigger.
    async fn register(&self, registration: PendingRegistration) -> Result<(), StoreError>;

    /// All registrations that have not fired yet, system-wide.
    async fn pending(&self) -> Result<Vec<PendingRegistration>, StoreError>;

    /// Identifiers of reminders that have fired but not been cleared.
    async fn delivered(&self) -> Result<Vec<String>, StoreError>;

    /// Remove exactly the given pending registrations. Unknown identifiers
    /// are ignored by the OS.
    async fn remove(&self, identifiers: &[String]) -> Result<(), StoreError>;

    /// Drop every pending registration.
    async fn remove_all_pending(&self) -> Result<(), StoreError>;

    /// Clear the delivered list.
    async fn clear_delivered(&self) -> Result<(), StoreError>;
}

/// The OS authorization prompt.
#[async_trait]
pub trait PermissionAuthorizer: Send + Sync {
    /// Ask the user for notification permission. `Ok(false)` is an explicit
    /// denial; the error carries the OS reason when the prompt itself
    /// fails.
    async fn request_authorization(&self) -> Result<bool, StoreError>;
}
