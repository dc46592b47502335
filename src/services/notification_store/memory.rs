//! In-memory notification store.
//!
//! Stands in for the OS store in tests and simulator/dev builds. Counts
//! every call so tests can assert that a failed parse never reached the
//! store, and can be armed to fail registration for chosen identifiers.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{NotificationStore, PendingRegistration, StoreError};

#[derive(Default)]
struct StoreState {
    pending: Vec<PendingRegistration>,
    delivered: Vec<String>,
    failing_identifiers: HashSet<String>,
}

#[derive(Default)]
pub struct InMemoryNotificationStore {
    state: Mutex<StoreState>,
    call_count: AtomicUsize,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total OS calls observed, across every trait method.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Arm the store to reject future `register` calls for `identifier`.
    pub async fn fail_registration_of(&self, identifier: &str) {
        let mut state = self.state.lock().await;
        state.failing_identifiers.insert(identifier.to_string());
    }

    /// Move a pending registration to the delivered list, as the OS does
    /// when a reminder fires.
    pub async fn mark_delivered(&self, identifier: &str) {
        let mut state = self.state.lock().await;
        if let Some(pos) = state.pending.iter().position(|r| r.identifier == identifier) {
            let fired = state.pending.remove(pos);
            state.delivered.push(fired.identifier);
        }
    }

    pub async fn pending_len(&self) -> usize {
        self.state.lock().await.pending.len()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn register(&self, registration: PendingRegistration) -> Result<(), StoreError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().await;
        if state.failing_identifiers.contains(&registration.identifier) {
            return Err(StoreError::new(format!(
                "registration refused for {}",
                registration.identifier
            )));
        }
        state.pending.push(registration);
        Ok(())
    }

    async fn pending(&self) -> Result<Vec<PendingRegistration>, StoreError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().await.pending.clone())
    }

    async fn delivered(&self) -> Result<Vec<String>, StoreError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().await.delivered.clone())
    }

    async fn remove(&self, identifiers: &[String]) -> Result<(), StoreError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().await;
        state
            .pending
            .retain(|r| !identifiers.contains(&r.identifier));
        Ok(())
    }

    async fn remove_all_pending(&self) -> Result<(), StoreError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.state.lock().await.pending.clear();
        Ok(())
    }

    async fn clear_delivered(&self) -> Result<(), StoreError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.state.lock().await.delivered.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reminder::{CalendarTrigger, NotificationContent};

    fn registration(identifier: &str) -> PendingRegistration {
        PendingRegistration {
            identifier: identifier.to_string(),
            content: NotificationContent {
                title: "t".to_string(),
                body: "b".to_string(),
            },
            trigger: CalendarTrigger {
                year: 2024,
                month: 12,
                day: 25,
                hour: 9,
                minute: 0,
            },
        }
    }

    #[tokio::test]
    async fn register_then_remove_is_selective() {
        let store = InMemoryNotificationStore::new();
        store.register(registration("a")).await.unwrap();
        store.register(registration("b")).await.unwrap();

        store.remove(&["a".to_string()]).await.unwrap();
        let pending = store.pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].identifier, "b");
    }

    #[tokio::test]
    async fn mark_delivered_moves_between_lists() {
        let store = InMemoryNotificationStore::new();
        store.register(registration("a")).await.unwrap();
        store.mark_delivered("a").await;

        assert!(store.pending().await.unwrap().is_empty());
        assert_eq!(store.delivered().await.unwrap(), vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn armed_failure_rejects_only_that_identifier() {
        let store = InMemoryNotificationStore::new();
        store.fail_registration_of("bad").await;

        assert!(store.register(registration("bad")).await.is_err());
        assert!(store.register(registration("good")).await.is_ok());
        assert_eq!(store.pending_len().await, 1);
    }
}
