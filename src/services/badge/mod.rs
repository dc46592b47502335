// Badge counter
// Aggregates pending + delivered reminder counts for the UI badge

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::services::notification_store::{NotificationStore, StoreError};

/// Publishes the combined pending + delivered reminder count.
///
/// The published value is an atomic the UI reads directly; it only moves
/// after both store queries complete.
pub struct BadgeCounter {
    store: Arc<dyn NotificationStore>,
    total: Arc<AtomicUsize>,
}

impl BadgeCounter {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self {
            store,
            total: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Query pending and delivered counts concurrently and publish the sum.
    ///
    /// The two queries have no ordering requirement between them; the
    /// barrier is that nothing is published until both have returned.
    pub async fn refresh(&self) -> Result<usize, StoreError> {
        let (pending, delivered) = tokio::join!(self.store.pending(), self.store.delivered());
        let total = pending?.len() + delivered?.len();
        self.total.store(total, Ordering::SeqCst);
        log::debug!("badge count refreshed: {}", total);
        Ok(total)
    }

    /// Reminders registered but not yet fired.
    pub async fn pending_count(&self) -> Result<usize, StoreError> {
        Ok(self.store.pending().await?.len())
    }

    /// Reminders fired but not yet cleared.
    pub async fn delivered_count(&self) -> Result<usize, StoreError> {
        Ok(self.store.delivered().await?.len())
    }

    /// Reset the published count without touching the OS store. UI-only;
    /// registrations stay pending until removed for real.
    pub fn clear(&self) {
        self.total.store(0, Ordering::SeqCst);
    }

    /// Last published value.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Shared handle for UI code observing the badge.
    pub fn published(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.total)
    }
}
