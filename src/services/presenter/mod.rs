// Presentation gate
// Decides whether a fired reminder is shown while the app is foregrounded

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use notify_rust::{Notification, Timeout};

use crate::models::reminder::NotificationContent;

/// Consulted by the OS presentation callback when a reminder fires with the
/// app in the foreground.
///
/// The gate only controls whether the reminder is shown; the underlying
/// registration existed and fired regardless. The flag is the one handed
/// out by the preference store, read atomically so this path never blocks.
pub struct PresentationGate {
    enabled: Arc<AtomicBool>,
}

impl PresentationGate {
    pub fn new(enabled: Arc<AtomicBool>) -> Self {
        Self { enabled }
    }

    pub fn should_present(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Show the reminder on the desktop, or quietly do nothing while
    /// notifications are disabled.
    pub fn present(&self, content: &NotificationContent) -> Result<()> {
        if !self.should_present() {
            log::debug!("suppressing reminder presentation: notifications disabled");
            return Ok(());
        }

        Notification::new()
            .summary(&content.title)
            .body(&content.body)
            .timeout(Timeout::Milliseconds(5000))
            .show()
            .map_err(|e| anyhow::anyhow!("Failed to show notification: {}", e))?;

        Ok(())
    }
}
