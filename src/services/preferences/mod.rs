//! Notification preference store.
//!
//! One persisted boolean gating whether fired reminders are presented.
//! Loaded on construction, written through on every change, default off
//! until the user opts in.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::notification_store::{NotificationStore, PermissionAuthorizer, StoreError};

#[derive(Debug, Error)]
pub enum PreferenceError {
    /// The OS denied notification permission; the flag has been forced off.
    /// Carries the human-readable OS reason. No automatic retry.
    #[error("notification permission denied: {0}")]
    PermissionDenied(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to persist notification preference: {0}")]
    Persistence(#[source] anyhow::Error),
}

/// What disabling notifications does to registrations already in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableBehavior {
    /// Remove every pending and delivered registration as well as gating
    /// presentation. This is what the shipped app does; it is destructive
    /// and cannot be undone by re-enabling.
    ClearAll,
    /// Leave registrations in place and only suppress presentation.
    SuppressOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
struct PreferenceSnapshot {
    notifications_enabled: bool,
}

/// Process-wide enabled/disabled flag for reminder presentation.
///
/// Explicitly constructed and owned by the composition root. The flag is
/// shared with [`crate::services::presenter::PresentationGate`] through an
/// atomic so the OS presentation callback never blocks on this store.
pub struct NotificationPreferenceStore {
    enabled: Arc<AtomicBool>,
    path: PathBuf,
    store: Arc<dyn NotificationStore>,
    authorizer: Arc<dyn PermissionAuthorizer>,
}

impl NotificationPreferenceStore {
    /// Open the store at the platform default config location.
    pub fn open(
        store: Arc<dyn NotificationStore>,
        authorizer: Arc<dyn PermissionAuthorizer>,
    ) -> Result<Self> {
        Self::open_at(&default_preference_path()?, store, authorizer)
    }

    /// Open the store against an explicit preference file, creating state
    /// from defaults when the file does not exist yet.
    pub fn open_at(
        path: &Path,
        store: Arc<dyn NotificationStore>,
        authorizer: Arc<dyn PermissionAuthorizer>,
    ) -> Result<Self> {
        let snapshot = load_snapshot(path)?;
        Ok(Self {
            enabled: Arc::new(AtomicBool::new(snapshot.notifications_enabled)),
            path: path.to_path_buf(),
            store,
            authorizer,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Shared view of the flag for the presentation gate.
    pub fn enabled_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.enabled)
    }

    /// Turn presentation on, prompting for OS permission first.
    ///
    /// On denial the flag is forced off, persisted, and the OS reason is
    /// surfaced to the caller; there is no retry loop.
    pub async fn enable(&self) -> Result<(), PreferenceError> {
        let granted = match self.authorizer.request_authorization().await {
            Ok(granted) => granted,
            Err(err) => {
                self.set_and_persist(false)?;
                return Err(PreferenceError::PermissionDenied(err.reason));
            }
        };

        if !granted {
            self.set_and_persist(false)?;
            return Err(PreferenceError::PermissionDenied(
                "the user declined notification authorization".to_string(),
            ));
        }

        self.set_and_persist(true)?;
        log::info!("reminder notifications enabled");
        Ok(())
    }

    /// Turn presentation off.
    ///
    /// With [`DisableBehavior::ClearAll`] this also removes every pending
    /// and delivered registration from the OS store.
    pub async fn disable(&self, behavior: DisableBehavior) -> Result<(), PreferenceError> {
        self.set_and_persist(false)?;

        if behavior == DisableBehavior::ClearAll {
            self.store.remove_all_pending().await?;
            self.store.clear_delivered().await?;
            log::info!("reminder notifications disabled, all registrations cleared");
        } else {
            log::info!("reminder notifications disabled, registrations left in place");
        }
        Ok(())
    }

    fn set_and_persist(&self, enabled: bool) -> Result<(), PreferenceError> {
        self.enabled.store(enabled, Ordering::SeqCst);
        save_snapshot(
            &self.path,
            &PreferenceSnapshot {
                notifications_enabled: enabled,
            },
        )
        .map_err(PreferenceError::Persistence)
    }
}

fn default_preference_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("com", "clinic", "clinic-reminders")
        .ok_or_else(|| anyhow!("no home directory available for preference storage"))?;
    Ok(dirs.config_dir().join("notification_preference.json"))
}

fn load_snapshot(path: &Path) -> Result<PreferenceSnapshot> {
    if !path.exists() {
        return Ok(PreferenceSnapshot::default());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read preference from {}", path.display()))?;
    let snapshot = serde_json::from_str(&data)
        .with_context(|| format!("failed to deserialize preference from {}", path.display()))?;
    Ok(snapshot)
}

fn save_snapshot(path: &Path, snapshot: &PreferenceSnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create dir {}", parent.display()))?;
    }

    let data = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, data)
        .with_context(|| format!("failed to write preference to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reminder::{CalendarTrigger, NotificationContent};
    use crate::services::notification_store::{InMemoryNotificationStore, PendingRegistration};
    use async_trait::async_trait;

    struct FakeAuthorizer {
        response: Result<bool, String>,
    }

    #[async_trait]
    impl PermissionAuthorizer for FakeAuthorizer {
        async fn request_authorization(&self) -> Result<bool, StoreError> {
            self.response.clone().map_err(StoreError::new)
        }
    }

    fn granting() -> Arc<FakeAuthorizer> {
        Arc::new(FakeAuthorizer { response: Ok(true) })
    }

    fn empty_store() -> Arc<InMemoryNotificationStore> {
        Arc::new(InMemoryNotificationStore::new())
    }

    async fn seed(store: &InMemoryNotificationStore, identifier: &str) {
        store
            .register(PendingRegistration {
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
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn defaults_to_disabled_until_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pref.json");
        let prefs =
            NotificationPreferenceStore::open_at(&path, empty_store(), granting())
                .unwrap();

        assert!(!prefs.is_enabled());
        prefs.enable().await.unwrap();
        assert!(prefs.is_enabled());
    }

    #[tokio::test]
    async fn flag_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pref.json");
        let store = empty_store();

        let prefs =
            NotificationPreferenceStore::open_at(&path, store.clone(), granting()).unwrap();
        prefs.enable().await.unwrap();
        drop(prefs);

        let reopened =
            NotificationPreferenceStore::open_at(&path, store, granting()).unwrap();
        assert!(reopened.is_enabled());
    }

    #[tokio::test]
    async fn denial_forces_flag_off_with_reason() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pref.json");
        let denying = Arc::new(FakeAuthorizer {
            response: Err("notifications are restricted on this device".to_string()),
        });
        let prefs =
            NotificationPreferenceStore::open_at(&path, empty_store(), denying)
                .unwrap();

        let err = prefs.enable().await.unwrap_err();

        match err {
            PreferenceError::PermissionDenied(reason) => {
                assert_eq!(reason, "notifications are restricted on this device");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!prefs.is_enabled());
    }

    #[tokio::test]
    async fn clear_all_disable_empties_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pref.json");
        let store = empty_store();
        seed(&store, "appt|k|60|1735120800").await;
        store.mark_delivered("appt|k|60|1735120800").await;
        seed(&store, "appt|k|15|1735120800").await;

        let prefs =
            NotificationPreferenceStore::open_at(&path, store.clone(), granting()).unwrap();
        prefs.disable(DisableBehavior::ClearAll).await.unwrap();

        assert!(!prefs.is_enabled());
        assert!(store.pending().await.unwrap().is_empty());
        assert!(store.delivered().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn suppress_only_disable_keeps_registrations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pref.json");
        let store = empty_store();
        seed(&store, "appt|k|60|1735120800").await;

        let prefs =
            NotificationPreferenceStore::open_at(&path, store.clone(), granting()).unwrap();
        prefs.disable(DisableBehavior::SuppressOnly).await.unwrap();

        assert!(!prefs.is_enabled());
        assert_eq!(store.pending_len().await, 1);
    }
}
