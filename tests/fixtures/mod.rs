// Test fixtures - reusable test data
// Shared builders for integration tests

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use clinic_reminders::models::appointment::AppointmentRequest;
use clinic_reminders::services::notification_store::{
    InMemoryNotificationStore, PermissionAuthorizer, StoreError,
};

/// Route engine logs through the test harness when RUST_LOG is set.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Returns a local instant, panicking on invalid components (tests only).
pub fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

/// The booking used across scenarios: Ana's cardiology appointment on
/// Christmas morning.
pub fn christmas_booking() -> AppointmentRequest {
    AppointmentRequest {
        patient_name: "Ana Souza".to_string(),
        provider_name: "Dr. Pereira".to_string(),
        specialty: "Cardiology".to_string(),
        date: "2024-12-25".to_string(),
        time: "10:00".to_string(),
    }
}

/// A second, unrelated booking for selectivity assertions.
pub fn other_booking() -> AppointmentRequest {
    AppointmentRequest {
        patient_name: "João Lima".to_string(),
        provider_name: "Dr. Costa".to_string(),
        specialty: "Dermatology".to_string(),
        date: "2024-12-26".to_string(),
        time: "14:30".to_string(),
    }
}

pub fn fresh_store() -> Arc<InMemoryNotificationStore> {
    Arc::new(InMemoryNotificationStore::new())
}

/// Permission prompt stub that always grants.
pub struct AlwaysGrants;

#[async_trait]
impl PermissionAuthorizer for AlwaysGrants {
    async fn request_authorization(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
