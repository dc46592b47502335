// Service module exports

pub mod badge;
pub mod cancellation;
pub mod notification_store;
pub mod policy;
pub mod preferences;
pub mod presenter;
pub mod scheduler;
pub mod trigger;
