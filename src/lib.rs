// Clinic Reminders Library
// Exports all modules for the host app and for testing

pub mod models;
pub mod services;
