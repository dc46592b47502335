// Module exports for models

pub mod appointment;
pub mod identifier;
pub mod reminder;
