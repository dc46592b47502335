// Appointment module
// Booking input types and the deterministic appointment key

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while validating raw booking input.
///
/// A parse failure aborts reminder scheduling before any notification
/// registration is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid appointment date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid appointment time '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("appointment date/time '{0}' does not exist in the local timezone")]
    NonexistentLocalTime(String),
    #[error("patient name cannot be empty")]
    EmptyPatientName,
}

/// Raw booking data as the booking flow hands it over.
///
/// Date and time arrive as strings from the remote API; they are validated
/// by [`AppointmentContext::from_request`], not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub patient_name: String,
    pub provider_name: String,
    pub specialty: String,
    /// Appointment date, `YYYY-MM-DD`
    pub date: String,
    /// Appointment time, `HH:MM` (24h)
    pub time: String,
}

/// A validated appointment: identity fields plus a resolved local start time.
///
/// Immutable input to scheduling; supplied by the booking collaborator after
/// a booking is already confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentContext {
    pub patient_name: String,
    pub provider_name: String,
    pub specialty: String,
    pub start: DateTime<Local>,
}

impl AppointmentContext {
    /// Validate a raw booking request into a context.
    ///
    /// Fails fast on malformed date/time or an empty patient name so the
    /// caller never reaches the notification store with bad input.
    pub fn from_request(request: &AppointmentRequest) -> Result<Self, ParseError> {
        if request.patient_name.trim().is_empty() {
            return Err(ParseError::EmptyPatientName);
        }

        let date = NaiveDate::parse_from_str(&request.date, "%Y-%m-%d")
            .map_err(|_| ParseError::InvalidDate(request.date.clone()))?;
        let time = NaiveTime::parse_from_str(&request.time, "%H:%M")
            .map_err(|_| ParseError::InvalidTime(request.time.clone()))?;

        // DST gaps can make a wall-clock time nonexistent; ambiguous times
        // resolve to the earlier instant.
        let start = Local
            .from_local_datetime(&date.and_time(time))
            .earliest()
            .ok_or_else(|| {
                ParseError::NonexistentLocalTime(format!("{} {}", request.date, request.time))
            })?;

        Ok(Self {
            patient_name: request.patient_name.trim().to_string(),
            provider_name: request.provider_name.trim().to_string(),
            specialty: request.specialty.trim().to_string(),
            start,
        })
    }

    /// The deterministic key grouping every reminder of this appointment.
    pub fn key(&self) -> AppointmentKey {
        AppointmentKey::derive(&self.patient_name, self.start)
    }
}

/// Deterministic identifier derived from patient name + appointment start.
///
/// Reconstructible from the same inputs used to book, so cancellation needs
/// no separate lookup table. Two bookings for the same patient at the same
/// instant share a key by design.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppointmentKey(String);

impl AppointmentKey {
    pub fn derive(patient_name: &str, start: DateTime<Local>) -> Self {
        let slug = slugify(patient_name);
        Self(format!("{}-{}", slug, start.timestamp()))
    }

    /// Wrap an already-derived key string, e.g. one decoded from a stored
    /// registration identifier.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppointmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase the name, collapse whitespace runs to single hyphens, and drop
/// anything that is not alphanumeric so the key stays safe inside the
/// identifier wire format.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;
    for ch in name.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(date: &str, time: &str) -> AppointmentRequest {
        AppointmentRequest {
            patient_name: "Ana Souza".to_string(),
            provider_name: "Dr. Pereira".to_string(),
            specialty: "Cardiology".to_string(),
            date: date.to_string(),
            time: time.to_string(),
        }
    }

    #[test]
    fn parses_valid_request() {
        let context = AppointmentContext::from_request(&request("2024-12-25", "10:00")).unwrap();
        assert_eq!(context.patient_name, "Ana Souza");
        assert_eq!(context.start.format("%Y-%m-%d %H:%M").to_string(), "2024-12-25 10:00");
    }

    #[test]
    fn rejects_malformed_date() {
        let err = AppointmentContext::from_request(&request("2024-13-40", "10:00")).unwrap_err();
        assert_eq!(err, ParseError::InvalidDate("2024-13-40".to_string()));
    }

    #[test]
    fn rejects_malformed_time() {
        let err = AppointmentContext::from_request(&request("2024-12-25", "25:99")).unwrap_err();
        assert_eq!(err, ParseError::InvalidTime("25:99".to_string()));
    }

    #[test]
    fn rejects_empty_patient_name() {
        let mut req = request("2024-12-25", "10:00");
        req.patient_name = "   ".to_string();
        let err = AppointmentContext::from_request(&req).unwrap_err();
        assert_eq!(err, ParseError::EmptyPatientName);
    }

    #[test]
    fn key_is_reproducible_from_booking_inputs() {
        let context = AppointmentContext::from_request(&request("2024-12-25", "10:00")).unwrap();
        let rederived = AppointmentKey::derive("Ana Souza", context.start);
        assert_eq!(context.key(), rederived);
    }

    #[test]
    fn key_normalizes_patient_name() {
        let context = AppointmentContext::from_request(&request("2024-12-25", "10:00")).unwrap();
        let shouty = AppointmentKey::derive("  ANA   SOUZA ", context.start);
        assert_eq!(context.key(), shouty);
        assert!(context.key().as_str().starts_with("ana-souza-"));
    }

    #[test]
    fn slug_drops_punctuation() {
        assert_eq!(slugify("O'Brien, José"), "o-brien-josé");
        assert_eq!(slugify("---"), "");
    }
}
