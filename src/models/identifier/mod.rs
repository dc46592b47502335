// Reminder identifier codec
// Wire format for registration identifiers in the OS notification store

use crate::models::appointment::AppointmentKey;
use std::fmt;

/// Prefix marking registrations owned by this engine. The notification
/// store is shared system-wide; anything without the prefix is foreign and
/// must never match during cancellation.
const PREFIX: &str = "appt";
const SEPARATOR: char = '|';

/// Decoded form of one registration identifier.
///
/// Unique per `(key, lead_minutes)`. Scheduling the same appointment again
/// without cancelling first re-encodes the same identifiers but the store
/// treats each registration independently, so duplicates accumulate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderIdentifier {
    pub key: AppointmentKey,
    pub lead_minutes: i64,
    /// Unix timestamp of the appointment itself, not of the trigger.
    pub appointment_ts: i64,
}

impl ReminderIdentifier {
    pub fn new(key: AppointmentKey, lead_minutes: i64, appointment_ts: i64) -> Self {
        Self {
            key,
            lead_minutes,
            appointment_ts,
        }
    }

    /// Stable wire form: `appt|<key>|<lead>|<ts>`.
    pub fn encode(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}{sep}{}",
            PREFIX,
            self.key,
            self.lead_minutes,
            self.appointment_ts,
            sep = SEPARATOR
        )
    }

    /// Parse an identifier back into its fields.
    ///
    /// Total: returns `None` for anything that is not exactly four
    /// `|`-separated fields with our prefix and numeric lead/timestamp.
    /// Substring containment is deliberately not used, so a key that is a
    /// prefix of another key can never produce a false match.
    pub fn decode(raw: &str) -> Option<Self> {
        let mut parts = raw.split(SEPARATOR);
        let prefix = parts.next()?;
        if prefix != PREFIX {
            return None;
        }
        let key = parts.next()?;
        if key.is_empty() {
            return None;
        }
        let lead_minutes = parts.next()?.parse::<i64>().ok()?;
        let appointment_ts = parts.next()?.parse::<i64>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            key: AppointmentKey::from_raw(key),
            lead_minutes,
            appointment_ts,
        })
    }

    /// Whether this identifier belongs to the given appointment.
    pub fn belongs_to(&self, key: &AppointmentKey) -> bool {
        &self.key == key
    }
}

impl fmt::Display for ReminderIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
