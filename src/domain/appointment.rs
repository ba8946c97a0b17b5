//! Appointment domain model
//!
//! An appointment belongs to exactly one patient and one owning user. The
//! stored instant is kept as the raw string the store returned so a malformed
//! value never prevents the rest of the day from rendering.

use super::ids::{AppointmentId, PatientId, UserId};
use super::patient::Patient;
use super::slot::SlotTime;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// An appointment row joined with its patient's display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// Unique appointment identifier
    pub id: AppointmentId,

    /// Patient the appointment is for
    pub patient_id: PatientId,

    /// Start instant as stored (timezone-aware, ISO 8601)
    pub appointment_datetime: String,

    /// Informational duration, not used for slot matching
    #[serde(default)]
    pub duration_minutes: Option<i32>,

    /// Free-text notes
    #[serde(default)]
    pub notes: Option<String>,

    /// Joined patient record, when the store returned one
    #[serde(default)]
    pub patient: Option<Patient>,
}

impl Appointment {
    /// Parses the stored start instant
    ///
    /// Returns `None` if the stored value is malformed.
    pub fn starts_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_instant(&self.appointment_datetime)
    }

    /// Local wall-clock time of the appointment at minute resolution
    pub fn local_time<Tz: TimeZone>(&self, tz: &Tz) -> Option<SlotTime> {
        self.starts_at()
            .map(|instant| SlotTime::from_naive(instant.with_timezone(tz).time()))
    }

    /// Patient display name, if the join returned one
    pub fn patient_name(&self) -> Option<&str> {
        self.patient.as_ref().map(|p| p.fullname.as_str())
    }

    /// Notes, treating an empty string as absent
    pub fn notes_text(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.trim().is_empty())
    }
}

/// Parses a timezone-aware instant in the formats the stores emit
///
/// Accepts RFC 3339 (`2025-03-14T09:00:00-03:00`) as well as the Postgres
/// text form (`2025-03-14 12:00:00+00`).
///
/// # Examples
///
/// ```
/// use agenda::domain::appointment::parse_instant;
///
/// assert!(parse_instant("2025-03-14T12:00:00Z").is_some());
/// assert!(parse_instant("2025-03-14 12:00:00+00").is_some());
/// assert!(parse_instant("not a date").is_none());
/// ```
pub fn parse_instant(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z"))
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%#z"))
        .ok()
}

/// Data required to insert a new appointment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAppointment {
    /// Owning user
    pub user_id: UserId,

    /// Patient the appointment is for
    pub patient_id: PatientId,

    /// Absolute start instant
    pub appointment_datetime: DateTime<Utc>,

    /// Optional notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Fields that may change on an existing appointment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppointmentPatch {
    /// New patient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<PatientId>,

    /// New start instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_datetime: Option<DateTime<Utc>>,

    /// New notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AppointmentPatch {
    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.patient_id.is_none() && self.appointment_datetime.is_none() && self.notes.is_none()
    }
}

/// Number of rows a mutation touched
///
/// Stores do not treat a zero-row update or delete as an error; callers decide
/// what a zero means for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationOutcome {
    /// Rows matched by id and owner
    pub affected_rows: u64,
}

impl MutationOutcome {
    /// Creates an outcome for `affected_rows` rows
    pub fn new(affected_rows: u64) -> Self {
        Self { affected_rows }
    }

    /// Whether no row matched
    pub fn is_noop(&self) -> bool {
        self.affected_rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment_at(raw: &str) -> Appointment {
        Appointment {
            id: AppointmentId::new("a1").unwrap(),
            patient_id: PatientId::new("p1").unwrap(),
            appointment_datetime: raw.to_string(),
            duration_minutes: Some(50),
            notes: Some("   ".to_string()),
            patient: Some(Patient::new(PatientId::new("p1").unwrap(), "Ana")),
        }
    }

    #[test]
    fn test_local_time_in_fixed_offset() {
        let appointment = appointment_at("2025-03-14T12:00:00+00:00");
        let sao_paulo = FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(
            appointment.local_time(&sao_paulo).unwrap().label(),
            "09:00"
        );
        assert_eq!(appointment.local_time(&Utc).unwrap().label(), "12:00");
    }

    #[test]
    fn test_postgres_text_form() {
        let appointment = appointment_at("2025-03-14 12:30:00+00");
        assert_eq!(appointment.local_time(&Utc).unwrap().label(), "12:30");
    }

    #[test]
    fn test_malformed_instant() {
        let appointment = appointment_at("14/03/2025 09h");
        assert!(appointment.starts_at().is_none());
        assert!(appointment.local_time(&Utc).is_none());
    }

    #[test]
    fn test_blank_notes_are_absent() {
        let appointment = appointment_at("2025-03-14T12:00:00Z");
        assert_eq!(appointment.notes_text(), None);
        assert_eq!(appointment.patient_name(), Some("Ana"));
    }

    #[test]
    fn test_patch_serialization_skips_unset_fields() {
        let patch = AppointmentPatch {
            notes: Some("follow-up".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"notes": "follow-up"}));
        assert!(AppointmentPatch::default().is_empty());
    }

    #[test]
    fn test_new_appointment_serializes_iso_instant() {
        let new = NewAppointment {
            user_id: UserId::new("u1").unwrap(),
            patient_id: PatientId::new("p1").unwrap(),
            appointment_datetime: Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap(),
            notes: None,
        };
        let json = serde_json::to_value(&new).unwrap();
        assert_eq!(json["appointment_datetime"], "2025-03-14T12:00:00Z");
        assert!(json.get("notes").is_none());
    }
}
