//! Wire models for the PostgREST and GoTrue endpoints

use crate::domain::{Appointment, AppointmentId, Patient, PatientId, StoreError};
use serde::Deserialize;

/// Table holding patients
pub const PATIENTS_TABLE: &str = "tb_patients";

/// Table holding appointments
pub const APPOINTMENTS_TABLE: &str = "tb_appointments";

/// Columns requested for appointment listings, with the embedded patient
pub const APPOINTMENT_SELECT: &str =
    "id,patient_id,appointment_datetime,duration_minutes,notes,tb_patients(id,fullname)";

/// A `tb_patients` row
#[derive(Debug, Clone, Deserialize)]
pub struct PatientRow {
    pub id: String,
    pub fullname: String,
}

impl PatientRow {
    /// Converts to the domain model
    pub fn into_domain(self) -> Result<Patient, StoreError> {
        let id = PatientId::new(self.id).map_err(StoreError::InvalidResponse)?;
        Ok(Patient::new(id, self.fullname))
    }
}

/// Embedded patient relation
///
/// Arrives as an object for a to-one relationship and as an array otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EmbeddedPatient {
    One(PatientRow),
    Many(Vec<PatientRow>),
}

impl EmbeddedPatient {
    fn first(self) -> Option<PatientRow> {
        match self {
            EmbeddedPatient::One(row) => Some(row),
            EmbeddedPatient::Many(rows) => rows.into_iter().next(),
        }
    }
}

/// A `tb_appointments` row with its embedded patient
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentRow {
    pub id: String,
    pub patient_id: String,
    pub appointment_datetime: String,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tb_patients: Option<EmbeddedPatient>,
}

impl AppointmentRow {
    /// Converts to the domain model
    pub fn into_domain(self) -> Result<Appointment, StoreError> {
        let patient = match self.tb_patients.and_then(EmbeddedPatient::first) {
            Some(row) => Some(row.into_domain()?),
            None => None,
        };
        Ok(Appointment {
            id: AppointmentId::new(self.id).map_err(StoreError::InvalidResponse)?,
            patient_id: PatientId::new(self.patient_id).map_err(StoreError::InvalidResponse)?,
            appointment_datetime: self.appointment_datetime,
            duration_minutes: self.duration_minutes,
            notes: self.notes,
            patient,
        })
    }
}

/// Error body returned by PostgREST and GoTrue
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// Best human-readable message, falling back to the raw body
    pub fn describe(raw: &str) -> String {
        match serde_json::from_str::<ApiErrorBody>(raw) {
            Ok(body) => body
                .message
                .or(body.error_description)
                .or(body.msg)
                .unwrap_or_else(|| raw.to_string()),
            Err(_) => raw.to_string(),
        }
    }
}

/// Password sign-in request
#[derive(Debug, serde::Serialize)]
pub struct PasswordGrantRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Sign-in response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// User part of a sign-in response
#[derive(Debug, Deserialize)]
pub struct AuthUser {
    pub id: String,
}
