//! Row mapping for the PostgreSQL backend
//!
//! Identifiers are selected as text (`id::text AS id`) so rows map onto the
//! opaque domain ids without a uuid dependency.

use crate::domain::{Appointment, AppointmentId, Patient, PatientId, StoreError};
use chrono::{DateTime, SecondsFormat, Utc};
use tokio_postgres::Row;

/// Patient listing ordered by display name
pub const LIST_PATIENTS_SQL: &str = "\
    SELECT id::text AS id, fullname \
    FROM tb_patients \
    WHERE user_id = $1::text::uuid \
    ORDER BY fullname ASC";

/// Appointment listing for an inclusive instant range, joined to the patient
pub const LIST_APPOINTMENTS_SQL: &str = "\
    SELECT a.id::text AS id, a.patient_id::text AS patient_id, \
           a.appointment_datetime, a.duration_minutes, a.notes, \
           p.id::text AS patient_ref, p.fullname AS patient_fullname \
    FROM tb_appointments a \
    LEFT JOIN tb_patients p ON p.id = a.patient_id \
    WHERE a.user_id = $1::text::uuid \
      AND a.appointment_datetime >= $2 \
      AND a.appointment_datetime <= $3 \
    ORDER BY a.appointment_datetime ASC";

/// Insert guarded by patient ownership; zero rows means the patient is not the owner's
pub const INSERT_APPOINTMENT_SQL: &str = "\
    INSERT INTO tb_appointments (user_id, patient_id, appointment_datetime, notes) \
    SELECT $1::text::uuid, p.id, $3::timestamptz, $4::text \
    FROM tb_patients p \
    WHERE p.id = $2::text::uuid AND p.user_id = $1::text::uuid";

/// Partial update; NULL parameters keep the current value
pub const UPDATE_APPOINTMENT_SQL: &str = "\
    UPDATE tb_appointments SET \
        patient_id = COALESCE($3::text::uuid, patient_id), \
        appointment_datetime = COALESCE($4::timestamptz, appointment_datetime), \
        notes = COALESCE($5::text, notes) \
    WHERE id = $1::text::uuid AND user_id = $2::text::uuid \
      AND ($3::text IS NULL OR EXISTS ( \
          SELECT 1 FROM tb_patients p \
          WHERE p.id = $3::text::uuid AND p.user_id = $2::text::uuid))";

/// Delete by id and owner
pub const DELETE_APPOINTMENT_SQL: &str = "\
    DELETE FROM tb_appointments \
    WHERE id = $1::text::uuid AND user_id = $2::text::uuid";

fn column<'a, T: tokio_postgres::types::FromSql<'a>>(
    row: &'a Row,
    name: &str,
) -> Result<T, StoreError> {
    row.try_get(name)
        .map_err(|e| StoreError::InvalidResponse(format!("Column {name}: {e}")))
}

/// Maps a patient row
pub fn patient_from_row(row: &Row) -> Result<Patient, StoreError> {
    let id: String = column(row, "id")?;
    let fullname: String = column(row, "fullname")?;
    Ok(Patient::new(
        PatientId::new(id).map_err(StoreError::InvalidResponse)?,
        fullname,
    ))
}

/// Maps an appointment row with its joined patient
pub fn appointment_from_row(row: &Row) -> Result<Appointment, StoreError> {
    let id: String = column(row, "id")?;
    let patient_id: String = column(row, "patient_id")?;
    let starts_at: DateTime<Utc> = column(row, "appointment_datetime")?;
    let patient_ref: Option<String> = column(row, "patient_ref")?;
    let patient_fullname: Option<String> = column(row, "patient_fullname")?;

    let patient = match (patient_ref, patient_fullname) {
        (Some(pid), Some(name)) => Some(Patient::new(
            PatientId::new(pid).map_err(StoreError::InvalidResponse)?,
            name,
        )),
        _ => None,
    };

    Ok(Appointment {
        id: AppointmentId::new(id).map_err(StoreError::InvalidResponse)?,
        patient_id: PatientId::new(patient_id).map_err(StoreError::InvalidResponse)?,
        appointment_datetime: render_instant(&starts_at),
        duration_minutes: column(row, "duration_minutes")?,
        notes: column(row, "notes")?,
        patient,
    })
}

/// Renders a stored instant the way the REST backend returns it
pub fn render_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
