//! PostgreSQL adapter implementing the store traits

use super::client::PostgreSQLClient;
use super::models::{
    appointment_from_row, patient_from_row, DELETE_APPOINTMENT_SQL, INSERT_APPOINTMENT_SQL,
    LIST_APPOINTMENTS_SQL, LIST_PATIENTS_SQL, UPDATE_APPOINTMENT_SQL,
};
use crate::adapters::store::traits::{AppointmentRepository, PatientDirectory, ScheduleStore};
use crate::core::schedule::DayRange;
use crate::domain::{
    AgendaError, Appointment, AppointmentId, AppointmentPatch, MutationOutcome, NewAppointment,
    Patient, Result, StoreError, UserId,
};
use crate::{log_fetch_start, log_mutation};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// PostgreSQL implementation of the store traits
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }
}

#[async_trait]
impl PatientDirectory for PostgreSQLAdapter {
    async fn list_patients(&self, owner: &UserId) -> Result<Vec<Patient>> {
        log_fetch_start!("patients", owner);

        let rows = self
            .client
            .query(LIST_PATIENTS_SQL, &[&owner.as_str()])
            .await
            .map_err(|e| AgendaError::fetch("patients", e))?;

        rows.iter()
            .map(|row| patient_from_row(row).map_err(|e| AgendaError::fetch("patients", e)))
            .collect()
    }
}

#[async_trait]
impl AppointmentRepository for PostgreSQLAdapter {
    async fn list_appointments_in_range(
        &self,
        owner: &UserId,
        range: &DayRange,
    ) -> Result<Vec<Appointment>> {
        log_fetch_start!("appointments", owner, range.first_date());

        let start: DateTime<Utc> = range.start().with_timezone(&Utc);
        let end: DateTime<Utc> = range.end().with_timezone(&Utc);
        let rows = self
            .client
            .query(LIST_APPOINTMENTS_SQL, &[&owner.as_str(), &start, &end])
            .await
            .map_err(|e| AgendaError::fetch("appointments", e))?;

        rows.iter()
            .map(|row| {
                appointment_from_row(row).map_err(|e| AgendaError::fetch("appointments", e))
            })
            .collect()
    }

    async fn create_appointment(&self, appointment: &NewAppointment) -> Result<()> {
        let inserted = self
            .client
            .execute(
                INSERT_APPOINTMENT_SQL,
                &[
                    &appointment.user_id.as_str(),
                    &appointment.patient_id.as_str(),
                    &appointment.appointment_datetime,
                    &appointment.notes,
                ],
            )
            .await
            .map_err(|e| AgendaError::write("create", e))?;

        if inserted == 0 {
            return Err(AgendaError::write(
                "create",
                StoreError::ConstraintViolation(format!(
                    "patient {} does not belong to the signed-in user",
                    appointment.patient_id
                )),
            ));
        }

        tracing::info!(
            user_id = %appointment.user_id,
            patient_id = %appointment.patient_id,
            at = %appointment.appointment_datetime,
            "Appointment created"
        );
        Ok(())
    }

    async fn update_appointment(
        &self,
        id: &AppointmentId,
        owner: &UserId,
        patch: &AppointmentPatch,
    ) -> Result<MutationOutcome> {
        let patient_id = patch.patient_id.as_ref().map(|p| p.as_str());
        let affected = self
            .client
            .execute(
                UPDATE_APPOINTMENT_SQL,
                &[
                    &id.as_str(),
                    &owner.as_str(),
                    &patient_id,
                    &patch.appointment_datetime,
                    &patch.notes,
                ],
            )
            .await
            .map_err(|e| AgendaError::write("update", e))?;

        log_mutation!("update", id, affected);
        Ok(MutationOutcome::new(affected))
    }

    async fn delete_appointment(
        &self,
        id: &AppointmentId,
        owner: &UserId,
    ) -> Result<MutationOutcome> {
        let affected = self
            .client
            .execute(DELETE_APPOINTMENT_SQL, &[&id.as_str(), &owner.as_str()])
            .await
            .map_err(|e| AgendaError::write("delete", e))?;

        log_mutation!("delete", id, affected);
        Ok(MutationOutcome::new(affected))
    }
}

impl ScheduleStore for PostgreSQLAdapter {
    fn backend_name(&self) -> &'static str {
        "postgresql"
    }
}
