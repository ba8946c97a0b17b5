//! REST store implementing the store traits

use super::client::RestClient;
use super::models::{
    AppointmentRow, PatientRow, APPOINTMENTS_TABLE, APPOINTMENT_SELECT, PATIENTS_TABLE,
};
use crate::adapters::store::traits::{AppointmentRepository, PatientDirectory, ScheduleStore};
use crate::core::schedule::DayRange;
use crate::domain::{
    AgendaError, Appointment, AppointmentId, AppointmentPatch, MutationOutcome, NewAppointment,
    Patient, Result, UserId,
};
use crate::{log_fetch_start, log_mutation};
use async_trait::async_trait;

/// Store backed by the hosted project's PostgREST interface
pub struct RestStore {
    client: RestClient,
}

impl RestStore {
    /// Creates a store over an authenticated client
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// The underlying client
    pub fn client(&self) -> &RestClient {
        &self.client
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

fn row_filter(id: &AppointmentId, owner: &UserId) -> [(&'static str, String); 2] {
    [("id", eq(id)), ("user_id", eq(owner))]
}

#[async_trait]
impl PatientDirectory for RestStore {
    async fn list_patients(&self, owner: &UserId) -> Result<Vec<Patient>> {
        log_fetch_start!("patients", owner);

        let rows: Vec<PatientRow> = self
            .client
            .select(
                PATIENTS_TABLE,
                &[
                    ("select", "id,fullname".to_string()),
                    ("user_id", eq(owner)),
                    ("order", "fullname.asc".to_string()),
                ],
            )
            .await
            .map_err(|e| AgendaError::fetch("patients", e))?;

        rows.into_iter()
            .map(|row| row.into_domain().map_err(|e| AgendaError::fetch("patients", e)))
            .collect()
    }
}

#[async_trait]
impl AppointmentRepository for RestStore {
    async fn list_appointments_in_range(
        &self,
        owner: &UserId,
        range: &DayRange,
    ) -> Result<Vec<Appointment>> {
        log_fetch_start!("appointments", owner, range.first_date());

        let rows: Vec<AppointmentRow> = self
            .client
            .select(
                APPOINTMENTS_TABLE,
                &[
                    ("select", APPOINTMENT_SELECT.to_string()),
                    ("user_id", eq(owner)),
                    ("appointment_datetime", format!("gte.{}", range.start_rfc3339())),
                    ("appointment_datetime", format!("lte.{}", range.end_rfc3339())),
                    ("order", "appointment_datetime.asc".to_string()),
                ],
            )
            .await
            .map_err(|e| AgendaError::fetch("appointments", e))?;

        let appointments = rows
            .into_iter()
            .map(|row| {
                row.into_domain()
                    .map_err(|e| AgendaError::fetch("appointments", e))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            user_id = %owner,
            count = appointments.len(),
            "Appointments fetched"
        );
        Ok(appointments)
    }

    async fn create_appointment(&self, appointment: &NewAppointment) -> Result<()> {
        self.client
            .insert(APPOINTMENTS_TABLE, appointment)
            .await
            .map_err(|e| AgendaError::write("create", e))?;

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
        let affected = self
            .client
            .update(APPOINTMENTS_TABLE, &row_filter(id, owner), patch)
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
            .delete(APPOINTMENTS_TABLE, &row_filter(id, owner))
            .await
            .map_err(|e| AgendaError::write("delete", e))?;

        log_mutation!("delete", id, affected);
        Ok(MutationOutcome::new(affected))
    }
}

impl ScheduleStore for RestStore {
    fn backend_name(&self) -> &'static str {
        "rest"
    }
}
