//! Store abstraction traits
//!
//! Every backend implements both traits. Calls are always scoped by the
//! owning user; row-level policy in the hosted store enforces the same rule
//! again on its side.

use crate::core::schedule::DayRange;
use crate::domain::{
    Appointment, AppointmentId, AppointmentPatch, MutationOutcome, NewAppointment, Patient,
    Result, UserId,
};
use async_trait::async_trait;

/// Read access to the signed-in user's patients
#[async_trait]
pub trait PatientDirectory: Send + Sync {
    /// Lists the owner's patients ordered by display name ascending
    ///
    /// # Errors
    ///
    /// Returns [`AgendaError::Access`](crate::domain::AgendaError::Access) if
    /// the store refuses the listing and
    /// [`AgendaError::Fetch`](crate::domain::AgendaError::Fetch) for any other
    /// failure.
    async fn list_patients(&self, owner: &UserId) -> Result<Vec<Patient>>;
}

/// Appointment persistence scoped to an owner
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Lists the owner's appointments whose start falls within `range`
    /// (both bounds inclusive), joined with the patient's display name and
    /// ordered by start ascending
    async fn list_appointments_in_range(
        &self,
        owner: &UserId,
        range: &DayRange,
    ) -> Result<Vec<Appointment>>;

    /// Lists the owner's appointments for one local calendar day
    ///
    /// # Errors
    ///
    /// Returns [`AgendaError::Fetch`](crate::domain::AgendaError::Fetch) on
    /// transport or store failure. Callers treat that as an empty day.
    async fn list_appointments_for_day(
        &self,
        owner: &UserId,
        day: &DayRange,
    ) -> Result<Vec<Appointment>> {
        self.list_appointments_in_range(owner, day).await
    }

    /// Inserts a new appointment
    ///
    /// # Errors
    ///
    /// Returns [`AgendaError::Write`](crate::domain::AgendaError::Write) if the
    /// store rejects the row, for example on a duplicate instant.
    async fn create_appointment(&self, appointment: &NewAppointment) -> Result<()>;

    /// Updates the row matching both `id` and `owner`
    ///
    /// A zero-row match is reported through [`MutationOutcome`], not as an error.
    async fn update_appointment(
        &self,
        id: &AppointmentId,
        owner: &UserId,
        patch: &AppointmentPatch,
    ) -> Result<MutationOutcome>;

    /// Deletes the row matching both `id` and `owner`
    ///
    /// A zero-row match is reported through [`MutationOutcome`], not as an error.
    async fn delete_appointment(&self, id: &AppointmentId, owner: &UserId)
        -> Result<MutationOutcome>;
}

/// A backend that serves both patients and appointments
pub trait ScheduleStore: PatientDirectory + AppointmentRepository {
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}
