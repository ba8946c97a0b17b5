//! Schedule coordinator
//!
//! Wires the view model, the form and a store together for one signed-in
//! user. Every user action is one method; each awaits its store call, records
//! a [`Notice`], resets the relevant loading flag, and returns. Nothing is
//! retried and nothing escalates past the action that failed.
//!
//! Mutations are never applied locally: a successful create, update or
//! delete is followed by a refetch of the selected day, so the grid always
//! shows the last server snapshot.

use crate::adapters::store::ScheduleStore;
use crate::config::ScheduleConfig;
use crate::core::calendar::{past_dates, CalendarPicker};
use crate::core::form::{AppointmentForm, Submission};
use crate::core::notice::Notice;
use crate::core::schedule::{DayView, FetchTicket, ScheduleViewModel};
use crate::core::stats::{dashboard_stats, DashboardStats};
use crate::domain::{
    AgendaError, AppointmentId, MutationOutcome, Result, Session, SlotTime, UserId,
};
use chrono::{NaiveDate, TimeZone};
use std::sync::Arc;

/// Drives the schedule screen for one user
pub struct ScheduleCoordinator<Tz: TimeZone> {
    store: Arc<dyn ScheduleStore>,
    owner: UserId,
    view: ScheduleViewModel<Tz>,
    form: AppointmentForm,
    pending_delete: Option<AppointmentId>,
    notices: Vec<Notice>,
    allow_past_dates: bool,
}

impl<Tz: TimeZone> ScheduleCoordinator<Tz> {
    /// Creates a coordinator for the session's user with `today` selected
    ///
    /// # Errors
    ///
    /// Returns [`AgendaError::Session`] if the session is not authenticated
    /// and [`AgendaError::Configuration`] if the default time is malformed.
    pub fn new(
        store: Arc<dyn ScheduleStore>,
        session: &Session,
        tz: Tz,
        today: NaiveDate,
        schedule: &ScheduleConfig,
    ) -> Result<Self> {
        let owner = session.user_id()?.clone();
        let default_time: SlotTime = schedule.default_time.parse().map_err(|e| {
            AgendaError::Configuration(format!("schedule.default_time: {e}"))
        })?;

        Ok(Self {
            store,
            owner,
            view: ScheduleViewModel::new(tz, today, schedule.strict_slot_matching),
            form: AppointmentForm::new(default_time),
            pending_delete: None,
            notices: Vec::new(),
            allow_past_dates: schedule.allow_past_dates,
        })
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn view(&self) -> &ScheduleViewModel<Tz> {
        &self.view
    }

    pub fn form(&self) -> &AppointmentForm {
        &self.form
    }

    /// Mutable access for editing form fields
    pub fn form_mut(&mut self) -> &mut AppointmentForm {
        &mut self.form
    }

    /// Loads the patient directory
    pub async fn load_patients(&mut self) -> Result<()> {
        self.view.begin_patients_fetch();
        let result = self.store.list_patients(&self.owner).await;
        self.view.complete_patients_fetch(result).map_err(|e| {
            self.notices
                .push(Notice::error(format!("Could not load patients: {e}")));
            e
        })
    }

    /// Selects `date` and loads its appointments
    ///
    /// # Errors
    ///
    /// Past dates are rejected unless `schedule.allow_past_dates` is set.
    pub async fn select_date(&mut self, date: NaiveDate) -> Result<()> {
        if !self.allow_past_dates && date < self.view.today() {
            let err = AgendaError::Validation(format!("{date} is in the past"));
            self.notices.push(Notice::error(err.to_string()));
            return Err(err);
        }
        let ticket = self.view.select_date(date);
        self.fetch(ticket).await
    }

    /// Reloads the selected date
    pub async fn refresh(&mut self) -> Result<()> {
        let ticket = self.view.begin_fetch();
        self.fetch(ticket).await
    }

    async fn fetch(&mut self, ticket: FetchTicket) -> Result<()> {
        let range = self.view.day_range();
        let result = self
            .store
            .list_appointments_for_day(&self.owner, &range)
            .await;

        match self.view.complete_fetch(ticket, result) {
            Ok(_) => Ok(()),
            Err(e) => {
                self.notices
                    .push(Notice::error(format!("Could not load appointments: {e}")));
                Err(e)
            }
        }
    }

    /// Opens the create dialog
    ///
    /// Refused while patients are loading or when the directory is empty.
    pub fn open_new(&mut self, prefill: Option<SlotTime>) -> Result<()> {
        let refusal = if self.view.is_loading_patients() {
            Some("Patients are still loading")
        } else if self.view.patients().is_empty() {
            Some("Register a patient before booking an appointment")
        } else {
            None
        };

        if let Some(message) = refusal {
            self.notices.push(Notice::info(message));
            return Err(AgendaError::Validation(message.to_string()));
        }

        self.form.open_for_create(self.view.patients(), prefill);
        Ok(())
    }

    /// Opens the edit dialog for an appointment of the loaded day
    pub fn open_edit(&mut self, id: &AppointmentId) -> Result<()> {
        let appointment = self
            .view
            .appointments()
            .iter()
            .find(|appointment| &appointment.id == id)
            .ok_or_else(|| {
                AgendaError::NotFound(format!(
                    "Appointment {id} is not on {}",
                    self.view.selected_date()
                ))
            })?;

        self.form.open_for_edit(appointment, self.view.timezone());
        Ok(())
    }

    /// Closes the dialog without saving
    pub fn close_dialog(&mut self) {
        self.form.close();
    }

    /// Validates and saves the open dialog, then refetches the day
    ///
    /// Validation failures make no store call. A failed save keeps the
    /// dialog open with its fields intact. An update that matches no row is
    /// reported as [`AgendaError::NotFound`].
    pub async fn submit(&mut self) -> Result<()> {
        let submission = match self.form.prepare(
            &self.owner,
            Some(self.view.selected_date()),
            self.view.timezone(),
        ) {
            Ok(submission) => submission,
            Err(e) => {
                self.notices.push(Notice::error(e.to_string()));
                return Err(e);
            }
        };
        self.form.begin_submit()?;

        let result = match &submission {
            Submission::Create(new) => self
                .store
                .create_appointment(new)
                .await
                .map(|_| "created"),
            Submission::Update { id, patch } => self
                .store
                .update_appointment(id, &self.owner, patch)
                .await
                .and_then(|outcome| {
                    if outcome.is_noop() {
                        Err(AgendaError::NotFound(format!(
                            "Appointment {id} does not exist or belongs to another user"
                        )))
                    } else {
                        Ok("updated")
                    }
                }),
        };

        match result {
            Ok(verb) => {
                self.form.finish_submit(true);
                self.notices
                    .push(Notice::success(format!("Appointment {verb} successfully")));
                self.refresh_after_mutation().await;
                Ok(())
            }
            Err(e) => {
                self.form.finish_submit(false);
                crate::log_error_with_context!(&e, "Failed to save appointment");
                self.notices
                    .push(Notice::error(format!("Could not save appointment: {e}")));
                Err(e)
            }
        }
    }

    /// Asks for confirmation before deleting `id`
    pub fn request_delete(&mut self, id: AppointmentId) {
        self.pending_delete = Some(id);
    }

    /// The appointment awaiting delete confirmation
    pub fn pending_delete(&self) -> Option<&AppointmentId> {
        self.pending_delete.as_ref()
    }

    /// Drops the pending delete
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Deletes the confirmed appointment and refetches the day
    ///
    /// Local state is only refreshed after the store acknowledges the delete.
    /// Deleting a row that is already gone succeeds.
    pub async fn confirm_delete(&mut self) -> Result<MutationOutcome> {
        let id = self.pending_delete.take().ok_or_else(|| {
            AgendaError::Validation("No deletion is awaiting confirmation".to_string())
        })?;

        match self.store.delete_appointment(&id, &self.owner).await {
            Ok(outcome) => {
                if outcome.is_noop() {
                    tracing::debug!(appointment_id = %id, "Delete matched no row");
                }
                self.notices
                    .push(Notice::success("Appointment deleted successfully"));
                self.refresh_after_mutation().await;
                Ok(outcome)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to delete appointment");
                self.notices
                    .push(Notice::error(format!("Could not delete appointment: {e}")));
                Err(e)
            }
        }
    }

    async fn refresh_after_mutation(&mut self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "Refetch after mutation failed");
        }
    }

    /// Today and this-week counters for the owner
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        dashboard_stats(
            self.store.as_ref(),
            &self.owner,
            self.view.today(),
            self.view.timezone(),
        )
        .await
    }

    /// Takes all queued notices
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// What the day area should show
    pub fn render(&self) -> Result<DayView<'_>> {
        self.view.render()
    }

    /// Date picker opened on the selected date
    pub fn calendar(&self) -> CalendarPicker {
        let picker = CalendarPicker::new(self.view.today(), Some(self.view.selected_date()));
        if self.allow_past_dates {
            picker
        } else {
            picker.with_disabled(past_dates(self.view.today()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn coordinator(store: Arc<MemoryStore>) -> ScheduleCoordinator<Utc> {
        let session = Session::authenticated(UserId::new("u-1").unwrap(), None);
        ScheduleCoordinator::new(store, &session, Utc, today(), &ScheduleConfig::default())
            .unwrap()
    }

    #[tokio::test]
    async fn test_open_new_gated_on_empty_directory() {
        let store = Arc::new(MemoryStore::new());
        let mut coordinator = coordinator(store);
        coordinator.load_patients().await.unwrap();

        assert!(coordinator.open_new(None).unwrap_err().is_validation());
        assert!(!coordinator.form().is_open());
        let notices = coordinator.drain_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.contains("Register a patient"));
    }

    #[tokio::test]
    async fn test_past_dates_rejected() {
        let mut coordinator = coordinator(Arc::new(MemoryStore::new()));
        let yesterday = today().pred_opt().unwrap();
        assert!(coordinator.select_date(yesterday).await.is_err());
        assert_eq!(coordinator.view().selected_date(), today());
        assert!(coordinator.calendar().is_disabled(yesterday));
    }

    #[tokio::test]
    async fn test_update_matching_no_row_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let owner = UserId::new("u-1").unwrap();
        let patient = store.add_patient(&owner, "Ana").await;
        let other = UserId::new("u-2").unwrap();
        let foreign_patient = store.add_patient(&other, "Zed").await;
        let foreign = store
            .seed_appointment(
                &other,
                &foreign_patient.id,
                Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap(),
                None,
            )
            .await;

        let mut coordinator = coordinator(store.clone());
        coordinator.load_patients().await.unwrap();
        coordinator.refresh().await.unwrap();

        // Forge an edit dialog for a row the user does not own
        let appointment = crate::domain::Appointment {
            id: foreign,
            patient_id: patient.id.clone(),
            appointment_datetime: "2025-03-14T09:00:00Z".to_string(),
            duration_minutes: None,
            notes: None,
            patient: None,
        };
        coordinator.form_mut().open_for_edit(&appointment, &Utc);

        let err = coordinator.submit().await.unwrap_err();
        assert!(matches!(err, AgendaError::NotFound(_)));
        assert!(coordinator.form().is_open());
        assert!(!coordinator.form().is_submitting());
    }

    #[tokio::test]
    async fn test_confirm_delete_without_request() {
        let mut coordinator = coordinator(Arc::new(MemoryStore::new()));
        assert!(coordinator.confirm_delete().await.unwrap_err().is_validation());
    }
}
