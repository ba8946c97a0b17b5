//! Create/edit dialog state
//!
//! The form never calls a store. [`AppointmentForm::prepare`] validates the
//! fields and returns the [`Submission`] to send; the caller reports the
//! outcome through [`AppointmentForm::finish_submit`].

use crate::core::schedule::local_instant;
use crate::domain::{
    AgendaError, Appointment, AppointmentId, AppointmentPatch, NewAppointment, Patient, PatientId,
    Result, SlotTime, UserId,
};
use chrono::{NaiveDate, TimeZone};

/// Which dialog is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    /// No dialog
    Closed,
    /// Creating, optionally from a clicked slot
    Create {
        /// Time of the slot the dialog was opened from
        prefill: Option<SlotTime>,
    },
    /// Editing an existing appointment
    Edit {
        /// Appointment being edited
        appointment_id: AppointmentId,
    },
}

/// Validated request ready for the store
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Insert a new row
    Create(NewAppointment),
    /// Patch an existing row
    Update {
        /// Row to patch
        id: AppointmentId,
        /// New field values
        patch: AppointmentPatch,
    },
}

/// Appointment dialog controller
#[derive(Debug, Clone)]
pub struct AppointmentForm {
    state: DialogState,
    patient_id: Option<PatientId>,
    time: String,
    notes: String,
    default_time: SlotTime,
    is_submitting: bool,
}

impl AppointmentForm {
    /// Creates a closed form
    pub fn new(default_time: SlotTime) -> Self {
        Self {
            state: DialogState::Closed,
            patient_id: None,
            time: default_time.label(),
            notes: String::new(),
            default_time,
            is_submitting: false,
        }
    }

    /// Opens the create dialog
    ///
    /// Selects the first patient in the directory, the prefill time or the
    /// default, and clears notes.
    pub fn open_for_create(&mut self, patients: &[Patient], prefill: Option<SlotTime>) {
        self.state = DialogState::Create { prefill };
        self.patient_id = patients.first().map(|p| p.id.clone());
        self.time = prefill.unwrap_or(self.default_time).label();
        self.notes.clear();
        self.is_submitting = false;
    }

    /// Opens the edit dialog populated from `appointment`
    ///
    /// An unparseable stored instant falls back to the default time.
    pub fn open_for_edit<Tz: TimeZone>(&mut self, appointment: &Appointment, tz: &Tz) {
        let time = appointment.local_time(tz).unwrap_or_else(|| {
            tracing::warn!(
                appointment_id = %appointment.id,
                raw = %appointment.appointment_datetime,
                fallback = %self.default_time,
                "Stored instant did not parse; using default time"
            );
            self.default_time
        });

        self.state = DialogState::Edit {
            appointment_id: appointment.id.clone(),
        };
        self.patient_id = Some(appointment.patient_id.clone());
        self.time = time.label();
        self.notes = appointment.notes.clone().unwrap_or_default();
        self.is_submitting = false;
    }

    /// Closes the dialog
    pub fn close(&mut self) {
        self.state = DialogState::Closed;
        self.is_submitting = false;
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != DialogState::Closed
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.state, DialogState::Edit { .. })
    }

    pub fn set_patient(&mut self, patient_id: Option<PatientId>) {
        self.patient_id = patient_id;
    }

    pub fn set_time(&mut self, time: impl Into<String>) {
        self.time = time.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn patient_id(&self) -> Option<&PatientId> {
        self.patient_id.as_ref()
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Checks the required fields
    ///
    /// # Errors
    ///
    /// Returns [`AgendaError::Validation`] naming the first missing or
    /// malformed field.
    pub fn validate(&self, date: Option<NaiveDate>) -> Result<(PatientId, NaiveDate, SlotTime)> {
        let patient_id = self
            .patient_id
            .clone()
            .ok_or_else(|| AgendaError::Validation("Select a patient".to_string()))?;
        let date = date.ok_or_else(|| AgendaError::Validation("Select a date".to_string()))?;
        if self.time.trim().is_empty() {
            return Err(AgendaError::Validation("Enter a time".to_string()));
        }
        let time: SlotTime = self.time.parse().map_err(AgendaError::Validation)?;
        Ok((patient_id, date, time))
    }

    /// Validates and builds the request for the open dialog
    ///
    /// `date` is the selected calendar day; it is combined with the time
    /// field in `tz` to produce the stored instant.
    pub fn prepare<Tz: TimeZone>(
        &self,
        owner: &UserId,
        date: Option<NaiveDate>,
        tz: &Tz,
    ) -> Result<Submission> {
        let (patient_id, date, time) = self.validate(date)?;
        let appointment_datetime = local_instant(date, time, tz);

        match &self.state {
            DialogState::Closed => Err(AgendaError::Validation(
                "No appointment dialog is open".to_string(),
            )),
            DialogState::Create { .. } => Ok(Submission::Create(NewAppointment {
                user_id: owner.clone(),
                patient_id,
                appointment_datetime,
                notes: Some(self.notes.trim().to_string()).filter(|n| !n.is_empty()),
            })),
            DialogState::Edit { appointment_id } => Ok(Submission::Update {
                id: appointment_id.clone(),
                patch: AppointmentPatch {
                    patient_id: Some(patient_id),
                    appointment_datetime: Some(appointment_datetime),
                    notes: Some(self.notes.trim().to_string()),
                },
            }),
        }
    }

    /// Marks a submission as in flight
    ///
    /// # Errors
    ///
    /// Rejects a second submission while one is outstanding.
    pub fn begin_submit(&mut self) -> Result<()> {
        if self.is_submitting {
            return Err(AgendaError::Validation(
                "A submission is already in progress".to_string(),
            ));
        }
        self.is_submitting = true;
        Ok(())
    }

    /// Records the outcome; success closes the dialog, failure keeps the fields
    pub fn finish_submit(&mut self, succeeded: bool) {
        self.is_submitting = false;
        if succeeded {
            self.close();
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Whether the submit control is enabled
    pub fn can_submit(&self, is_loading_patients: bool) -> bool {
        self.is_open() && !self.is_submitting && !is_loading_patients && self.patient_id.is_some()
    }

    /// Dialog title
    pub fn title(&self) -> &'static str {
        if self.is_edit() {
            "Edit appointment"
        } else {
            "New appointment"
        }
    }

    /// Dialog description
    pub fn description(&self, date: Option<NaiveDate>) -> String {
        if self.is_edit() {
            "Update the appointment details below.".to_string()
        } else {
            let date = date
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_default();
            format!("Schedule a new session for {date} at {}.", self.time)
        }
    }

    /// Submit button label
    pub fn submit_label(&self) -> &'static str {
        match (self.is_submitting, self.is_edit()) {
            (true, _) => "Saving...",
            (false, true) => "Save changes",
            (false, false) => "Create appointment",
        }
    }
}
