//! Reschedule command implementation
//!
//! Edits an appointment on a given day. Fields that are not passed keep the
//! values the edit form was opened with.

use super::day::print_day;
use super::{parse_date, report, Workspace, EXIT_OK};
use crate::domain::{AgendaError, AppointmentId, PatientId, Result};
use clap::Args;

/// Arguments for the reschedule command
#[derive(Args, Debug)]
pub struct RescheduleArgs {
    /// Appointment to edit
    #[arg(long)]
    pub id: String,

    /// Day the appointment is on (YYYY-MM-DD or DD/MM/YYYY), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,

    /// New patient
    #[arg(short, long)]
    pub patient: Option<String>,

    /// New start time (HH:mm)
    #[arg(short, long)]
    pub time: Option<String>,

    /// New notes; an empty value clears them
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl RescheduleArgs {
    /// Execute the reschedule command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(appointment_id = %self.id, "Rescheduling appointment");

        let mut workspace = match Workspace::open(config_path).await {
            Ok(w) => w,
            Err(code) => return Ok(code),
        };

        let code = match self.reschedule(&mut workspace).await {
            Ok(()) => match print_day(&workspace.coordinator) {
                Ok(()) => EXIT_OK,
                Err(e) => report("Failed to render schedule", &e),
            },
            Err(e) => report("Failed to update appointment", &e),
        };
        Ok(workspace.close(code).await)
    }

    async fn reschedule(&self, workspace: &mut Workspace) -> Result<()> {
        let coordinator = &mut workspace.coordinator;
        let date = parse_date(self.date.as_deref(), coordinator.view().today())?;
        let id = AppointmentId::new(self.id.trim()).map_err(AgendaError::Validation)?;

        coordinator.select_date(date).await?;
        coordinator.load_patients().await?;
        coordinator.open_edit(&id)?;

        let form = coordinator.form_mut();
        if let Some(patient) = &self.patient {
            let patient = PatientId::new(patient.trim()).map_err(AgendaError::Validation)?;
            form.set_patient(Some(patient));
        }
        if let Some(time) = &self.time {
            form.set_time(time.trim());
        }
        if let Some(notes) = &self.notes {
            form.set_notes(notes.as_str());
        }

        coordinator.submit().await
    }
}
