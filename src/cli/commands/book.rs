//! Book command implementation
//!
//! Creates an appointment through the same dialog flow the schedule screen
//! uses: open the create form prefilled with the slot, fill it in, submit.

use super::day::print_day;
use super::{parse_date, report, Workspace, EXIT_OK};
use crate::domain::{AgendaError, PatientId, SlotTime};
use clap::Args;

/// Arguments for the book command
#[derive(Args, Debug)]
pub struct BookArgs {
    /// Patient to book
    #[arg(short, long)]
    pub patient: String,

    /// Start time (HH:mm)
    #[arg(short, long)]
    pub time: String,

    /// Date (YYYY-MM-DD or DD/MM/YYYY), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,

    /// Free-text notes
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl BookArgs {
    /// Execute the book command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(patient = %self.patient, time = %self.time, "Booking appointment");

        let mut workspace = match Workspace::open(config_path).await {
            Ok(w) => w,
            Err(code) => return Ok(code),
        };

        let code = match self.book(&mut workspace).await {
            Ok(()) => match print_day(&workspace.coordinator) {
                Ok(()) => EXIT_OK,
                Err(e) => report("Failed to render schedule", &e),
            },
            Err(e) => report("Failed to book appointment", &e),
        };
        Ok(workspace.close(code).await)
    }

    async fn book(&self, workspace: &mut Workspace) -> crate::domain::Result<()> {
        let coordinator = &mut workspace.coordinator;
        let date = parse_date(self.date.as_deref(), coordinator.view().today())?;
        let patient = PatientId::new(self.patient.trim()).map_err(AgendaError::Validation)?;
        let prefill = self.time.parse::<SlotTime>().ok();

        coordinator.select_date(date).await?;
        coordinator.load_patients().await?;
        coordinator.open_new(prefill)?;

        let form = coordinator.form_mut();
        form.set_patient(Some(patient));
        form.set_time(self.time.trim());
        if let Some(notes) = &self.notes {
            form.set_notes(notes.as_str());
        }

        coordinator.submit().await
    }
}
