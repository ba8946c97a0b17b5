//! Cancel command implementation
//!
//! Deletes an appointment after confirmation.

use super::day::print_day;
use super::{parse_date, report, Workspace, EXIT_OK};
use crate::domain::{AgendaError, AppointmentId};
use clap::Args;
use std::io::{self, BufRead, Write};

/// Arguments for the cancel command
#[derive(Args, Debug)]
pub struct CancelArgs {
    /// Appointment to delete
    #[arg(long)]
    pub id: String,

    /// Day to show afterwards (YYYY-MM-DD or DD/MM/YYYY), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl CancelArgs {
    /// Execute the cancel command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let id = match AppointmentId::new(self.id.trim()) {
            Ok(id) => id,
            Err(e) => return Ok(report("Invalid arguments", &AgendaError::Validation(e))),
        };

        let mut workspace = match Workspace::open(config_path).await {
            Ok(w) => w,
            Err(code) => return Ok(code),
        };

        let today = workspace.coordinator.view().today();
        let date = match parse_date(self.date.as_deref(), today) {
            Ok(d) => d,
            Err(e) => {
                let code = report("Invalid arguments", &e);
                return Ok(workspace.close(code).await);
            }
        };
        if let Err(e) = workspace.coordinator.select_date(date).await {
            let code = report("Failed to load appointments", &e);
            return Ok(workspace.close(code).await);
        }

        workspace.coordinator.request_delete(id.clone());
        if !self.yes && !confirm(&format!("Delete appointment {id}?"))? {
            workspace.coordinator.cancel_delete();
            println!("Cancelled.");
            return Ok(workspace.close(EXIT_OK).await);
        }

        let code = match workspace.coordinator.confirm_delete().await {
            Ok(_) => match print_day(&workspace.coordinator) {
                Ok(()) => EXIT_OK,
                Err(e) => report("Failed to render schedule", &e),
            },
            Err(e) => report("Failed to delete appointment", &e),
        };
        Ok(workspace.close(code).await)
    }
}

/// Asks a yes/no question on stdin; anything but `y`/`yes` is a no
fn confirm(question: &str) -> io::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
