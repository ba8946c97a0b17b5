//! Patients command implementation
//!
//! Lists the signed-in user's patient directory.

use super::{report, Workspace, EXIT_OK};
use clap::Args;

/// Arguments for the patients command
#[derive(Args, Debug)]
pub struct PatientsArgs {}

impl PatientsArgs {
    /// Execute the patients command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut workspace = match Workspace::open(config_path).await {
            Ok(w) => w,
            Err(code) => return Ok(code),
        };

        if let Err(e) = workspace.coordinator.load_patients().await {
            let code = report("Failed to load patients", &e);
            return Ok(workspace.close(code).await);
        }

        let patients = workspace.coordinator.view().patients();
        if patients.is_empty() {
            println!("No patients registered yet.");
        } else {
            println!("👥 {} patient(s)", patients.len());
            println!();
            println!("{:<38} {}", "ID", "Name");
            println!("{}", "-".repeat(70));
            for patient in patients {
                println!("{:<38} {}", patient.id, patient.fullname);
            }
        }

        Ok(workspace.close(EXIT_OK).await)
    }
}
