//! Stats command implementation
//!
//! Prints the dashboard counters for today and the current week.

use super::{report, Workspace, EXIT_OK};
use clap::Args;

/// Arguments for the stats command
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Print the counters as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsArgs {
    /// Execute the stats command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let workspace = match Workspace::open(config_path).await {
            Ok(w) => w,
            Err(code) => return Ok(code),
        };

        let code = match workspace.coordinator.dashboard_stats().await {
            Ok(stats) if self.json => {
                println!("{}", serde_json::to_string_pretty(&stats)?);
                EXIT_OK
            }
            Ok(stats) => {
                println!("📊 Appointments");
                println!();
                println!("  Today:     {}", stats.today);
                println!("  This week: {}", stats.this_week);
                EXIT_OK
            }
            Err(e) => report("Failed to load appointments", &e),
        };
        Ok(workspace.close(code).await)
    }
}
