//! Day command implementation
//!
//! Prints the slot grid for one date.

use super::{parse_date, report, Workspace, EXIT_OK};
use crate::core::coordinator::ScheduleCoordinator;
use crate::core::schedule::{DayView, ScheduleGrid, SlotRow};
use crate::domain::{catalogue, Appointment, Result};
use chrono::{NaiveDate, TimeZone};
use clap::Args;

/// Arguments for the day command
#[derive(Args, Debug)]
pub struct DayArgs {
    /// Date to show (YYYY-MM-DD or DD/MM/YYYY), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,
}

impl DayArgs {
    /// Execute the day command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
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

        let code = match print_day(&workspace.coordinator) {
            Ok(()) => EXIT_OK,
            Err(e) => report("Failed to render schedule", &e),
        };
        Ok(workspace.close(code).await)
    }
}

/// Prints the selected day of `coordinator`
pub(crate) fn print_day<Tz: TimeZone>(coordinator: &ScheduleCoordinator<Tz>) -> Result<()> {
    let date = coordinator.view().selected_date();
    println!("📅 Schedule for {}", heading(date));
    println!();

    match coordinator.render()? {
        DayView::Loading => println!("Loading appointments..."),
        DayView::Empty => {
            println!("No appointments scheduled for this day.");
            println!("Book one with: agenda book --patient <ID> --time HH:mm --date {date}");
            println!();
            for slot in catalogue() {
                println!("  {}  available", slot.label());
            }
        }
        DayView::Grid(grid) => {
            for (period, rows) in grid.by_period() {
                println!("{period}");
                for row in rows {
                    println!("  {}", row_line(row));
                }
            }

            for line in extra_lines(&grid) {
                println!("{line}");
            }

            println!();
            println!(
                "{} booked, {} available",
                grid.booked_count(),
                grid.available_count()
            );
        }
    }

    for conflict in coordinator.view().conflicts() {
        println!(
            "⚠️  {} is booked twice; showing {}, hiding {}",
            conflict.time, conflict.kept, conflict.shadowed
        );
    }
    Ok(())
}

fn heading(date: NaiveDate) -> String {
    date.format("%A, %d/%m/%Y").to_string()
}

/// Appointments the slot rows cannot show, so they can still be edited
fn extra_lines(grid: &ScheduleGrid<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    if !grid.off_catalogue().is_empty() {
        lines.push(String::new());
        lines.push("Outside the regular slots:".to_string());
        lines.extend(grid.off_catalogue().iter().map(|a| listed_line(a)));
    }
    if !grid.unreadable().is_empty() {
        lines.push(String::new());
        lines.push("⚠️  Stored time could not be read:".to_string());
        lines.extend(grid.unreadable().iter().map(|a| listed_line(a)));
    }
    lines
}

fn listed_line(appointment: &Appointment) -> String {
    format!(
        "  {}  {} [{}]",
        appointment.appointment_datetime,
        appointment.patient_name().unwrap_or("Unknown patient"),
        appointment.id
    )
}

fn row_line(row: &SlotRow<'_>) -> String {
    let marker = if row.slot.peak { "*" } else { " " };
    match row.appointment() {
        None => format!("{}{} available", row.slot.label(), marker),
        Some(appointment) => {
            let mut line = format!(
                "{}{} {} [{}]",
                row.slot.label(),
                marker,
                row.patient_name().unwrap_or("Unknown patient"),
                appointment.id
            );
            if let Some(notes) = row.notes() {
                line.push_str(&format!(" - {notes}"));
            }
            line
        }
    }
}
