//! Calendar command implementation
//!
//! Prints a month grid with today marked and unselectable days bracketed.
//! Does not contact the store.

use super::{report, EXIT_OK};
use crate::config::load_config;
use crate::core::calendar::{past_dates, CalendarPicker, DayCell};
use crate::core::schedule::today_in;
use crate::domain::AgendaError;
use chrono::{Datelike, Local, NaiveDate};
use clap::Args;

/// Arguments for the calendar command
#[derive(Args, Debug)]
pub struct CalendarArgs {
    /// Month to show (YYYY-MM), defaults to the current month
    #[arg(short, long)]
    pub month: Option<String>,
}

impl CalendarArgs {
    /// Execute the calendar command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(report("Failed to load configuration file", &e)),
        };

        let today = today_in(&Local);
        let mut picker = CalendarPicker::new(today, None);
        if !config.schedule.allow_past_dates {
            picker = picker.with_disabled(past_dates(today));
        }

        if let Some(raw) = &self.month {
            match parse_month(raw) {
                Ok(first) => picker.show_month(first),
                Err(e) => return Ok(report("Invalid arguments", &e)),
            }
        }

        println!("{}", render(&picker));
        Ok(EXIT_OK)
    }
}

fn parse_month(raw: &str) -> Result<NaiveDate, AgendaError> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|_| AgendaError::Validation(format!("Invalid month '{raw}', expected YYYY-MM")))
}

fn render(picker: &CalendarPicker) -> String {
    let mut out = format!("{:^28}\n", picker.month_label());
    out.push_str(" Su  Mo  Tu  We  Th  Fr  Sa \n");
    for week in picker.weeks() {
        let line: String = week.iter().map(cell).collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push_str("[d] today  (d) unavailable");
    out
}

fn cell(day: &Option<DayCell>) -> String {
    match day {
        None => "    ".to_string(),
        Some(day) if day.is_today => format!("[{:>2}]", day.date.day()),
        Some(day) if day.is_disabled => format!("({:>2})", day.date.day()),
        Some(day) => format!(" {:>2} ", day.date.day()),
    }
}
