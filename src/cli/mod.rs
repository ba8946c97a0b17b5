//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Agenda using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Agenda - appointment scheduling for a single practitioner
#[derive(Parser, Debug)]
#[command(name = "agenda")]
#[command(version, about, long_about = None)]
#[command(author = "Agenda Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "agenda.toml", env = "AGENDA_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "AGENDA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List your patients
    Patients(commands::patients::PatientsArgs),

    /// Show the slot grid for a day
    Day(commands::day::DayArgs),

    /// Book an appointment
    Book(commands::book::BookArgs),

    /// Change an existing appointment
    Reschedule(commands::reschedule::RescheduleArgs),

    /// Delete an appointment
    Cancel(commands::cancel::CancelArgs),

    /// Show a month calendar
    Calendar(commands::calendar::CalendarArgs),

    /// Show appointment counts for today and this week
    Stats(commands::stats::StatsArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Commands {
    /// Runs the command and returns the process exit code
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self {
            Commands::Patients(args) => args.execute(config_path).await,
            Commands::Day(args) => args.execute(config_path).await,
            Commands::Book(args) => args.execute(config_path).await,
            Commands::Reschedule(args) => args.execute(config_path).await,
            Commands::Cancel(args) => args.execute(config_path).await,
            Commands::Calendar(args) => args.execute(config_path).await,
            Commands::Stats(args) => args.execute(config_path).await,
            Commands::ValidateConfig(args) => args.execute(config_path).await,
            Commands::Init(args) => args.execute().await,
        }
    }

    /// Whether the command needs a loadable configuration file
    pub fn needs_config(&self) -> bool {
        !matches!(self, Commands::Init(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_day() {
        let cli = Cli::parse_from(["agenda", "day"]);
        assert_eq!(cli.config, "agenda.toml");
        assert!(matches!(cli.command, Commands::Day(ref args) if args.date.is_none()));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["agenda", "--config", "custom.toml", "patients"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["agenda", "--log-level", "debug", "stats"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_book() {
        let cli = Cli::parse_from([
            "agenda", "book", "--patient", "p-1", "--time", "09:00", "--date", "2025-03-14",
            "--notes", "first visit",
        ]);
        let Commands::Book(args) = cli.command else {
            panic!("expected book");
        };
        assert_eq!(args.patient, "p-1");
        assert_eq!(args.time, "09:00");
        assert_eq!(args.date.as_deref(), Some("2025-03-14"));
        assert_eq!(args.notes.as_deref(), Some("first visit"));
    }

    #[test]
    fn test_cli_book_requires_patient_and_time() {
        assert!(Cli::try_parse_from(["agenda", "book", "--time", "09:00"]).is_err());
        assert!(Cli::try_parse_from(["agenda", "book", "--patient", "p-1"]).is_err());
    }

    #[test]
    fn test_cli_parse_reschedule() {
        let cli = Cli::parse_from(["agenda", "reschedule", "--id", "a-1", "--time", "10:00"]);
        let Commands::Reschedule(args) = cli.command else {
            panic!("expected reschedule");
        };
        assert_eq!(args.id, "a-1");
        assert_eq!(args.time.as_deref(), Some("10:00"));
        assert!(args.patient.is_none());
    }

    #[test]
    fn test_cli_parse_cancel() {
        let cli = Cli::parse_from(["agenda", "cancel", "--id", "a-1", "--yes"]);
        assert!(matches!(cli.command, Commands::Cancel(ref args) if args.yes));
    }

    #[test]
    fn test_cli_parse_calendar() {
        let cli = Cli::parse_from(["agenda", "calendar", "--month", "2025-03"]);
        assert!(
            matches!(cli.command, Commands::Calendar(ref args) if args.month.as_deref() == Some("2025-03"))
        );
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["agenda", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
        assert!(cli.command.needs_config());
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["agenda", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
        assert!(!cli.command.needs_config());
    }
}
