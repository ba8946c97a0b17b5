//! CLI command implementations
//!
//! Every command returns its process exit code:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 2 | Configuration error |
//! | 3 | Validation or user error |
//! | 4 | Connection or store error |
//! | 5 | Fatal error |

pub mod book;
pub mod calendar;
pub mod cancel;
pub mod day;
pub mod init;
pub mod patients;
pub mod reschedule;
pub mod stats;
pub mod validate;

use crate::adapters::store::{create_store, end_session, establish_session};
use crate::config::{load_config, AgendaConfig};
use crate::core::coordinator::ScheduleCoordinator;
use crate::core::notice::{Notice, NoticeLevel};
use crate::core::schedule::today_in;
use crate::domain::{AgendaError, Session};
use chrono::{Local, NaiveDate};

/// Exit code for a successful command
pub const EXIT_OK: i32 = 0;
/// Exit code for configuration errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit code for validation and user errors
pub const EXIT_VALIDATION: i32 = 3;
/// Exit code for connection and store errors
pub const EXIT_STORE: i32 = 4;
/// Exit code for anything else
pub const EXIT_FATAL: i32 = 5;

/// Maps an error to the exit code reported for it
pub fn exit_code(err: &AgendaError) -> i32 {
    match err {
        AgendaError::Configuration(_) => EXIT_CONFIG,
        AgendaError::Validation(_)
        | AgendaError::NotFound(_)
        | AgendaError::ScheduleConflict { .. } => EXIT_VALIDATION,
        AgendaError::Fetch { .. }
        | AgendaError::Access { .. }
        | AgendaError::Write { .. }
        | AgendaError::Session(_)
        | AgendaError::Connection(_) => EXIT_STORE,
        AgendaError::Serialization(_) | AgendaError::Io(_) | AgendaError::Other(_) => EXIT_FATAL,
    }
}

/// Parses a `--date` argument, defaulting to `today`
///
/// Accepts `YYYY-MM-DD` and `DD/MM/YYYY`.
pub(crate) fn parse_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, AgendaError> {
    let Some(raw) = raw.map(str::trim) else {
        return Ok(today);
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .map_err(|_| {
            AgendaError::Validation(format!(
                "Invalid date '{raw}', expected YYYY-MM-DD or DD/MM/YYYY"
            ))
        })
}

/// Prints an error the way every command reports failures
pub(crate) fn report(heading: &str, err: &AgendaError) -> i32 {
    println!("❌ {heading}");
    println!("   Error: {err}");
    exit_code(err)
}

/// A signed-in schedule for one command run
pub(crate) struct Workspace {
    pub config: AgendaConfig,
    pub session: Session,
    pub coordinator: ScheduleCoordinator<Local>,
}

impl Workspace {
    /// Loads configuration, signs in and connects to the configured store
    ///
    /// Failures are printed; the `Err` carries the exit code.
    pub async fn open(config_path: &str) -> Result<Self, i32> {
        let config = load_config(config_path)
            .map_err(|e| report("Failed to load configuration file", &e))?;

        let session = establish_session(&config)
            .await
            .map_err(|e| report("Failed to sign in", &e))?;

        let store = create_store(&config, &session)
            .await
            .map_err(|e| report("Failed to connect to store", &e))?;

        let coordinator = ScheduleCoordinator::new(
            store,
            &session,
            Local,
            today_in(&Local),
            &config.schedule,
        )
        .map_err(|e| report("Failed to prepare schedule", &e))?;

        tracing::debug!(
            user_id = %coordinator.owner(),
            backend = %config.store.target,
            "Workspace opened"
        );

        Ok(Self {
            config,
            session,
            coordinator,
        })
    }

    /// Ends the session and returns `code`
    ///
    /// A failing `code` has already been reported, so only success notices
    /// are kept for it.
    pub async fn close(mut self, code: i32) -> i32 {
        for notice in pending_notices(self.coordinator.drain_notices(), code) {
            println!("{notice}");
        }
        if let Err(e) = end_session(&self.config, &mut self.session).await {
            tracing::warn!(error = %e, "Failed to end session");
        }
        code
    }
}

fn pending_notices(notices: Vec<Notice>, code: i32) -> Vec<Notice> {
    if code == EXIT_OK {
        return notices;
    }
    notices
        .into_iter()
        .filter(|n| n.level == NoticeLevel::Success)
        .collect()
}
