//! Logging and observability
//!
//! Structured logging through `tracing`, with:
//! - Configurable log levels (`RUST_LOG` overrides the configured level)
//! - Human-readable console output on stderr
//! - Optional JSON file output with daily or hourly rotation
//!
//! # Example
//!
//! ```no_run
//! use agenda::logging::init_logging;
//! use agenda::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(date = "2025-03-14", "Schedule loaded");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a listing call
///
/// # Example
///
/// ```no_run
/// use agenda::log_fetch_start;
/// use agenda::domain::ids::UserId;
///
/// let user_id = UserId::new("u-1").unwrap();
/// log_fetch_start!("appointments", &user_id, "2025-03-14");
/// ```
#[macro_export]
macro_rules! log_fetch_start {
    ($what:expr, $user_id:expr) => {
        tracing::debug!(what = $what, user_id = %$user_id, "Fetching");
    };
    ($what:expr, $user_id:expr, $date:expr) => {
        tracing::debug!(what = $what, user_id = %$user_id, date = %$date, "Fetching");
    };
}

/// Log a successful appointment mutation
///
/// # Example
///
/// ```no_run
/// use agenda::log_mutation;
///
/// log_mutation!("update", "a9f1", 1u64);
/// ```
#[macro_export]
macro_rules! log_mutation {
    ($action:expr, $appointment_id:expr, $affected:expr) => {
        tracing::info!(
            action = $action,
            appointment_id = %$appointment_id,
            affected_rows = $affected,
            "Appointment mutation applied"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use agenda::log_error_with_context;
/// use agenda::domain::AgendaError;
///
/// let error = AgendaError::Validation("Select a patient".to_string());
/// log_error_with_context!(&error, "Failed to submit appointment");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
