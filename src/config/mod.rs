//! Configuration management for Agenda.
//!
//! Agenda reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `AGENDA_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation of the active store backend only
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use agenda::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("agenda.toml")?;
//! println!("Store backend: {}", config.store.target);
//! println!("Default time: {}", config.schedule.default_time);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [session]
//! email = "ana@example.com"
//! password = "${AGENDA_PASSWORD}"
//!
//! [store]
//! target = "rest"
//!
//! [store.rest]
//! base_url = "https://project.supabase.co"
//! api_key = "${AGENDA_API_KEY}"
//!
//! [schedule]
//! default_time = "09:00"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    AgendaConfig, ApplicationConfig, Environment, LoggingConfig, PostgreSQLConfig, RestConfig,
    ScheduleConfig, SessionConfig, StoreConfig, StoreTarget,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
