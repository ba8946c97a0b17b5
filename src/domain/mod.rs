//! Domain models and types for Agenda.
//!
//! This module contains the data the scheduling core works with: identifiers,
//! patients, appointments, the static slot catalogue, the session, and the
//! error hierarchy.
//!
//! # Type Safety
//!
//! Identifiers are newtypes so a patient id can never be passed where an
//! appointment id is expected:
//!
//! ```rust
//! use agenda::domain::{AppointmentId, PatientId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let patient = PatientId::new("5e2c")?;
//! let appointment = AppointmentId::new("a9f1")?;
//!
//! // let wrong: PatientId = appointment;  // Compile error
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, AgendaError>`]:
//!
//! ```rust,no_run
//! use agenda::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = agenda::config::load_config("agenda.toml")?;
//!     Ok(())
//! }
//! ```

pub mod appointment;
pub mod errors;
pub mod ids;
pub mod patient;
pub mod result;
pub mod session;
pub mod slot;

// Re-export commonly used types for convenience
pub use appointment::{
    parse_instant, Appointment, AppointmentPatch, MutationOutcome, NewAppointment,
};
pub use errors::{AgendaError, StoreError};
pub use ids::{AppointmentId, PatientId, UserId};
pub use patient::Patient;
pub use result::Result;
pub use session::{Session, SessionState};
pub use slot::{catalogue, find_slot, Period, Slot, SlotTime};
