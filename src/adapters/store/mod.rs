//! Store abstraction layer
//!
//! Trait-based access to patients and appointments, with a factory that picks
//! the backend from configuration.

pub mod factory;
pub mod traits;

pub use factory::{create_store, end_session, establish_session};
pub use traits::{AppointmentRepository, PatientDirectory, ScheduleStore};
