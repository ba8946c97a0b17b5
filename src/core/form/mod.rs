//! Appointment create/edit form

pub mod controller;

pub use controller::{AppointmentForm, DialogState, Submission};
