//! External system integrations for Agenda.
//!
//! - [`store`] - store traits and the backend factory
//! - [`rest`] - hosted PostgREST/auth backend over HTTPS
//! - [`postgresql`] - direct PostgreSQL backend
//! - [`memory`] - in-process backend used by tests and demos
//!
//! # Design Pattern
//!
//! Adapters isolate third-party clients behind the [`store::PatientDirectory`]
//! and [`store::AppointmentRepository`] traits so the scheduling core can be
//! exercised against the in-memory backend.
//!
//! ```rust,no_run
//! use agenda::adapters::store::{create_store, establish_session, PatientDirectory};
//! use agenda::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("agenda.toml")?;
//! let session = establish_session(&config).await?;
//! let store = create_store(&config, &session).await?;
//! let patients = store.list_patients(session.user_id()?).await?;
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod postgresql;
pub mod rest;
pub mod store;
