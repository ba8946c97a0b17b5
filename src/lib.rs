// Agenda - Appointment scheduling for a single practitioner
// Copyright (c) 2025 Agenda Contributors
// Licensed under the MIT License

//! # Agenda - appointment scheduling
//!
//! Agenda manages one practitioner's day: a fixed catalogue of hourly slots,
//! the patients they see, and the appointments that book those slots.
//!
//! ## Overview
//!
//! This library provides:
//! - **Viewing** a day as a grid of catalogue slots, each available or booked
//! - **Booking**, editing and deleting appointments through a validated form
//! - **Picking** dates from a month calendar with past days disabled
//! - **Counting** today's and this week's appointments
//!
//! Every read and write is scoped to the signed-in user.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Scheduling logic (view model, form, calendar, coordinator)
//! - [`adapters`] - Store backends (hosted REST, PostgreSQL, in-memory)
//! - [`domain`] - Domain types, slot catalogue and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agenda::adapters::store::{create_store, establish_session};
//! use agenda::config::load_config;
//! use agenda::core::coordinator::ScheduleCoordinator;
//! use agenda::core::schedule::today_in;
//! use agenda::domain::SlotTime;
//! use chrono::Local;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("agenda.toml")?;
//!     let session = establish_session(&config).await?;
//!     let store = create_store(&config, &session).await?;
//!
//!     let mut schedule =
//!         ScheduleCoordinator::new(store, &session, Local, today_in(&Local), &config.schedule)?;
//!     schedule.load_patients().await?;
//!     schedule.refresh().await?;
//!
//!     // Book the first patient at 10:00
//!     let patient = schedule.view().patients()[0].id.clone();
//!     schedule.open_new(Some(SlotTime::new(10, 0)))?;
//!     schedule.form_mut().set_patient(Some(patient));
//!     schedule.submit().await?;
//!
//!     for notice in schedule.drain_notices() {
//!         println!("{notice}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Agenda uses [`domain::AgendaError`] for all errors:
//!
//! ```rust,no_run
//! use agenda::domain::AgendaError;
//!
//! fn example() -> Result<(), AgendaError> {
//!     let config = agenda::config::load_config("agenda.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
