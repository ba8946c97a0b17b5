//! Core scheduling logic for Agenda.
//!
//! # Modules
//!
//! - [`schedule`] - day bounds, slot index, view model and grid
//! - [`form`] - create/edit dialog controller
//! - [`calendar`] - month-grid date picker
//! - [`coordinator`] - ties the three to a store for one user
//! - [`stats`] - dashboard counters
//!
//! # Workflow
//!
//! 1. **Select**: the user picks a date; the day's appointments are fetched
//! 2. **Render**: each catalogue slot resolves to available or booked
//! 3. **Edit**: the dialog validates and submits a create or update
//! 4. **Refetch**: after the store acknowledges, the day is loaded again
//!
//! # Example
//!
//! ```rust,no_run
//! use agenda::adapters::store::{create_store, establish_session};
//! use agenda::config::load_config;
//! use agenda::core::coordinator::ScheduleCoordinator;
//! use agenda::core::schedule::{today_in, DayView};
//! use chrono::Local;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("agenda.toml")?;
//! let session = establish_session(&config).await?;
//! let store = create_store(&config, &session).await?;
//!
//! let today = today_in(&Local);
//! let mut coordinator = ScheduleCoordinator::new(store, &session, Local, today, &config.schedule)?;
//! coordinator.load_patients().await?;
//! coordinator.refresh().await?;
//!
//! if let DayView::Grid(grid) = coordinator.render()? {
//!     println!("{} slots booked", grid.booked_count());
//! }
//! # Ok(())
//! # }
//! ```

pub mod calendar;
pub mod coordinator;
pub mod form;
pub mod notice;
pub mod schedule;
pub mod stats;
