//! Day-level scheduling logic
//!
//! Merges the static slot catalogue with one day's appointments.

pub mod day;
pub mod grid;
pub mod index;
pub mod view_model;

pub use day::{local_instant, today_in, week_bounds, DayRange};
pub use grid::{ScheduleGrid, SlotRow, SlotStatus};
pub use index::{DayIndex, SlotConflict};
pub use view_model::{DayView, FetchTicket, ScheduleViewModel};
