//! Calendar date picker

pub mod picker;

pub use picker::{past_dates, CalendarPicker, DayCell, DisabledPredicate, GRID_CELLS};
