//! Schedule view model
//!
//! Holds the selected date, the day's appointments and patients, and the
//! loading flags. It never talks to a store: callers request a fetch, run it,
//! and hand the result back with the [`FetchTicket`] they were given. Only the
//! ticket of the most recent request may apply its result, so a slow fetch
//! for a previously selected date can no longer overwrite the current day.

use super::day::DayRange;
use super::grid::{ScheduleGrid, SlotRow, SlotStatus};
use super::index::{DayIndex, SlotConflict};
use crate::domain::{catalogue, find_slot, Appointment, Patient, Result, Slot, SlotTime};
use chrono::{NaiveDate, TimeZone};

/// Identifies one appointment fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    date: NaiveDate,
}

impl FetchTicket {
    /// Date the fetch was issued for
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// What the day area shows
#[derive(Debug, Clone, PartialEq)]
pub enum DayView<'a> {
    /// A fetch is in flight; shown instead of the slot list
    Loading,
    /// Nothing booked; shown as a call to action
    Empty,
    /// The slot grid
    Grid(ScheduleGrid<'a>),
}

/// State behind the schedule screen
pub struct ScheduleViewModel<Tz: TimeZone> {
    tz: Tz,
    today: NaiveDate,
    selected_date: NaiveDate,
    strict_slot_matching: bool,

    appointments: Vec<Appointment>,
    index: DayIndex,
    loaded: bool,
    is_loading_appointments: bool,
    generation: u64,

    patients: Vec<Patient>,
    is_loading_patients: bool,
}

impl<Tz: TimeZone> ScheduleViewModel<Tz> {
    /// Creates a view model with `today` selected and nothing loaded
    pub fn new(tz: Tz, today: NaiveDate, strict_slot_matching: bool) -> Self {
        Self {
            tz,
            today,
            selected_date: today,
            strict_slot_matching,
            appointments: Vec::new(),
            index: DayIndex::default(),
            loaded: false,
            is_loading_appointments: false,
            generation: 0,
            patients: Vec::new(),
            is_loading_patients: false,
        }
    }

    /// Timezone used for day bounds and slot matching
    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    /// Today's date as given at construction
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Currently selected date
    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    /// Local bounds of the selected date
    pub fn day_range(&self) -> DayRange {
        DayRange::for_date(self.selected_date, &self.tz)
    }

    /// Selects `date` and starts a fetch for it
    ///
    /// The previous day's appointments are dropped immediately.
    pub fn select_date(&mut self, date: NaiveDate) -> FetchTicket {
        self.selected_date = date;
        self.appointments.clear();
        self.index = DayIndex::default();
        self.loaded = false;
        self.begin_fetch()
    }

    /// Starts a fetch for the selected date
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.is_loading_appointments = true;
        FetchTicket {
            generation: self.generation,
            date: self.selected_date,
        }
    }

    /// Whether `ticket` belongs to the most recent fetch
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation && ticket.date == self.selected_date
    }

    /// Applies a fetch result
    ///
    /// Returns `Ok(false)` without touching state when the ticket is stale.
    /// On failure the day is cleared and the error is returned for the caller
    /// to surface.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Appointment>>,
    ) -> Result<bool> {
        if !self.is_current(&ticket) {
            tracing::debug!(
                date = %ticket.date,
                selected = %self.selected_date,
                "Discarding stale appointment fetch"
            );
            return Ok(false);
        }

        self.is_loading_appointments = false;
        self.loaded = true;

        match result {
            Ok(appointments) => {
                self.index = DayIndex::build(&appointments, &self.tz);
                for conflict in self.index.conflicts() {
                    tracing::warn!(
                        date = %self.selected_date,
                        time = %conflict.time,
                        kept = %conflict.kept,
                        shadowed = %conflict.shadowed,
                        "Two appointments share a slot"
                    );
                }
                tracing::debug!(
                    date = %self.selected_date,
                    count = appointments.len(),
                    "Appointments loaded"
                );
                self.appointments = appointments;
                Ok(true)
            }
            Err(e) => {
                self.appointments.clear();
                self.index = DayIndex::default();
                Err(e)
            }
        }
    }

    /// Whether an appointment fetch is in flight
    pub fn is_loading_appointments(&self) -> bool {
        self.is_loading_appointments
    }

    /// The loaded appointments in fetch order
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Collisions in the loaded day
    pub fn conflicts(&self) -> &[SlotConflict] {
        self.index.conflicts()
    }

    /// The appointment booked at `slot`, if any
    pub fn resolve_slot(&self, slot: &Slot) -> Option<&Appointment> {
        self.resolve_time(slot.time)
    }

    /// The appointment booked at local `time`, if any
    pub fn resolve_time(&self, time: SlotTime) -> Option<&Appointment> {
        self.index
            .position(time)
            .and_then(|position| self.appointments.get(position))
    }

    /// Loaded appointments whose local time is not a catalogue slot
    pub fn off_catalogue(&self) -> Vec<&Appointment> {
        self.index
            .times()
            .filter(|time| find_slot(*time).is_none())
            .filter_map(|time| self.resolve_time(time))
            .collect()
    }

    /// Loaded appointments whose stored instant could not be read
    pub fn unreadable(&self) -> Vec<&Appointment> {
        let unparsed = self.index.unparsed();
        self.appointments
            .iter()
            .filter(|appointment| unparsed.contains(&appointment.id))
            .collect()
    }

    /// Whether the loaded day has nothing to show
    pub fn is_empty_day(&self) -> bool {
        self.loaded
            && !self.is_loading_appointments
            && self.appointments.is_empty()
            && catalogue().iter().all(|slot| self.resolve_slot(slot).is_none())
    }

    /// Builds the slot grid for the loaded day
    ///
    /// # Errors
    ///
    /// With strict slot matching, returns
    /// [`AgendaError::ScheduleConflict`](crate::domain::AgendaError::ScheduleConflict)
    /// if two appointments share a slot.
    pub fn grid(&self) -> Result<ScheduleGrid<'_>> {
        if self.strict_slot_matching {
            self.index.ensure_unique()?;
        }

        let rows = catalogue()
            .iter()
            .map(|slot| SlotRow {
                slot: *slot,
                status: match self.resolve_slot(slot) {
                    Some(appointment) => SlotStatus::Booked(appointment),
                    None => SlotStatus::Available,
                },
            })
            .collect();

        Ok(ScheduleGrid::new(self.selected_date, rows, self.off_catalogue())
            .with_unreadable(self.unreadable()))
    }

    /// What the day area should show right now
    pub fn render(&self) -> Result<DayView<'_>> {
        if self.is_loading_appointments {
            return Ok(DayView::Loading);
        }
        if self.is_empty_day() {
            return Ok(DayView::Empty);
        }
        self.grid().map(DayView::Grid)
    }

    /// Marks a patient fetch as started
    pub fn begin_patients_fetch(&mut self) {
        self.is_loading_patients = true;
    }

    /// Applies a patient fetch result, clearing the list on failure
    pub fn complete_patients_fetch(&mut self, result: Result<Vec<Patient>>) -> Result<()> {
        self.is_loading_patients = false;
        match result {
            Ok(patients) => {
                self.patients = patients;
                Ok(())
            }
            Err(e) => {
                self.patients.clear();
                Err(e)
            }
        }
    }

    /// Whether a patient fetch is in flight
    pub fn is_loading_patients(&self) -> bool {
        self.is_loading_patients
    }

    /// The directory's patients
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }
}
