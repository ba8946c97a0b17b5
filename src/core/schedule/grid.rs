//! Renderable slot grid for one day

use crate::domain::{Appointment, Period, Slot};
use chrono::NaiveDate;

/// State of one slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotStatus<'a> {
    /// Nothing booked at this time
    Available,
    /// Booked by this appointment
    Booked(&'a Appointment),
}

/// One catalogue slot with its resolved appointment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotRow<'a> {
    /// Catalogue entry
    pub slot: Slot,
    /// Resolution for the selected day
    pub status: SlotStatus<'a>,
}

impl<'a> SlotRow<'a> {
    /// The booked appointment, if any
    pub fn appointment(&self) -> Option<&'a Appointment> {
        match self.status {
            SlotStatus::Booked(appointment) => Some(appointment),
            SlotStatus::Available => None,
        }
    }

    /// Whether the slot is booked
    pub fn is_booked(&self) -> bool {
        self.appointment().is_some()
    }

    /// Display name of the booked patient
    pub fn patient_name(&self) -> Option<&'a str> {
        self.appointment().and_then(Appointment::patient_name)
    }

    /// Notes of the booked appointment
    pub fn notes(&self) -> Option<&'a str> {
        self.appointment().and_then(Appointment::notes_text)
    }
}

/// Every catalogue slot for a day, in catalogue order
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleGrid<'a> {
    date: NaiveDate,
    rows: Vec<SlotRow<'a>>,
    off_catalogue: Vec<&'a Appointment>,
    unreadable: Vec<&'a Appointment>,
}

impl<'a> ScheduleGrid<'a> {
    pub(crate) fn new(
        date: NaiveDate,
        rows: Vec<SlotRow<'a>>,
        off_catalogue: Vec<&'a Appointment>,
    ) -> Self {
        Self {
            date,
            rows,
            off_catalogue,
            unreadable: Vec::new(),
        }
    }

    pub(crate) fn with_unreadable(mut self, unreadable: Vec<&'a Appointment>) -> Self {
        self.unreadable = unreadable;
        self
    }

    /// Date the grid was built for
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// All rows in catalogue order
    pub fn rows(&self) -> &[SlotRow<'a>] {
        &self.rows
    }

    /// Rows grouped by period, keeping catalogue order within each group
    pub fn by_period(&self) -> Vec<(Period, Vec<&SlotRow<'a>>)> {
        let mut groups: Vec<(Period, Vec<&SlotRow<'a>>)> = Vec::new();
        for row in &self.rows {
            match groups.last_mut() {
                Some((period, rows)) if *period == row.slot.period => rows.push(row),
                _ => groups.push((row.slot.period, vec![row])),
            }
        }
        groups
    }

    /// Appointments whose local time matches no catalogue slot
    pub fn off_catalogue(&self) -> &[&'a Appointment] {
        &self.off_catalogue
    }

    /// Appointments whose stored instant could not be read
    pub fn unreadable(&self) -> &[&'a Appointment] {
        &self.unreadable
    }

    /// Number of booked slots
    pub fn booked_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_booked()).count()
    }

    /// Number of available slots
    pub fn available_count(&self) -> usize {
        self.rows.len() - self.booked_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalogue;

    #[test]
    fn test_by_period_groups_in_order() {
        let rows: Vec<SlotRow> = catalogue()
            .iter()
            .map(|slot| SlotRow {
                slot: *slot,
                status: SlotStatus::Available,
            })
            .collect();
        let grid = ScheduleGrid::new(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(), rows, vec![]);

        let groups = grid.by_period();
        let summary: Vec<(Period, usize)> =
            groups.iter().map(|(period, rows)| (*period, rows.len())).collect();
        assert_eq!(
            summary,
            vec![
                (Period::Morning, 4),
                (Period::Afternoon, 6),
                (Period::Evening, 1)
            ]
        );
        assert_eq!(grid.available_count(), 11);
        assert_eq!(grid.booked_count(), 0);
    }
}
