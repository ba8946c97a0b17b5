//! Minute-resolution index over one day's appointments
//!
//! Each appointment's stored instant is converted to local `HH:mm` once, when
//! the day is loaded. Lookups by slot time are then a map access. When two
//! appointments share a key the first one in fetch order keeps the slot and
//! the collision is recorded as a [`SlotConflict`].

use crate::domain::{AgendaError, Appointment, AppointmentId, Result, SlotTime};
use chrono::TimeZone;
use std::collections::BTreeMap;

/// Two appointments of the same day formatted to the same local minute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotConflict {
    /// Shared local time
    pub time: SlotTime,
    /// Appointment that resolves for the slot
    pub kept: AppointmentId,
    /// Appointment hidden behind it
    pub shadowed: AppointmentId,
}

impl SlotConflict {
    /// Converts to the error raised under strict slot matching
    pub fn to_error(&self) -> AgendaError {
        AgendaError::ScheduleConflict {
            time: self.time.label(),
            first: self.kept.to_string(),
            second: self.shadowed.to_string(),
        }
    }
}

/// Position of each appointment keyed by local minute
#[derive(Debug, Clone, Default)]
pub struct DayIndex {
    by_minute: BTreeMap<SlotTime, usize>,
    conflicts: Vec<SlotConflict>,
    unparsed: Vec<AppointmentId>,
}

impl DayIndex {
    /// Indexes `appointments` in fetch order
    pub fn build<Tz: TimeZone>(appointments: &[Appointment], tz: &Tz) -> Self {
        let mut index = DayIndex::default();

        for (position, appointment) in appointments.iter().enumerate() {
            let Some(time) = appointment.local_time(tz) else {
                tracing::warn!(
                    appointment_id = %appointment.id,
                    raw = %appointment.appointment_datetime,
                    "Appointment instant could not be parsed"
                );
                index.unparsed.push(appointment.id.clone());
                continue;
            };

            match index.by_minute.get(&time) {
                Some(&kept) => index.conflicts.push(SlotConflict {
                    time,
                    kept: appointments[kept].id.clone(),
                    shadowed: appointment.id.clone(),
                }),
                None => {
                    index.by_minute.insert(time, position);
                }
            }
        }

        index
    }

    /// Position of the appointment keyed at `time`
    pub fn position(&self, time: SlotTime) -> Option<usize> {
        self.by_minute.get(&time).copied()
    }

    /// Keyed times in ascending order
    pub fn times(&self) -> impl Iterator<Item = SlotTime> + '_ {
        self.by_minute.keys().copied()
    }

    /// Collisions found while indexing
    pub fn conflicts(&self) -> &[SlotConflict] {
        &self.conflicts
    }

    /// Appointments whose stored instant did not parse
    pub fn unparsed(&self) -> &[AppointmentId] {
        &self.unparsed
    }

    /// Fails on the first collision
    pub fn ensure_unique(&self) -> Result<()> {
        match self.conflicts.first() {
            Some(conflict) => Err(conflict.to_error()),
            None => Ok(()),
        }
    }

    /// Number of keyed appointments
    pub fn len(&self) -> usize {
        self.by_minute.len()
    }

    /// Whether nothing was keyed
    pub fn is_empty(&self) -> bool {
        self.by_minute.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PatientId;
    use chrono::Utc;

    fn appointment(id: &str, at: &str) -> Appointment {
        Appointment {
            id: AppointmentId::new(id).unwrap(),
            patient_id: PatientId::new("p1").unwrap(),
            appointment_datetime: at.to_string(),
            duration_minutes: None,
            notes: None,
            patient: None,
        }
    }

    #[test]
    fn test_first_in_fetch_order_wins() {
        let day = vec![
            appointment("a1", "2025-03-14T09:00:00Z"),
            appointment("a2", "2025-03-14T09:00:30Z"),
            appointment("a3", "2025-03-14T10:00:00Z"),
        ];
        let index = DayIndex::build(&day, &Utc);

        assert_eq!(index.position(SlotTime::new(9, 0)), Some(0));
        assert_eq!(index.position(SlotTime::new(10, 0)), Some(2));
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.conflicts(),
            &[SlotConflict {
                time: SlotTime::new(9, 0),
                kept: AppointmentId::new("a1").unwrap(),
                shadowed: AppointmentId::new("a2").unwrap(),
            }]
        );
        assert!(matches!(
            index.ensure_unique(),
            Err(AgendaError::ScheduleConflict { .. })
        ));
    }

    #[test]
    fn test_unparsed_instants_are_skipped() {
        let day = vec![appointment("a1", "garbage"), appointment("a2", "2025-03-14T11:00:00Z")];
        let index = DayIndex::build(&day, &Utc);

        assert_eq!(index.unparsed(), &[AppointmentId::new("a1").unwrap()]);
        assert_eq!(index.times().collect::<Vec<_>>(), vec![SlotTime::new(11, 0)]);
        assert!(index.ensure_unique().is_ok());
    }
}
