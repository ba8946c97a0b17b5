//! In-process store
//!
//! Behaves like the hosted store for everything the scheduling core can
//! observe: rows are scoped by owner, `(user_id, appointment_datetime)` is
//! unique, and zero-row updates or deletes succeed silently. It can also be
//! switched to "unavailable" to exercise failure paths.

use crate::adapters::store::traits::{AppointmentRepository, PatientDirectory, ScheduleStore};
use crate::core::schedule::DayRange;
use crate::domain::{
    AgendaError, Appointment, AppointmentId, AppointmentPatch, MutationOutcome, NewAppointment,
    Patient, PatientId, Result, StoreError, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct PatientRow {
    owner: UserId,
    patient: Patient,
}

#[derive(Debug, Clone)]
struct AppointmentRow {
    id: AppointmentId,
    owner: UserId,
    patient_id: PatientId,
    starts_at: DateTime<Utc>,
    duration_minutes: Option<i32>,
    notes: Option<String>,
}

#[derive(Debug, Default)]
struct Tables {
    patients: Vec<PatientRow>,
    appointments: Vec<AppointmentRow>,
}

/// Owner-scoped store held in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
    write_calls: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a patient for `owner` and returns it
    pub async fn add_patient(&self, owner: &UserId, fullname: &str) -> Patient {
        let patient = Patient::new(PatientId::generate(), fullname);
        self.tables.write().await.patients.push(PatientRow {
            owner: owner.clone(),
            patient: patient.clone(),
        });
        patient
    }

    /// Inserts an appointment row directly, bypassing uniqueness checks
    ///
    /// Used to set up states the store would normally reject, such as two
    /// appointments within the same minute.
    pub async fn seed_appointment(
        &self,
        owner: &UserId,
        patient_id: &PatientId,
        starts_at: DateTime<Utc>,
        notes: Option<&str>,
    ) -> AppointmentId {
        let id = AppointmentId::generate();
        self.tables.write().await.appointments.push(AppointmentRow {
            id: id.clone(),
            owner: owner.clone(),
            patient_id: patient_id.clone(),
            starts_at,
            duration_minutes: Some(50),
            notes: notes.map(str::to_string),
        });
        id
    }

    /// Simulates a transport failure on every subsequent call
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of create/update/delete calls received
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Total appointment rows across all owners
    pub async fn appointment_count(&self) -> usize {
        self.tables.read().await.appointments.len()
    }

    fn check_available(&self) -> std::result::Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable(
                "memory store switched off".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn record_write(&self) -> std::result::Result<(), StoreError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()
    }
}

impl Tables {
    fn owns_patient(&self, owner: &UserId, patient_id: &PatientId) -> bool {
        self.patients
            .iter()
            .any(|row| &row.owner == owner && &row.patient.id == patient_id)
    }

    fn instant_taken(
        &self,
        owner: &UserId,
        starts_at: DateTime<Utc>,
        except: Option<&AppointmentId>,
    ) -> bool {
        self.appointments.iter().any(|row| {
            &row.owner == owner && row.starts_at == starts_at && Some(&row.id) != except
        })
    }

    fn to_domain(&self, row: &AppointmentRow) -> Appointment {
        let patient = self
            .patients
            .iter()
            .find(|p| p.owner == row.owner && p.patient.id == row.patient_id)
            .map(|p| p.patient.clone());
        Appointment {
            id: row.id.clone(),
            patient_id: row.patient_id.clone(),
            appointment_datetime: row.starts_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            duration_minutes: row.duration_minutes,
            notes: row.notes.clone(),
            patient,
        }
    }
}

#[async_trait]
impl PatientDirectory for MemoryStore {
    async fn list_patients(&self, owner: &UserId) -> Result<Vec<Patient>> {
        self.check_available()
            .map_err(|e| AgendaError::fetch("patients", e))?;

        let tables = self.tables.read().await;
        let mut patients: Vec<Patient> = tables
            .patients
            .iter()
            .filter(|row| &row.owner == owner)
            .map(|row| row.patient.clone())
            .collect();
        crate::domain::patient::sort_by_name(&mut patients);
        Ok(patients)
    }
}

#[async_trait]
impl AppointmentRepository for MemoryStore {
    async fn list_appointments_in_range(
        &self,
        owner: &UserId,
        range: &DayRange,
    ) -> Result<Vec<Appointment>> {
        self.check_available()
            .map_err(|e| AgendaError::fetch("appointments", e))?;

        let tables = self.tables.read().await;
        let mut rows: Vec<&AppointmentRow> = tables
            .appointments
            .iter()
            .filter(|row| &row.owner == owner && range.contains(&row.starts_at))
            .collect();
        rows.sort_by_key(|row| row.starts_at);
        Ok(rows.into_iter().map(|row| tables.to_domain(row)).collect())
    }

    async fn create_appointment(&self, appointment: &NewAppointment) -> Result<()> {
        self.record_write()
            .map_err(|e| AgendaError::write("create", e))?;

        let mut tables = self.tables.write().await;
        if !tables.owns_patient(&appointment.user_id, &appointment.patient_id) {
            return Err(AgendaError::write(
                "create",
                StoreError::ConstraintViolation(format!(
                    "patient {} does not exist",
                    appointment.patient_id
                )),
            ));
        }
        if tables.instant_taken(&appointment.user_id, appointment.appointment_datetime, None) {
            return Err(AgendaError::write(
                "create",
                StoreError::ConstraintViolation(
                    "duplicate key value violates unique constraint on (user_id, appointment_datetime)"
                        .to_string(),
                ),
            ));
        }

        tables.appointments.push(AppointmentRow {
            id: AppointmentId::generate(),
            owner: appointment.user_id.clone(),
            patient_id: appointment.patient_id.clone(),
            starts_at: appointment.appointment_datetime,
            duration_minutes: None,
            notes: appointment.notes.clone(),
        });
        Ok(())
    }

    async fn update_appointment(
        &self,
        id: &AppointmentId,
        owner: &UserId,
        patch: &AppointmentPatch,
    ) -> Result<MutationOutcome> {
        self.record_write()
            .map_err(|e| AgendaError::write("update", e))?;

        let mut tables = self.tables.write().await;
        let Some(position) = tables
            .appointments
            .iter()
            .position(|row| &row.id == id && &row.owner == owner)
        else {
            return Ok(MutationOutcome::new(0));
        };

        if let Some(patient_id) = &patch.patient_id {
            if !tables.owns_patient(owner, patient_id) {
                return Err(AgendaError::write(
                    "update",
                    StoreError::ConstraintViolation(format!(
                        "patient {patient_id} does not exist"
                    )),
                ));
            }
        }
        if let Some(starts_at) = patch.appointment_datetime {
            if tables.instant_taken(owner, starts_at, Some(id)) {
                return Err(AgendaError::write(
                    "update",
                    StoreError::ConstraintViolation(
                        "duplicate key value violates unique constraint on (user_id, appointment_datetime)"
                            .to_string(),
                    ),
                ));
            }
        }

        let row = &mut tables.appointments[position];
        if let Some(patient_id) = &patch.patient_id {
            row.patient_id = patient_id.clone();
        }
        if let Some(starts_at) = patch.appointment_datetime {
            row.starts_at = starts_at;
        }
        if let Some(notes) = &patch.notes {
            row.notes = Some(notes.clone());
        }
        Ok(MutationOutcome::new(1))
    }

    async fn delete_appointment(
        &self,
        id: &AppointmentId,
        owner: &UserId,
    ) -> Result<MutationOutcome> {
        self.record_write()
            .map_err(|e| AgendaError::write("delete", e))?;

        let mut tables = self.tables.write().await;
        let before = tables.appointments.len();
        tables
            .appointments
            .retain(|row| !(&row.id == id && &row.owner == owner));
        Ok(MutationOutcome::new((before - tables.appointments.len()) as u64))
    }
}

impl ScheduleStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
