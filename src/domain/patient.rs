//! Patient domain model
//!
//! Patients are owned and edited elsewhere; the scheduling core only reads the
//! identifier and display name to populate the patient selector and to label
//! booked slots.

use super::ids::PatientId;
use serde::{Deserialize, Serialize};

/// A patient of the signed-in professional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    /// Unique patient identifier
    pub id: PatientId,

    /// Display name
    pub fullname: String,
}

impl Patient {
    /// Creates a patient reference
    pub fn new(id: PatientId, fullname: impl Into<String>) -> Self {
        Self {
            id,
            fullname: fullname.into(),
        }
    }
}

/// Sorts patients the way the directory returns them (display name ascending)
pub fn sort_by_name(patients: &mut [Patient]) {
    patients.sort_by(|a, b| a.fullname.cmp(&b.fullname));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_name() {
        let mut patients = vec![
            Patient::new(PatientId::new("2").unwrap(), "Bruno"),
            Patient::new(PatientId::new("1").unwrap(), "Ana"),
            Patient::new(PatientId::new("3").unwrap(), "Carla"),
        ];
        sort_by_name(&mut patients);
        let names: Vec<&str> = patients.iter().map(|p| p.fullname.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bruno", "Carla"]);
    }
}
