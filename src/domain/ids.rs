//! Domain identifier types with validation
//!
//! Newtype wrappers for the opaque identifiers handed out by the store. The
//! store uses UUIDs, but the scheduling core never relies on that format, so
//! the only rule enforced here is "not blank".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new ", $label, " from a string")]
            ///
            /// # Errors
            ///
            /// Returns an error message if the identifier is blank.
            pub fn new(id: impl Into<String>) -> Result<Self, String> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(format!("{} cannot be empty", $label));
                }
                Ok(Self(id))
            }

            /// Generates a fresh random identifier
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Identifier of the signed-in professional owning patients and appointments
    ///
    /// # Examples
    ///
    /// ```
    /// use agenda::domain::ids::UserId;
    ///
    /// let user = UserId::new("0b6f6c1e-3c1f-4d7e-9a55-2f0f0d3c2a11").unwrap();
    /// assert_eq!(user.as_str(), "0b6f6c1e-3c1f-4d7e-9a55-2f0f0d3c2a11");
    /// assert!(UserId::new("  ").is_err());
    /// ```
    UserId,
    "User ID"
);

opaque_id!(
    /// Identifier of a patient record
    PatientId,
    "Patient ID"
);

opaque_id!(
    /// Identifier of an appointment record
    AppointmentId,
    "Appointment ID"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_reject_blank() {
        assert!(UserId::new("").is_err());
        assert!(PatientId::new("   ").is_err());
        assert_eq!(
            AppointmentId::new("").unwrap_err(),
            "Appointment ID cannot be empty"
        );
    }

    #[test]
    fn test_ids_roundtrip_through_str() {
        let id = PatientId::from_str("p-1").unwrap();
        assert_eq!(id.to_string(), "p-1");
        assert_eq!(id.clone().into_inner(), "p-1");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = AppointmentId::new("a-42").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"a-42\"");
        let back: AppointmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
