//! Domain error types
//!
//! This module defines the error hierarchy for Agenda. Every failure a user can
//! see is classified into one of the scheduling error kinds (fetch, validation,
//! write, access) so the caller can decide what to show and which loading flag
//! to reset. Backend failures are described by [`StoreError`], which never
//! exposes third-party client types.

use thiserror::Error;

/// Main Agenda error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum AgendaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Listing patients or appointments failed
    #[error("Failed to fetch {what}: {source}")]
    Fetch {
        /// What was being listed ("patients", "appointments")
        what: &'static str,
        /// Underlying store failure
        #[source]
        source: StoreError,
    },

    /// Listing was refused by the store's row-level policy
    #[error("Access denied while fetching {what}: {message}")]
    Access {
        /// What was being listed
        what: &'static str,
        /// Message reported by the store
        message: String,
    },

    /// Local, pre-network validation failure
    #[error("Validation error: {0}")]
    Validation(String),

    /// Create, update or delete rejected by the store
    #[error("Failed to {action} appointment: {source}")]
    Write {
        /// Mutation that failed ("create", "update", "delete")
        action: &'static str,
        /// Underlying store failure
        #[source]
        source: StoreError,
    },

    /// A mutation matched no row for the caller
    #[error("Not found: {0}")]
    NotFound(String),

    /// Two appointments of the same day share a slot key
    #[error("Schedule conflict at {time}: appointments {first} and {second} share the slot")]
    ScheduleConflict {
        /// Slot label (HH:mm)
        time: String,
        /// Appointment kept for the slot
        first: String,
        /// Appointment that collided with it
        second: String,
    },

    /// Session lifecycle errors
    #[error("Session error: {0}")]
    Session(String),

    /// Network/connection errors outside a classified operation
    #[error("Connection error: {0}")]
    Connection(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl AgendaError {
    /// Classifies a store failure raised while listing rows
    ///
    /// Permission denials become [`AgendaError::Access`], everything else
    /// becomes [`AgendaError::Fetch`].
    pub fn fetch(what: &'static str, source: StoreError) -> Self {
        match source {
            StoreError::PermissionDenied(message) => AgendaError::Access { what, message },
            source => AgendaError::Fetch { what, source },
        }
    }

    /// Classifies a store failure raised by a mutation
    pub fn write(action: &'static str, source: StoreError) -> Self {
        AgendaError::Write { action, source }
    }

    /// Whether the error happened before any network call was made
    pub fn is_validation(&self) -> bool {
        matches!(self, AgendaError::Validation(_))
    }
}

/// Store-specific errors
///
/// Errors that occur when talking to the backing store, whatever the backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Failed to reach the store
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Row-level policy or credentials refused the request
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Unique/foreign-key/check constraint rejected the row
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Query failed for another reason
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Invalid response from store
    #[error("Invalid response from store: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Store marked unavailable
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Maps an HTTP status and body to a store error
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => StoreError::PermissionDenied(message),
            409 => StoreError::ConstraintViolation(message),
            408 | 504 => StoreError::Timeout(message),
            400..=499 => StoreError::ClientError { status, message },
            _ => StoreError::ServerError { status, message },
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for AgendaError {
    fn from(err: std::io::Error) -> Self {
        AgendaError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for AgendaError {
    fn from(err: serde_json::Error) -> Self {
        AgendaError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for AgendaError {
    fn from(err: toml::de::Error) -> Self {
        AgendaError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agenda_error_display() {
        let err = AgendaError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_fetch_classifies_permission_denied_as_access() {
        let err = AgendaError::fetch(
            "patients",
            StoreError::PermissionDenied("row-level policy".to_string()),
        );
        assert!(matches!(err, AgendaError::Access { what: "patients", .. }));
    }

    #[test]
    fn test_fetch_keeps_other_failures() {
        let err = AgendaError::fetch(
            "appointments",
            StoreError::ConnectionFailed("reset".to_string()),
        );
        assert!(matches!(err, AgendaError::Fetch { what: "appointments", .. }));
        assert!(err.to_string().contains("Failed to fetch appointments"));
    }

    #[test]
    fn test_write_error_display() {
        let err = AgendaError::write(
            "create",
            StoreError::ConstraintViolation("duplicate key".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Failed to create appointment: Constraint violation: duplicate key"
        );
    }

    #[test]
    fn test_store_error_from_status() {
        assert!(matches!(
            StoreError::from_status(401, "jwt expired"),
            StoreError::PermissionDenied(_)
        ));
        assert!(matches!(
            StoreError::from_status(409, "duplicate"),
            StoreError::ConstraintViolation(_)
        ));
        assert!(matches!(
            StoreError::from_status(422, "bad"),
            StoreError::ClientError { status: 422, .. }
        ));
        assert!(matches!(
            StoreError::from_status(503, "down"),
            StoreError::ServerError { status: 503, .. }
        ));
    }

    #[test]
    fn test_schedule_conflict_display() {
        let err = AgendaError::ScheduleConflict {
            time: "09:00".to_string(),
            first: "a1".to_string(),
            second: "a2".to_string(),
        };
        assert!(err.to_string().contains("09:00"));
        assert!(err.to_string().contains("a2"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: AgendaError = io_err.into();
        assert!(matches!(err, AgendaError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: AgendaError = toml_err.into();
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_agenda_error_implements_std_error() {
        let err = AgendaError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
