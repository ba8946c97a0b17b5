//! Result type alias for Agenda

use super::errors::AgendaError;

/// Result type alias for Agenda operations
///
/// # Examples
///
/// ```
/// use agenda::domain::result::Result;
/// use agenda::domain::errors::AgendaError;
///
/// fn failing_function() -> Result<()> {
///     Err(AgendaError::Validation("Select a patient".to_string()))
/// }
///
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, AgendaError>;
