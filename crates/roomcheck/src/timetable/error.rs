//! Error types for timetable queries and edits.

use thiserror::Error;

/// Errors that can occur while answering a query or applying an edit.
#[derive(Debug, Error)]
pub enum ClassroomError {
    /// A required request parameter was absent or empty
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// A parameter was present but could not be interpreted
    #[error("Invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    /// No stored section matches (year, section)
    #[error("Classroom not found")]
    SectionNotFound { year: String, section: String },

    /// The section has no slot with this period number on this day
    #[error("Period not found")]
    PeriodNotFound { day: String, period: u8 },

    /// An add was attempted for a period number already present on that day
    #[error("Period already exists. Use update instead.")]
    DuplicatePeriod { day: String, period: u8 },

    /// The room is not in the allocated room list
    #[error("You entered a wrong room number. \"{room}\" is not found in the allocated rooms.")]
    InvalidRoom { room: String },

    /// Campus reference data could not be loaded
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClassroomError {
    /// Returns true if the caller can fix this by changing the request.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            ClassroomError::StoreUnavailable { .. }
                | ClassroomError::Database(_)
                | ClassroomError::Serialization(_)
        )
    }

    pub(crate) fn store_unavailable(message: impl Into<String>) -> Self {
        ClassroomError::StoreUnavailable {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_room_message_names_room() {
        let err = ClassroomError::InvalidRoom {
            room: "999".to_string(),
        };
        assert!(err.to_string().contains("\"999\""));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_store_errors_are_not_client_errors() {
        assert!(!ClassroomError::store_unavailable("allocated rooms missing").is_client_error());
        assert!(ClassroomError::MissingParameter("room").is_client_error());
    }
}
