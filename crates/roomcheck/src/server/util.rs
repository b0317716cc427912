use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::server::types::ApiErrorType;
use crate::timetable::availability::RoomAvailability;
use crate::timetable::ClassroomError;

/// Returns the trimmed value of a required parameter.
pub fn require<'a>(
    value: &'a Option<String>,
    name: &'static str,
) -> Result<&'a str, ClassroomError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ClassroomError::MissingParameter(name))
}

/// Maps a rejected JSON body onto the parameter errors every endpoint reports.
pub fn body_error(rejection: JsonRejection) -> ClassroomError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => ClassroomError::MissingParameter("body"),
        other => ClassroomError::InvalidParameter {
            name: "body",
            value: other.body_text(),
        },
    }
}

/// Maps a query string that could not be deserialized (e.g. a repeated key).
pub fn query_error(rejection: QueryRejection) -> ClassroomError {
    ClassroomError::InvalidParameter {
        name: "query",
        value: rejection.body_text(),
    }
}

/// Converts a `ClassroomError` into the response the API promises for it.
///
/// Internal faults are logged here and reported to the client only as "Server error".
pub fn error_response(err: ClassroomError) -> Response {
    let status = match &err {
        ClassroomError::MissingParameter(_)
        | ClassroomError::InvalidParameter { .. }
        | ClassroomError::DuplicatePeriod { .. } => StatusCode::BAD_REQUEST,
        ClassroomError::SectionNotFound { .. }
        | ClassroomError::PeriodNotFound { .. }
        | ClassroomError::InvalidRoom { .. } => StatusCode::NOT_FOUND,
        ClassroomError::StoreUnavailable { .. }
        | ClassroomError::Database(_)
        | ClassroomError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if err.is_client_error() {
        warn!("Rejected request: {}", err);
    } else {
        error!("Internal error: {}", err);
    }

    match err {
        ClassroomError::InvalidRoom { .. } => {
            (status, Json(RoomAvailability::invalid(err.to_string()))).into_response()
        }
        ClassroomError::StoreUnavailable { message } => {
            ApiErrorType::from((status, message.as_str(), None)).into_response()
        }
        ClassroomError::Database(_) | ClassroomError::Serialization(_) => {
            ApiErrorType::from((status, "Server error", None)).into_response()
        }
        ClassroomError::InvalidParameter { name, value } => {
            ApiErrorType::from((status, format!("Invalid {name}").as_str(), Some(value)))
                .into_response()
        }
        _ => ApiErrorType::from((status, err.to_string().as_str(), None)).into_response(),
    }
}
