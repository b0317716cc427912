use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::server::util::{error_response, query_error, require};
use crate::timetable::faculty::{FacultyLocator, StaffAvailability};
use crate::timetable::{ClassroomError, SlotQuery};
use crate::types::AppState;

#[derive(Debug, Deserialize)]
pub struct StaffParams {
    pub faculty: Option<String>,
    pub day: Option<String>,
    pub period: Option<String>,
}

/// GET /api/check-staff?faculty=F002&day=Monday&period=4
/// Checks whether a faculty member is teaching, and where, plus their next free hour
pub async fn get_check_staff(
    State(s): State<Arc<AppState>>,
    query: Result<Query<StaffParams>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => return error_response(query_error(rejection)),
    };
    info!(
        "GET /api/check-staff (faculty={:?}, day={:?}, period={:?})",
        params.faculty, params.day, params.period
    );

    match check_staff(&s, &params) {
        Ok(availability) => (StatusCode::OK, Json(availability)).into_response(),
        Err(e) => error_response(e),
    }
}

fn check_staff(s: &AppState, params: &StaffParams) -> Result<StaffAvailability, ClassroomError> {
    let faculty = require(&params.faculty, "faculty")?;
    let query = SlotQuery::parse(
        require(&params.day, "day")?,
        require(&params.period, "period")?,
    )?;

    let sections = s.classroom_db.load_sections()?;
    Ok(FacultyLocator::new(&sections).check(faculty, query))
}

/// GET /api/faculty-list
/// Returns distinct faculty (id, name) across all sections
pub async fn get_faculty_list(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/faculty-list");

    match s.classroom_db.load_sections() {
        Ok(sections) => (StatusCode::OK, Json(FacultyLocator::new(&sections).roster())).into_response(),
        Err(e) => error_response(e),
    }
}
