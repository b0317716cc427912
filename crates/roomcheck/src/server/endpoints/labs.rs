use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use super::rooms::RoomSlotParams;
use crate::server::util::{error_response, query_error, require};
use crate::timetable::availability::{list_labs, AvailabilityEvaluator, LabAvailability};
use crate::timetable::{ClassroomError, SlotQuery};
use crate::types::AppState;

/// GET /api/lab-list
/// Returns every distinct lab room used Monday to Friday
pub async fn get_lab_list(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/lab-list");

    match s.classroom_db.load_sections() {
        Ok(sections) => (StatusCode::OK, Json(list_labs(&sections))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/check-lab-availability?room=Lab1&day=Monday&period=1
/// Checks whether a lab is free, suggesting the first free lettered room if not
pub async fn get_check_lab_availability(
    State(s): State<Arc<AppState>>,
    query: Result<Query<RoomSlotParams>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => return error_response(query_error(rejection)),
    };
    info!(
        "GET /api/check-lab-availability (room={:?}, day={:?}, period={:?})",
        params.room, params.day, params.period
    );

    match check_lab(&s, &params) {
        Ok(availability) => (StatusCode::OK, Json(availability)).into_response(),
        Err(e) => error_response(e),
    }
}

fn check_lab(s: &AppState, params: &RoomSlotParams) -> Result<LabAvailability, ClassroomError> {
    let room = require(&params.room, "room")?;
    let query = SlotQuery::parse(
        require(&params.day, "day")?,
        require(&params.period, "period")?,
    )?;

    let snapshot = s.snapshot()?;
    let allocated = snapshot.require_allocated_rooms()?;
    Ok(AvailabilityEvaluator::new(&snapshot.sections, allocated).check_lab(room, query))
}
