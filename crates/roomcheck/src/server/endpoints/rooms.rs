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
use crate::timetable::availability::{AvailabilityEvaluator, ProjectorRooms, RoomAvailability};
use crate::timetable::suggest::RandomFreeRoomPick;
use crate::timetable::{ClassroomError, SlotQuery};
use crate::types::AppState;

#[derive(Debug, Deserialize)]
pub struct RoomSlotParams {
    #[serde(alias = "room_number")]
    pub room: Option<String>,
    pub day: Option<String>,
    pub period: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SlotParams {
    pub day: Option<String>,
    pub period: Option<String>,
}

impl SlotParams {
    pub fn slot(&self) -> Result<SlotQuery, ClassroomError> {
        SlotQuery::parse(require(&self.day, "day")?, require(&self.period, "period")?)
    }
}

/// GET /api/check-availability?room=701&day=Monday&period=1
/// Checks whether a room is free at a day and period, suggesting a random free room if not
pub async fn get_check_availability(
    State(s): State<Arc<AppState>>,
    query: Result<Query<RoomSlotParams>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => return error_response(query_error(rejection)),
    };
    info!(
        "GET /api/check-availability (room={:?}, day={:?}, period={:?})",
        params.room, params.day, params.period
    );

    match check_availability(&s, &params) {
        Ok(availability) => (StatusCode::OK, Json(availability)).into_response(),
        Err(e) => error_response(e),
    }
}

fn check_availability(
    s: &AppState,
    params: &RoomSlotParams,
) -> Result<RoomAvailability, ClassroomError> {
    let room = require(&params.room, "room")?;
    let day = require(&params.day, "day")?;
    let period = require(&params.period, "period")?;

    let snapshot = s.snapshot()?;
    let allocated = snapshot.require_allocated_rooms()?;
    let evaluator = AvailabilityEvaluator::new(&snapshot.sections, allocated);

    // An unallocated room is reported as invalid whatever the day and period say
    evaluator.ensure_allocated(room)?;
    let query = SlotQuery::parse(day, period)?;
    evaluator.check_room(room, query, &RandomFreeRoomPick)
}

/// GET /api/projector?day=Monday&period=1
/// Lists free rooms that have a projector
pub async fn get_projector_rooms(
    State(s): State<Arc<AppState>>,
    query: Result<Query<SlotParams>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => return error_response(query_error(rejection)),
    };
    info!(
        "GET /api/projector (day={:?}, period={:?})",
        params.day, params.period
    );

    match projector_rooms(&s, &params) {
        Ok(rooms) => (StatusCode::OK, Json(rooms)).into_response(),
        Err(e) => error_response(e),
    }
}

fn projector_rooms(s: &AppState, params: &SlotParams) -> Result<ProjectorRooms, ClassroomError> {
    let query = params.slot()?;

    let snapshot = s.snapshot()?;
    let allocated = snapshot.require_allocated_rooms()?;
    Ok(AvailabilityEvaluator::new(&snapshot.sections, allocated)
        .projector_rooms(query, &snapshot.projector_rooms))
}
