use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::server::util::{body_error, error_response, query_error, require};
use crate::timetable::editor::{PeriodPatch, ScheduleEditor};
use crate::timetable::{parse_period, ClassroomError, PeriodSlot, Weekday};
use crate::types::AppState;

/// A body field the editor UI may send either as a string or as a bare number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextOrNumber {
    Text(String),
    Number(i64),
}

impl TextOrNumber {
    fn text(value: &Option<TextOrNumber>) -> Option<String> {
        value.as_ref().map(|v| match v {
            TextOrNumber::Text(s) => s.clone(),
            TextOrNumber::Number(n) => n.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SectionParams {
    pub year: Option<String>,
    pub section: Option<String>,
}

/// Identifies one slot of one section. Shared by the update, delete and add bodies.
#[derive(Debug, Deserialize)]
pub struct SlotTarget {
    pub year: Option<TextOrNumber>,
    pub section: Option<String>,
    pub day: Option<String>,
    pub period: Option<TextOrNumber>,
}

struct ResolvedTarget {
    year: String,
    section: String,
    day: Weekday,
    period: u8,
}

impl SlotTarget {
    fn resolve(&self) -> Result<ResolvedTarget, ClassroomError> {
        let year = TextOrNumber::text(&self.year);
        let period = TextOrNumber::text(&self.period);

        Ok(ResolvedTarget {
            year: require(&year, "year")?.to_string(),
            section: require(&self.section, "section")?.to_string(),
            day: require(&self.day, "day")?.parse()?,
            period: parse_period(require(&period, "period")?)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
    #[serde(flatten)]
    pub target: SlotTarget,
    pub updates: Option<PeriodPatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBody {
    #[serde(flatten)]
    pub target: SlotTarget,
    pub new_entry: Option<PeriodPatch>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdatedResponse {
    message: &'static str,
    updated_period: PeriodSlot,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddedResponse {
    message: &'static str,
    added_period: PeriodSlot,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

/// GET /api/timetable?year=2&section=A
pub async fn get_timetable(
    State(s): State<Arc<AppState>>,
    query: Result<Query<SectionParams>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => return error_response(query_error(rejection)),
    };
    info!(
        "GET /api/timetable (year={:?}, section={:?})",
        params.year, params.section
    );

    let target = require(&params.year, "year")
        .and_then(|year| Ok((year, require(&params.section, "section")?)));
    match target {
        Ok((year, section)) => timetable_response(&s, year, section),
        Err(e) => error_response(e),
    }
}

/// GET /api/timetable/:year/:section
pub async fn get_timetable_by_path(
    State(s): State<Arc<AppState>>,
    Path((year, section)): Path<(String, String)>,
) -> Response {
    info!("GET /api/timetable/{}/{}", year, section);
    timetable_response(&s, &year, &section)
}

fn timetable_response(s: &AppState, year: &str, section: &str) -> Response {
    match ScheduleEditor::new(&s.classroom_db).timetable(year, section) {
        Ok(schedule) => (StatusCode::OK, Json(schedule)).into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT /api/timetable/update
/// Merges `updates` into an existing slot
pub async fn put_update_period(
    State(s): State<Arc<AppState>>,
    body: Result<Json<UpdateBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return error_response(body_error(rejection)),
    };
    info!(
        "PUT /api/timetable/update (year={:?}, section={:?}, day={:?}, period={:?})",
        body.target.year, body.target.section, body.target.day, body.target.period
    );

    let result = body.target.resolve().and_then(|t| {
        let patch = body.updates.ok_or(ClassroomError::MissingParameter("updates"))?;
        ScheduleEditor::new(&s.classroom_db).update_period(
            &t.year, &t.section, t.day, t.period, patch,
        )
    });

    match result {
        Ok(updated_period) => (
            StatusCode::OK,
            Json(UpdatedResponse {
                message: "Period updated successfully",
                updated_period,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/timetable/delete
/// Resets a slot to an empty one
pub async fn delete_period(
    State(s): State<Arc<AppState>>,
    body: Result<Json<SlotTarget>, JsonRejection>,
) -> Response {
    let Json(target) = match body {
        Ok(body) => body,
        Err(rejection) => return error_response(body_error(rejection)),
    };
    info!(
        "DELETE /api/timetable/delete (year={:?}, section={:?}, day={:?}, period={:?})",
        target.year, target.section, target.day, target.period
    );

    let result = target.resolve().and_then(|t| {
        ScheduleEditor::new(&s.classroom_db).clear_period(&t.year, &t.section, t.day, t.period)
    });

    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Period cleared successfully",
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/timetable/add
/// Appends a new slot; an existing period on that day is rejected
pub async fn post_add_period(
    State(s): State<Arc<AppState>>,
    body: Result<Json<AddBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return error_response(body_error(rejection)),
    };
    info!(
        "POST /api/timetable/add (year={:?}, section={:?}, day={:?}, period={:?})",
        body.target.year, body.target.section, body.target.day, body.target.period
    );

    let result = body.target.resolve().and_then(|t| {
        let entry = body.new_entry.ok_or(ClassroomError::MissingParameter("newEntry"))?;
        ScheduleEditor::new(&s.classroom_db).add_period(
            &t.year, &t.section, t.day, t.period, entry,
        )
    });

    match result {
        Ok(added_period) => (
            StatusCode::OK,
            Json(AddedResponse {
                message: "Period added successfully",
                added_period,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_accepts_numeric_year_and_period() {
        let target: SlotTarget = serde_json::from_str(
            r#"{"year": 2, "section": "A", "day": "tuesday", "period": "4"}"#,
        )
        .unwrap();
        let resolved = target.resolve().unwrap();
        assert_eq!(resolved.year, "2");
        assert_eq!(resolved.day, Weekday::Tuesday);
        assert_eq!(resolved.period, 4);
    }

    #[test]
    fn test_target_requires_every_field() {
        let target: SlotTarget =
            serde_json::from_str(r#"{"year": "2", "day": "Monday", "period": 1}"#).unwrap();
        assert!(matches!(
            target.resolve(),
            Err(ClassroomError::MissingParameter("section"))
        ));
    }

    #[test]
    fn test_add_body_reads_new_entry() {
        let body: AddBody = serde_json::from_str(
            r#"{"year": "2", "section": "A", "day": "Monday", "period": 2,
                "newEntry": {"facultyId": "F1", "room": "701", "occupied": true}}"#,
        )
        .unwrap();
        let entry = body.new_entry.unwrap();
        assert_eq!(entry.faculty_id, Some(Some("F1".to_string())));
        assert_eq!(entry.occupied, Some(true));
        assert!(entry.subject.is_none());
    }
}
