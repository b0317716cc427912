use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::server::util::{error_response, query_error};
use crate::timetable::dashboard::{DashboardAggregator, DashboardStats, StatsRequest};
use crate::timetable::ClassroomError;
use crate::types::AppState;

#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub day: Option<String>,
    /// 0-based period index
    pub period: Option<String>,
}

impl StatsParams {
    fn into_request(self) -> Result<StatsRequest, ClassroomError> {
        let day = self
            .day
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let period = match self.period.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
                ClassroomError::InvalidParameter {
                    name: "period",
                    value: raw.to_string(),
                }
            })?),
        };
        Ok(StatsRequest { day, period })
    }
}

/// GET /api/dashboard-stats?day=Monday&period=0
/// Occupancy totals for the given (or current) day and period plus weekly free-slot counts
pub async fn get_dashboard_stats(
    State(s): State<Arc<AppState>>,
    query: Result<Query<StatsParams>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => return error_response(query_error(rejection)),
    };
    info!(
        "GET /api/dashboard-stats (day={:?}, period={:?})",
        params.day, params.period
    );

    match dashboard_stats(&s, params) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => error_response(e),
    }
}

fn dashboard_stats(s: &AppState, params: StatsParams) -> Result<DashboardStats, ClassroomError> {
    let request = params.into_request()?;

    let snapshot = s.snapshot()?;
    let allocated = snapshot.require_allocated_rooms()?;
    DashboardAggregator::new(&snapshot.sections, allocated, &snapshot.projector_rooms)
        .compute(&request, chrono::Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(day: Option<&str>, period: Option<&str>) -> StatsParams {
        StatsParams {
            day: day.map(str::to_string),
            period: period.map(str::to_string),
        }
    }

    #[test]
    fn test_blank_values_fall_back_to_clock() {
        let request = params(Some(" "), Some("")).into_request().unwrap();
        assert!(request.day.is_none());
        assert!(request.period.is_none());
    }

    #[test]
    fn test_period_must_be_integer() {
        let request = params(Some("Tuesday"), Some("-1")).into_request().unwrap();
        assert_eq!(request.period, Some(-1));
        assert_eq!(request.day.as_deref(), Some("Tuesday"));

        assert!(matches!(
            params(None, Some("third")).into_request(),
            Err(ClassroomError::InvalidParameter { name: "period", .. })
        ));
    }
}
