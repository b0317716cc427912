use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::endpoints::{dashboard, labs, rooms, staff, status, timetable};
use crate::types::AppState;

mod endpoints;
mod types;
mod util;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Read-only occupancy queries
    let query_router = Router::new()
        .route("/check-availability", get(rooms::get_check_availability))
        .route("/projector", get(rooms::get_projector_rooms))
        .route("/lab-list", get(labs::get_lab_list))
        .route(
            "/check-lab-availability",
            get(labs::get_check_lab_availability),
        )
        .route("/check-staff", get(staff::get_check_staff))
        .route("/faculty-list", get(staff::get_faculty_list))
        .route("/dashboard-stats", get(dashboard::get_dashboard_stats));

    // Timetable editing
    let timetable_router = Router::new()
        .route("/timetable", get(timetable::get_timetable))
        .route(
            "/timetable/:year/:section",
            get(timetable::get_timetable_by_path),
        )
        .route("/timetable/update", put(timetable::put_update_period))
        .route("/timetable/delete", delete(timetable::delete_period))
        .route("/timetable/add", post(timetable::post_add_period));

    Router::new()
        .route("/health", get(status::get_health))
        .nest("/api", query_router.merge(timetable_router))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
