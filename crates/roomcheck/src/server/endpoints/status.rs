use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::server::util::error_response;
use crate::types::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthStatus {
    status: &'static str,
    database: String,
    sections: usize,
    allocated_rooms_loaded: bool,
}

/// GET /health
/// Reports whether the store answers, and how much data it holds
pub async fn get_health(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /health");

    let health = s.classroom_db.load_sections().and_then(|sections| {
        Ok(HealthStatus {
            status: "ok",
            database: s.config.database_path.clone(),
            sections: sections.len(),
            allocated_rooms_loaded: s.classroom_db.allocated_rooms()?.is_some(),
        })
    });

    match health {
        Ok(health) => (StatusCode::OK, Json(health)).into_response(),
        Err(e) => error_response(e),
    }
}
