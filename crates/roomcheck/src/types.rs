use std::collections::HashSet;

use crate::config::Config;
use crate::db::ClassroomDbManager;
use crate::timetable::{ClassroomError, Section};

/// State shared by every request handler.
pub struct AppState {
    pub config: Config,
    pub classroom_db: ClassroomDbManager,
}

/// Everything a read query needs, loaded from the store once per request.
pub struct CampusSnapshot {
    pub sections: Vec<Section>,
    /// `None` if the allocated room list was never loaded
    pub allocated_rooms: Option<Vec<String>>,
    pub projector_rooms: HashSet<String>,
}

impl CampusSnapshot {
    /// The allocated room list, or `StoreUnavailable` if it is missing.
    pub fn require_allocated_rooms(&self) -> Result<&[String], ClassroomError> {
        self.allocated_rooms
            .as_deref()
            .ok_or_else(|| ClassroomError::store_unavailable("Allocated rooms data not found"))
    }
}

impl AppState {
    pub fn new(config: Config, classroom_db: ClassroomDbManager) -> Self {
        Self {
            config,
            classroom_db,
        }
    }

    pub fn snapshot(&self) -> Result<CampusSnapshot, ClassroomError> {
        Ok(CampusSnapshot {
            sections: self.classroom_db.load_sections()?,
            allocated_rooms: self.classroom_db.allocated_rooms()?,
            projector_rooms: self.classroom_db.projector_rooms()?,
        })
    }
}
