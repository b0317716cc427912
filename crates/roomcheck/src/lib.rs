//! Classroom, lab and faculty availability over a campus weekly timetable.
//!
//! Sections (a year plus a section label) each own a six-day schedule of numbered teaching
//! periods. Every read query scans those schedules at a given day and period against the
//! campus-wide allocated room list; edits rewrite one day of one section at a time.

pub mod config;
pub mod db;
pub mod server;
pub mod timetable;
pub mod types;

pub use config::{Config, SeedData};
pub use db::ClassroomDbManager;
pub use server::create_router;
pub use timetable::ClassroomError;
pub use types::AppState;
