pub mod dashboard;
pub mod labs;
pub mod rooms;
pub mod staff;
pub mod status;
pub mod timetable;
