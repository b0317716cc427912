/// Row types for the classroom store

use crate::timetable::PeriodSlot;

#[derive(Debug, Clone)]
pub struct DbSection {
    pub section_pk: i64,
    pub year: String,
    pub section: String,
    pub room_number: String,
}

#[derive(Debug, Clone)]
pub struct DbPeriod {
    pub day: String,
    pub period: u8,
    pub faculty_id: Option<String>,
    pub occupied: bool,
    pub room: Option<String>,
    pub subject: Option<String>,
    pub projector: bool,
}

impl From<DbPeriod> for PeriodSlot {
    fn from(row: DbPeriod) -> Self {
        PeriodSlot {
            period: row.period,
            faculty_id: row.faculty_id,
            occupied: row.occupied,
            room: row.room,
            subject: row.subject,
            projector: row.projector,
        }
    }
}
