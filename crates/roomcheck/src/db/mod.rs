/// Database module for section timetables and campus room lists

mod types;

pub use types::{DbPeriod, DbSection};

use crate::timetable::{ClassroomError, Faculty, PeriodSlot, Section, Weekday};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_classrooms.sql");

pub struct ClassroomDbManager {
    db: Mutex<Connection>,
}

impl ClassroomDbManager {
    /// Opens (or creates) the database at `db_path` and initializes the schema
    pub fn open(db_path: &str) -> Result<Self, ClassroomError> {
        Self::init(Connection::open(db_path)?)
    }

    /// Opens a private in-memory database
    pub fn open_in_memory() -> Result<Self, ClassroomError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, ClassroomError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, ClassroomError> {
        self.db
            .lock()
            .map_err(|_| ClassroomError::store_unavailable("database lock poisoned"))
    }

    /// Checks if any section has been stored yet
    pub fn has_sections(&self) -> Result<bool, ClassroomError> {
        let db = self.conn()?;
        let count: i64 = db.query_row("SELECT COUNT(*) FROM sections", [], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Inserts a section, replacing the roster and every day of an existing one
    pub fn insert_section(&self, section: &Section) -> Result<(), ClassroomError> {
        let mut db = self.conn()?;
        let tx = db.transaction()?;

        tx.execute(
            "INSERT INTO sections (year, section, room_number, created_at)
             VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT (year, section) DO UPDATE SET room_number = excluded.room_number",
            (&section.year, &section.section, &section.room_number),
        )?;
        let section_pk = find_section_pk(&tx, &section.year, &section.section)?.ok_or_else(|| {
            ClassroomError::store_unavailable("section vanished during insert")
        })?;

        tx.execute("DELETE FROM faculty WHERE section_pk = ?", [section_pk])?;
        for (position, faculty) in section.faculty.iter().enumerate() {
            tx.execute(
                "INSERT INTO faculty (section_pk, position, faculty_id, name, subjects)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    section_pk,
                    position as i64,
                    faculty.id,
                    faculty.name,
                    serde_json::to_string(&faculty.subjects)?,
                ],
            )?;
        }

        for day in Weekday::ALL {
            write_day(&tx, section_pk, day, section.schedule.day(day))?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Rewrites one day of a stored section
    pub fn save_day(&self, section: &Section, day: Weekday) -> Result<(), ClassroomError> {
        let mut db = self.conn()?;
        let tx = db.transaction()?;

        let section_pk = find_section_pk(&tx, &section.year, &section.section)?.ok_or_else(|| {
            ClassroomError::SectionNotFound {
                year: section.year.clone(),
                section: section.section.clone(),
            }
        })?;
        write_day(&tx, section_pk, day, section.schedule.day(day))?;

        tx.commit()?;
        Ok(())
    }

    /// Gets a section with its roster and full schedule
    pub fn get_section(&self, year: &str, section: &str) -> Result<Option<Section>, ClassroomError> {
        let db = self.conn()?;
        let row = db
            .query_row(
                "SELECT section_pk, year, section, room_number FROM sections
                 WHERE year = ? AND section = ?",
                (year, section),
                section_from_row,
            )
            .optional()?;

        match row {
            Some(row) => Ok(Some(assemble_section(&db, row)?)),
            None => Ok(None),
        }
    }

    /// Gets every section with its roster and full schedule, in insertion order
    pub fn load_sections(&self) -> Result<Vec<Section>, ClassroomError> {
        let db = self.conn()?;
        let mut stmt = db.prepare(
            "SELECT section_pk, year, section, room_number FROM sections ORDER BY section_pk",
        )?;
        let rows = stmt
            .query_map([], section_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|row| assemble_section(&db, row))
            .collect()
    }

    /// Gets the allocated room list, or `None` if it was never loaded
    pub fn allocated_rooms(&self) -> Result<Option<Vec<String>>, ClassroomError> {
        let db = self.conn()?;
        let mut stmt = db.prepare("SELECT room FROM allocated_rooms ORDER BY position")?;
        let rooms = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(if rooms.is_empty() { None } else { Some(rooms) })
    }

    /// Replaces the allocated room list
    pub fn set_allocated_rooms(&self, rooms: &[String]) -> Result<(), ClassroomError> {
        let mut db = self.conn()?;
        let tx = db.transaction()?;

        tx.execute("DELETE FROM allocated_rooms", [])?;
        for (position, room) in rooms.iter().enumerate() {
            tx.execute(
                "INSERT OR IGNORE INTO allocated_rooms (position, room) VALUES (?1, ?2)",
                (position as i64, room),
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Gets the rooms registered as having a projector
    pub fn projector_rooms(&self) -> Result<HashSet<String>, ClassroomError> {
        let db = self.conn()?;
        let mut stmt = db.prepare("SELECT room FROM projector_rooms WHERE projector = 1")?;
        let rooms = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<HashSet<String>>>()?;
        Ok(rooms)
    }

    /// Records whether `room` has a projector
    pub fn set_projector_room(&self, room: &str, projector: bool) -> Result<(), ClassroomError> {
        let db = self.conn()?;
        db.execute(
            "INSERT INTO projector_rooms (room, projector) VALUES (?1, ?2)
             ON CONFLICT (room) DO UPDATE SET projector = excluded.projector",
            (room, projector),
        )?;
        Ok(())
    }
}

fn section_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DbSection> {
    Ok(DbSection {
        section_pk: row.get(0)?,
        year: row.get(1)?,
        section: row.get(2)?,
        room_number: row.get(3)?,
    })
}

fn find_section_pk(tx: &Transaction<'_>, year: &str, section: &str) -> rusqlite::Result<Option<i64>> {
    tx.query_row(
        "SELECT section_pk FROM sections WHERE year = ? AND section = ?",
        (year, section),
        |row| row.get(0),
    )
    .optional()
}

fn write_day(
    tx: &Transaction<'_>,
    section_pk: i64,
    day: Weekday,
    slots: &[PeriodSlot],
) -> Result<(), ClassroomError> {
    tx.execute(
        "DELETE FROM periods WHERE section_pk = ?1 AND day = ?2",
        (section_pk, day.name()),
    )?;

    for (position, slot) in slots.iter().enumerate() {
        tx.execute(
            "INSERT INTO periods (
                section_pk, day, position, period, faculty_id,
                occupied, room, subject, projector
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                section_pk,
                day.name(),
                position as i64,
                slot.period,
                slot.faculty_id,
                slot.occupied,
                slot.room,
                slot.subject,
                slot.projector,
            ],
        )?;
    }

    Ok(())
}

fn assemble_section(db: &Connection, row: DbSection) -> Result<Section, ClassroomError> {
    let mut faculty_stmt = db.prepare(
        "SELECT faculty_id, name, subjects FROM faculty
         WHERE section_pk = ? ORDER BY position",
    )?;
    let faculty_rows = faculty_stmt
        .query_map([row.section_pk], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?, r.get::<_, String>(2)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let faculty = faculty_rows
        .into_iter()
        .map(|(id, name, subjects)| {
            Ok(Faculty {
                id,
                name,
                subjects: serde_json::from_str(&subjects)?,
            })
        })
        .collect::<Result<Vec<_>, ClassroomError>>()?;

    let mut period_stmt = db.prepare(
        "SELECT day, period, faculty_id, occupied, room, subject, projector FROM periods
         WHERE section_pk = ? ORDER BY day, position",
    )?;
    let periods = period_stmt
        .query_map([row.section_pk], |r| {
            Ok(DbPeriod {
                day: r.get(0)?,
                period: r.get(1)?,
                faculty_id: r.get(2)?,
                occupied: r.get(3)?,
                room: r.get(4)?,
                subject: r.get(5)?,
                projector: r.get(6)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut section = Section {
        room_number: row.room_number,
        year: row.year,
        section: row.section,
        faculty,
        schedule: Default::default(),
    };

    for period in periods {
        let day: Weekday = period.day.parse().map_err(|_| {
            ClassroomError::store_unavailable(format!("unknown day {:?} in periods", period.day))
        })?;
        section.schedule.day_mut(day).push(period.into());
    }

    Ok(section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::fixtures::{section, slot};

    fn sample() -> Section {
        let mut s = section("2", "A", &[("F1", "Asha")]);
        s.room_number = "704".to_string();
        s.faculty[0].subjects = vec!["DBMS".to_string()];
        s.schedule.day_mut(Weekday::Monday).extend([
            slot(3, "F1", "702", "DBMS"),
            slot(1, "F1", "701", "DBMS"),
            PeriodSlot::empty(2),
        ]);
        s.schedule.day_mut(Weekday::Saturday).push(slot(1, "F1", "Lab1", "Lab"));
        s
    }

    #[test]
    fn test_section_round_trip_keeps_slot_order() {
        let db = ClassroomDbManager::open_in_memory().unwrap();
        assert!(!db.has_sections().unwrap());

        db.insert_section(&sample()).unwrap();
        assert!(db.has_sections().unwrap());

        let loaded = db.get_section("2", "A").unwrap().unwrap();
        assert_eq!(loaded, sample());
        assert!(db.get_section("2", "B").unwrap().is_none());
    }

    #[test]
    fn test_insert_section_replaces_existing() {
        let db = ClassroomDbManager::open_in_memory().unwrap();
        db.insert_section(&sample()).unwrap();

        let mut changed = sample();
        changed.schedule.day_mut(Weekday::Monday).truncate(1);
        db.insert_section(&changed).unwrap();

        let all = db.load_sections().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].schedule.day(Weekday::Monday).len(), 1);
    }

    #[test]
    fn test_save_day_requires_stored_section() {
        let db = ClassroomDbManager::open_in_memory().unwrap();
        let err = db.save_day(&sample(), Weekday::Monday).unwrap_err();
        assert!(matches!(err, ClassroomError::SectionNotFound { .. }));
    }

    #[test]
    fn test_campus_room_lists() {
        let db = ClassroomDbManager::open_in_memory().unwrap();
        assert_eq!(db.allocated_rooms().unwrap(), None);

        let rooms = vec!["703".to_string(), "701".to_string(), "Lab1".to_string()];
        db.set_allocated_rooms(&rooms).unwrap();
        assert_eq!(db.allocated_rooms().unwrap(), Some(rooms));

        db.set_projector_room("701", true).unwrap();
        db.set_projector_room("703", true).unwrap();
        db.set_projector_room("703", false).unwrap();
        assert_eq!(db.projector_rooms().unwrap(), HashSet::from(["701".to_string()]));
    }
}
