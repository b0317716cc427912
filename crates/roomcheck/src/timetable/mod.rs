//! Weekly timetable model and the read/write logic built on top of it.
//!
//! A [`Section`] is one (year, section) teaching group. Its [`Schedule`] holds one ordered list
//! of [`PeriodSlot`]s per tracked weekday. Everything else in this module (availability,
//! faculty lookup, dashboard stats, editing) is a scan over a slice of sections.

mod error;

pub mod availability;
pub mod dashboard;
pub mod editor;
pub mod faculty;
pub mod occupancy;
pub mod suggest;

pub use error::ClassroomError;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of teaching periods in a day.
pub const PERIODS_PER_DAY: u8 = 8;

/// A weekday that carries a schedule. Sunday is never scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All tracked days, Monday first.
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// The five-day teaching week used by the lab listing and the weekly bar chart.
    pub const TEACHING_WEEK: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<chrono::Weekday> for Weekday {
    type Error = chrono::Weekday;

    fn try_from(day: chrono::Weekday) -> Result<Self, Self::Error> {
        match day {
            chrono::Weekday::Mon => Ok(Weekday::Monday),
            chrono::Weekday::Tue => Ok(Weekday::Tuesday),
            chrono::Weekday::Wed => Ok(Weekday::Wednesday),
            chrono::Weekday::Thu => Ok(Weekday::Thursday),
            chrono::Weekday::Fri => Ok(Weekday::Friday),
            chrono::Weekday::Sat => Ok(Weekday::Saturday),
            chrono::Weekday::Sun => Err(day),
        }
    }
}

impl FromStr for Weekday {
    type Err = ClassroomError;

    /// Accepts full or abbreviated day names in any case ("Monday", "mon", "MON").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClassroomError::InvalidParameter {
            name: "day",
            value: s.to_string(),
        };

        let day = s.trim().parse::<chrono::Weekday>().map_err(|_| invalid())?;
        Weekday::try_from(day).map_err(|_| invalid())
    }
}

/// Full English name of any calendar weekday, Sunday included.
pub fn calendar_day_name(day: chrono::Weekday) -> &'static str {
    match Weekday::try_from(day) {
        Ok(tracked) => tracked.name(),
        Err(_) => "Sunday",
    }
}

/// One cell of a section's timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSlot {
    pub period: u8,
    #[serde(default)]
    pub faculty_id: Option<String>,
    #[serde(default)]
    pub occupied: bool,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub projector: bool,
}

impl PeriodSlot {
    /// An unoccupied slot with every optional field cleared.
    pub fn empty(period: u8) -> Self {
        Self {
            period,
            faculty_id: None,
            occupied: false,
            room: None,
            subject: None,
            projector: false,
        }
    }

    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    /// True if this slot is occupied and taught by `faculty_id`.
    pub fn is_taught_by(&self, faculty_id: &str) -> bool {
        self.occupied && self.faculty_id.as_deref() == Some(faculty_id)
    }
}

/// Weekday-indexed slot lists. Serialized as an object keyed by weekday name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ScheduleDocument", into = "ScheduleDocument")]
pub struct Schedule {
    days: [Vec<PeriodSlot>; 6],
}

impl Schedule {
    pub fn day(&self, day: Weekday) -> &[PeriodSlot] {
        &self.days[day.index()]
    }

    pub fn day_mut(&mut self, day: Weekday) -> &mut Vec<PeriodSlot> {
        &mut self.days[day.index()]
    }

    /// First slot on `day` numbered `period`. Slot lists are in insertion order, so this is not
    /// necessarily the slot at position `period - 1`.
    pub fn slot(&self, day: Weekday, period: u8) -> Option<&PeriodSlot> {
        self.day(day).iter().find(|s| s.period == period)
    }
}

#[derive(Default, Serialize, Deserialize)]
struct ScheduleDocument {
    #[serde(rename = "Monday", default)]
    monday: Vec<PeriodSlot>,
    #[serde(rename = "Tuesday", default)]
    tuesday: Vec<PeriodSlot>,
    #[serde(rename = "Wednesday", default)]
    wednesday: Vec<PeriodSlot>,
    #[serde(rename = "Thursday", default)]
    thursday: Vec<PeriodSlot>,
    #[serde(rename = "Friday", default)]
    friday: Vec<PeriodSlot>,
    #[serde(rename = "Saturday", default)]
    saturday: Vec<PeriodSlot>,
}

impl From<ScheduleDocument> for Schedule {
    fn from(doc: ScheduleDocument) -> Self {
        Self {
            days: [
                doc.monday,
                doc.tuesday,
                doc.wednesday,
                doc.thursday,
                doc.friday,
                doc.saturday,
            ],
        }
    }
}

impl From<Schedule> for ScheduleDocument {
    fn from(schedule: Schedule) -> Self {
        let [monday, tuesday, wednesday, thursday, friday, saturday] = schedule.days;
        Self {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<String>,
}

/// A (year, section) teaching group with its roster and weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Home room of the section.
    #[serde(default)]
    pub room_number: String,
    pub year: String,
    pub section: String,
    #[serde(default)]
    pub faculty: Vec<Faculty>,
    #[serde(default)]
    pub schedule: Schedule,
}

impl Section {
    pub fn faculty_name(&self, faculty_id: &str) -> Option<&str> {
        self.faculty
            .iter()
            .find(|f| f.id == faculty_id)
            .map(|f| f.name.as_str())
    }
}

/// A validated (day, period) pair used by every slot query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotQuery {
    pub day: Weekday,
    pub period: u8,
}

impl SlotQuery {
    pub fn new(day: Weekday, period: u8) -> Self {
        Self { day, period }
    }

    /// Parses raw `day` and `period` request values.
    pub fn parse(day: &str, period: &str) -> Result<Self, ClassroomError> {
        Ok(Self {
            day: day.parse()?,
            period: parse_period(period)?,
        })
    }
}

/// Parses a 1-based period number, rejecting anything outside `1..=PERIODS_PER_DAY`.
pub fn parse_period(raw: &str) -> Result<u8, ClassroomError> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|p| (1..=PERIODS_PER_DAY).contains(p))
        .ok_or_else(|| ClassroomError::InvalidParameter {
            name: "period",
            value: raw.to_string(),
        })
}

/// "1st", "2nd", "3rd", otherwise "Nth".
pub fn ordinal(n: u8) -> String {
    match n {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        _ => format!("{n}th"),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn slot(period: u8, faculty: &str, room: &str, subject: &str) -> PeriodSlot {
        PeriodSlot {
            period,
            faculty_id: Some(faculty.to_string()),
            occupied: true,
            room: Some(room.to_string()),
            subject: Some(subject.to_string()),
            projector: false,
        }
    }

    pub fn section(year: &str, label: &str, faculty: &[(&str, &str)]) -> Section {
        Section {
            room_number: String::new(),
            year: year.to_string(),
            section: label.to_string(),
            faculty: faculty
                .iter()
                .map(|(id, name)| Faculty {
                    id: id.to_string(),
                    name: name.to_string(),
                    subjects: Vec::new(),
                })
                .collect(),
            schedule: Schedule::default(),
        }
    }

    pub fn rooms(names: &[&str]) -> Vec<String> {
        names.iter().map(|r| r.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_weekday_parsing() {
        assert_eq!("Monday".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("sat".parse::<Weekday>().unwrap(), Weekday::Saturday);
        assert_eq!("WEDNESDAY".parse::<Weekday>().unwrap(), Weekday::Wednesday);
        assert!("Sunday".parse::<Weekday>().is_err());
        assert!("Funday".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_period_bounds() {
        assert_eq!(parse_period("1").unwrap(), 1);
        assert_eq!(parse_period(" 8 ").unwrap(), 8);
        assert!(parse_period("0").is_err());
        assert!(parse_period("9").is_err());
        assert!(parse_period("two").is_err());
    }

    #[test]
    fn test_ordinal_suffixes() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(8), "8th");
    }

    #[test]
    fn test_schedule_document_shape() {
        let doc = json!({
            "Monday": [
                { "period": 2, "facultyId": "F1", "occupied": true, "room": "701", "subject": "OS" },
                { "period": 1 }
            ],
            "Friday": []
        });

        let schedule: Schedule = serde_json::from_value(doc).unwrap();
        assert_eq!(schedule.day(Weekday::Monday).len(), 2);
        assert!(schedule.day(Weekday::Saturday).is_empty());

        // Insertion order is kept; lookup is by period number, not position.
        let first = schedule.slot(Weekday::Monday, 1).unwrap();
        assert!(!first.occupied);
        assert_eq!(first.room, None);

        let value = serde_json::to_value(&schedule).unwrap();
        assert_eq!(value["Monday"][0]["facultyId"], "F1");
        assert!(value["Saturday"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_calendar_day_name() {
        assert_eq!(calendar_day_name(chrono::Weekday::Sun), "Sunday");
        assert_eq!(calendar_day_name(chrono::Weekday::Thu), "Thursday");
    }
}
