//! Faculty whereabouts and next free hour

use super::{ordinal, PeriodSlot, Section, SlotQuery, Weekday, PERIODS_PER_DAY};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FacultyStatus {
    Free,
    Occupied,
}

/// Where the faculty member is teaching, plus the next free hour label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeachingDetails {
    #[serde(rename = "room_number")]
    pub room_number: Option<String>,
    pub faculty: String,
    pub subject: String,
    pub year: String,
    pub section: String,
    pub day: Weekday,
    pub period: u8,
    pub next_free_hour: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StaffDetails {
    Teaching(TeachingDetails),
    #[serde(rename_all = "camelCase")]
    Between { next_free_hour: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffAvailability {
    pub status: FacultyStatus,
    pub message: String,
    /// Only set when the faculty member teaches nothing that day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_free_hour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_details: Option<StaffDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacultyEntry {
    pub id: String,
    pub name: String,
}

/// Locates faculty members across every section's schedule.
pub struct FacultyLocator<'a> {
    sections: &'a [Section],
}

impl<'a> FacultyLocator<'a> {
    pub fn new(sections: &'a [Section]) -> Self {
        Self { sections }
    }

    /// Period numbers on `day` in which `faculty_id` teaches, across all sections.
    pub fn occupied_periods(&self, faculty_id: &str, day: Weekday) -> BTreeSet<u8> {
        self.sections
            .iter()
            .flat_map(|s| s.schedule.day(day))
            .filter(|slot| slot.is_taught_by(faculty_id))
            .map(|slot| slot.period)
            .collect()
    }

    /// Checks whether `faculty_id` is teaching at `query`.
    pub fn check(&self, faculty_id: &str, query: SlotQuery) -> StaffAvailability {
        let occupied = self.occupied_periods(faculty_id, query.day);

        if occupied.is_empty() {
            return StaffAvailability {
                status: FacultyStatus::Free,
                message: format!("Faculty {faculty_id} is free all day!"),
                next_free_hour: Some("Available all periods".to_string()),
                room_details: None,
            };
        }

        let next_free_hour = next_free_period(&occupied, query.period)
            .map(|p| format!("{} Period", ordinal(p)))
            .unwrap_or_else(|| "No next free hour".to_string());

        match self.find_teaching_slot(faculty_id, query) {
            Some((section, slot)) => {
                let faculty = section
                    .faculty_name(faculty_id)
                    .unwrap_or("N/A")
                    .to_string();

                StaffAvailability {
                    status: FacultyStatus::Occupied,
                    message: format!(
                        "Faculty {faculty} is teaching during Period {}.",
                        query.period
                    ),
                    next_free_hour: None,
                    room_details: Some(StaffDetails::Teaching(TeachingDetails {
                        room_number: slot.room.clone(),
                        faculty,
                        subject: slot.subject.clone().unwrap_or_else(|| "N/A".to_string()),
                        year: section.year.clone(),
                        section: section.section.clone(),
                        day: query.day,
                        period: query.period,
                        next_free_hour,
                    })),
                }
            }
            None => StaffAvailability {
                status: FacultyStatus::Free,
                message: format!("Faculty {faculty_id} is free now!"),
                next_free_hour: None,
                room_details: Some(StaffDetails::Between { next_free_hour }),
            },
        }
    }

    /// Distinct faculty in first-seen order; the first name seen for an id wins.
    pub fn roster(&self) -> Vec<FacultyEntry> {
        let mut seen = HashSet::new();
        self.sections
            .iter()
            .flat_map(|s| &s.faculty)
            .filter(|f| seen.insert(f.id.as_str()))
            .map(|f| FacultyEntry {
                id: f.id.clone(),
                name: f.name.clone(),
            })
            .collect()
    }

    fn find_teaching_slot(
        &self,
        faculty_id: &str,
        query: SlotQuery,
    ) -> Option<(&'a Section, &'a PeriodSlot)> {
        self.sections.iter().find_map(|section| {
            section
                .schedule
                .day(query.day)
                .iter()
                .find(|slot| slot.period == query.period && slot.is_taught_by(faculty_id))
                .map(|slot| (section, slot))
        })
    }
}

/// First period after `after`, up to the last period of the day, not in `occupied`.
pub fn next_free_period(occupied: &BTreeSet<u8>, after: u8) -> Option<u8> {
    (after.saturating_add(1)..=PERIODS_PER_DAY).find(|p| !occupied.contains(p))
}
