//! Room, lab and projector availability for a single (day, period)

use super::occupancy::{free_rooms, is_lab, occupied_rooms};
use super::suggest::{AlternativeStrategy, FirstLetterContainingFreeRoom};
use super::{ordinal, ClassroomError, PeriodSlot, Section, SlotQuery, Weekday};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Free,
    Occupied,
    Invalid,
}

/// Who holds an occupied room, as found in the first matching section.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Occupant {
    faculty: String,
    subject: String,
    year: String,
    section: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomDetails {
    pub room: String,
    pub faculty: String,
    pub subject: String,
    pub year: String,
    pub section: String,
    /// Ordinal label, e.g. "2nd"
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAvailability {
    pub status: AvailabilityStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_details: Option<RoomDetails>,
    /// Suggested free room id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_message: Option<String>,
}

impl RoomAvailability {
    /// Response body for a room outside the allocated list.
    pub fn invalid(message: String) -> Self {
        Self {
            status: AvailabilityStatus::Invalid,
            message,
            room_details: None,
            alternative_room: None,
            alternative_message: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabDetails {
    pub room: String,
    pub faculty: String,
    pub subject: String,
    pub section: String,
    pub year: String,
    pub period: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabAvailability {
    pub status: AvailabilityStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_details: Option<LabDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_lab: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectorRooms {
    pub message: String,
    pub rooms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<Weekday>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projector: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabEntry {
    pub room: String,
}

/// Answers availability questions over a snapshot of section schedules and the allocated room
/// list.
pub struct AvailabilityEvaluator<'a> {
    sections: &'a [Section],
    allocated_rooms: &'a [String],
}

impl<'a> AvailabilityEvaluator<'a> {
    pub fn new(sections: &'a [Section], allocated_rooms: &'a [String]) -> Self {
        Self {
            sections,
            allocated_rooms,
        }
    }

    /// Fails with `InvalidRoom` unless `room` is in the allocated room list.
    pub fn ensure_allocated(&self, room: &str) -> Result<(), ClassroomError> {
        if self.allocated_rooms.iter().any(|r| r == room) {
            Ok(())
        } else {
            Err(ClassroomError::InvalidRoom {
                room: room.to_string(),
            })
        }
    }

    /// Checks whether `room` is free at `query`.
    ///
    /// # Returns
    /// * `Ok(RoomAvailability)` - free, or occupied with occupant details and a suggestion
    /// * `Err(InvalidRoom)` - if `room` is not in the allocated room list
    pub fn check_room(
        &self,
        room: &str,
        query: SlotQuery,
        strategy: &dyn AlternativeStrategy,
    ) -> Result<RoomAvailability, ClassroomError> {
        self.ensure_allocated(room)?;

        let occupied = occupied_rooms(self.sections, query.day, query.period);
        let free = free_rooms(self.allocated_rooms, &occupied);
        debug!(?occupied, ?free, "room scan for {} period {}", query.day, query.period);

        if !occupied.contains(room) {
            return Ok(RoomAvailability {
                status: AvailabilityStatus::Free,
                message: "The classroom is free during the selected period.".to_string(),
                room_details: None,
                alternative_room: None,
                alternative_message: None,
            });
        }

        let occupant = self.find_occupant(room, query);
        let alternative = strategy.pick(&free);
        let alternative_message = match alternative {
            Some(alt) => format!(
                "Room {alt} is available for Period {} on {}.",
                query.period, query.day
            ),
            None => "No alternative classroom found.".to_string(),
        };

        Ok(RoomAvailability {
            status: AvailabilityStatus::Occupied,
            message: "The classroom is occupied.".to_string(),
            room_details: Some(RoomDetails {
                room: room.to_string(),
                faculty: occupant.faculty,
                subject: occupant.subject,
                year: occupant.year,
                section: occupant.section,
                period: ordinal(query.period),
            }),
            alternative_room: alternative.map(str::to_string),
            alternative_message: Some(alternative_message),
        })
    }

    /// Checks whether the lab `room` is free at `query`.
    ///
    /// Unlike [`check_room`](Self::check_room) the room is not validated against the allocated
    /// list, and the suggestion is always [`FirstLetterContainingFreeRoom`].
    pub fn check_lab(&self, room: &str, query: SlotQuery) -> LabAvailability {
        let occupied = occupied_rooms(self.sections, query.day, query.period);
        let free = free_rooms(self.allocated_rooms, &occupied);
        debug!(?occupied, ?free, "lab scan for {} period {}", query.day, query.period);

        if !occupied.contains(room) {
            return LabAvailability {
                status: AvailabilityStatus::Free,
                message: "The lab is free during the selected period.".to_string(),
                room_details: None,
                alternative_lab: None,
            };
        }

        let occupant = self.find_occupant(room, query);
        LabAvailability {
            status: AvailabilityStatus::Occupied,
            message: "The lab is occupied.".to_string(),
            room_details: Some(LabDetails {
                room: room.to_string(),
                faculty: occupant.faculty,
                subject: occupant.subject,
                section: occupant.section,
                year: occupant.year,
                period: query.period,
            }),
            alternative_lab: FirstLetterContainingFreeRoom.pick(&free).map(str::to_string),
        }
    }

    /// Free rooms at `query` that are also in `projector_rooms`, in allocated-list order.
    pub fn projector_rooms(
        &self,
        query: SlotQuery,
        projector_rooms: &HashSet<String>,
    ) -> ProjectorRooms {
        let occupied = occupied_rooms(self.sections, query.day, query.period);
        let rooms: Vec<String> = free_rooms(self.allocated_rooms, &occupied)
            .into_iter()
            .filter(|room| projector_rooms.contains(*room))
            .map(str::to_string)
            .collect();

        if rooms.is_empty() {
            return ProjectorRooms {
                message: "No available room with a projector for the selected period."
                    .to_string(),
                rooms,
                day: None,
                period: None,
                projector: None,
            };
        }

        ProjectorRooms {
            message: format!(
                "Rooms {} are available with a projector for Period {} on {}.",
                rooms.join(", "),
                query.period,
                query.day
            ),
            rooms,
            day: Some(query.day),
            period: Some(query.period),
            projector: Some(true),
        }
    }

    /// First section holding `room` occupied at `query`, with "N/A" for anything missing.
    fn find_occupant(&self, room: &str, query: SlotQuery) -> Occupant {
        let found = self.sections.iter().find_map(|section| {
            section
                .schedule
                .day(query.day)
                .iter()
                .find(|slot| slot.period == query.period && slot.occupied && slot.room() == Some(room))
                .map(|slot| (section, slot))
        });

        match found {
            Some((section, slot)) => occupant_from(section, slot),
            None => Occupant {
                faculty: NOT_AVAILABLE.to_string(),
                subject: NOT_AVAILABLE.to_string(),
                year: NOT_AVAILABLE.to_string(),
                section: NOT_AVAILABLE.to_string(),
            },
        }
    }
}

fn occupant_from(section: &Section, slot: &PeriodSlot) -> Occupant {
    let faculty = slot
        .faculty_id
        .as_deref()
        .and_then(|id| section.faculty_name(id))
        .unwrap_or(NOT_AVAILABLE);

    Occupant {
        faculty: faculty.to_string(),
        subject: non_empty_or_na(slot.subject.as_deref()),
        year: non_empty_or_na(Some(&section.year)),
        section: non_empty_or_na(Some(&section.section)),
    }
}

fn non_empty_or_na(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// Distinct lab rooms used anywhere Monday to Friday, in first-seen order.
pub fn list_labs(sections: &[Section]) -> Vec<LabEntry> {
    let mut seen = HashSet::new();
    let mut labs = Vec::new();

    for section in sections {
        for day in Weekday::TEACHING_WEEK {
            for room in section.schedule.day(day).iter().filter_map(PeriodSlot::room) {
                if is_lab(room) && seen.insert(room) {
                    labs.push(LabEntry {
                        room: room.to_string(),
                    });
                }
            }
        }
    }

    labs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::fixtures::{rooms, section, slot};
    use crate::timetable::suggest::RandomFreeRoomPick;

    fn campus() -> Vec<Section> {
        let mut a = section("2", "A", &[("F1", "Asha"), ("F3", "Meera")]);
        a.schedule.day_mut(Weekday::Monday).extend([
            slot(1, "F1", "701", "DBMS"),
            slot(2, "F3", "Lab1", "Networks Lab"),
        ]);
        a.schedule
            .day_mut(Weekday::Saturday)
            .push(slot(1, "F1", "Lab9", "Extra Lab"));

        let mut b = section("3", "B", &[("F2", "Ravi")]);
        b.schedule.day_mut(Weekday::Monday).extend([
            slot(1, "F9", "702", "OS"),
            slot(2, "F2", "lab2", "OS Lab"),
        ]);
        b.schedule
            .day_mut(Weekday::Tuesday)
            .push(slot(3, "F2", "Lab1", "OS Lab"));
        vec![a, b]
    }

    #[test]
    fn test_room_outside_allocated_list_is_invalid() {
        let sections = campus();
        let allocated = rooms(&["701", "702"]);
        let evaluator = AvailabilityEvaluator::new(&sections, &allocated);

        let err = evaluator
            .check_room("999", SlotQuery::new(Weekday::Monday, 1), &RandomFreeRoomPick)
            .unwrap_err();
        assert!(matches!(err, ClassroomError::InvalidRoom { room } if room == "999"));

        assert!(evaluator.ensure_allocated("702").is_ok());
        assert!(matches!(
            evaluator.ensure_allocated("70"),
            Err(ClassroomError::InvalidRoom { .. })
        ));
    }

    #[test]
    fn test_free_room() {
        let sections = campus();
        let allocated = rooms(&["701", "702", "703"]);
        let evaluator = AvailabilityEvaluator::new(&sections, &allocated);

        let result = evaluator
            .check_room("703", SlotQuery::new(Weekday::Monday, 1), &RandomFreeRoomPick)
            .unwrap();
        assert_eq!(result.status, AvailabilityStatus::Free);
        assert!(result.room_details.is_none());
        assert!(result.alternative_room.is_none());
    }

    #[test]
    fn test_occupied_room_details_and_alternative() {
        let sections = campus();
        let allocated = rooms(&["701", "702", "703", "704"]);
        let evaluator = AvailabilityEvaluator::new(&sections, &allocated);

        let result = evaluator
            .check_room("701", SlotQuery::new(Weekday::Monday, 1), &RandomFreeRoomPick)
            .unwrap();
        assert_eq!(result.status, AvailabilityStatus::Occupied);

        let details = result.room_details.unwrap();
        assert_eq!(details.faculty, "Asha");
        assert_eq!(details.subject, "DBMS");
        assert_eq!(details.year, "2");
        assert_eq!(details.section, "A");
        assert_eq!(details.period, "1st");

        let alt = result.alternative_room.unwrap();
        assert!(alt == "703" || alt == "704");
    }

    #[test]
    fn test_unknown_faculty_falls_back_to_na() {
        let sections = campus();
        let allocated = rooms(&["701", "702"]);
        let evaluator = AvailabilityEvaluator::new(&sections, &allocated);

        let result = evaluator
            .check_room("702", SlotQuery::new(Weekday::Monday, 1), &RandomFreeRoomPick)
            .unwrap();
        assert_eq!(result.room_details.unwrap().faculty, "N/A");
        assert_eq!(result.alternative_room, None);
        assert_eq!(
            result.alternative_message.as_deref(),
            Some("No alternative classroom found.")
        );
    }

    #[test]
    fn test_lab_alternative_is_first_lettered_free_room() {
        let sections = campus();
        let allocated = rooms(&["701", "Lab1", "703", "R5", "Lab3"]);
        let evaluator = AvailabilityEvaluator::new(&sections, &allocated);

        let result = evaluator.check_lab("Lab1", SlotQuery::new(Weekday::Monday, 2));
        assert_eq!(result.status, AvailabilityStatus::Occupied);
        // "R5" is not a lab by name but still qualifies: any letter counts.
        assert_eq!(result.alternative_lab.as_deref(), Some("R5"));
        assert_eq!(result.room_details.unwrap().faculty, "Meera");
    }

    #[test]
    fn test_free_lab() {
        let sections = campus();
        let allocated = rooms(&["Lab1", "Lab3"]);
        let evaluator = AvailabilityEvaluator::new(&sections, &allocated);

        let result = evaluator.check_lab("Lab3", SlotQuery::new(Weekday::Monday, 2));
        assert_eq!(result.status, AvailabilityStatus::Free);
        assert_eq!(result.alternative_lab, None);
    }

    #[test]
    fn test_projector_rooms_are_free_and_equipped() {
        let sections = campus();
        let allocated = rooms(&["701", "702", "703", "704"]);
        let evaluator = AvailabilityEvaluator::new(&sections, &allocated);
        let projectors = HashSet::from(["701".to_string(), "704".to_string(), "900".to_string()]);

        let result = evaluator.projector_rooms(SlotQuery::new(Weekday::Monday, 1), &projectors);
        assert_eq!(result.rooms, vec!["704"]);
        assert_eq!(result.projector, Some(true));

        let none = evaluator.projector_rooms(
            SlotQuery::new(Weekday::Monday, 1),
            &HashSet::from(["701".to_string()]),
        );
        assert!(none.rooms.is_empty());
        assert_eq!(none.day, None);
    }

    #[test]
    fn test_list_labs_skips_saturday_and_dedups() {
        let labs: Vec<String> = list_labs(&campus()).into_iter().map(|l| l.room).collect();
        assert_eq!(labs, vec!["Lab1", "lab2"]);
    }
}
