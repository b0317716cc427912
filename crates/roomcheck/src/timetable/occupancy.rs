//! The occupancy scan shared by every read path.
//!
//! Occupancy has no stored identity: it is recomputed from the section schedules on each query.

use super::{Section, Weekday};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static LAB_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)lab").unwrap());
static LETTER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z]").unwrap());

/// Rooms occupied at (`day`, `period`).
///
/// For each section only the first slot numbered `period` is considered; its room counts when
/// that slot is marked occupied.
pub fn occupied_rooms(sections: &[Section], day: Weekday, period: u8) -> HashSet<&str> {
    sections
        .iter()
        .filter_map(|s| s.schedule.slot(day, period))
        .filter(|slot| slot.occupied)
        .filter_map(|slot| slot.room())
        .collect()
}

/// Rooms occupied by the slot at list position `index` of each section's `day`.
///
/// Used by the dashboard, which addresses periods by position in the day list.
pub fn occupied_rooms_at(sections: &[Section], day: Weekday, index: usize) -> HashSet<&str> {
    sections
        .iter()
        .filter_map(|s| s.schedule.day(day).get(index))
        .filter(|slot| slot.occupied)
        .filter_map(|slot| slot.room())
        .collect()
}

/// Allocated rooms not in `occupied`, in allocated-list order.
pub fn free_rooms<'a>(allocated: &'a [String], occupied: &HashSet<&str>) -> Vec<&'a str> {
    allocated
        .iter()
        .map(String::as_str)
        .filter(|room| !occupied.contains(room))
        .collect()
}

/// True if the room identifier contains "lab" in any case.
pub fn is_lab(room: &str) -> bool {
    LAB_REGEX.is_match(room)
}

/// True if the room identifier contains at least one ASCII letter.
pub fn contains_letter(room: &str) -> bool {
    LETTER_REGEX.is_match(room)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::fixtures::{rooms, section, slot};
    use crate::timetable::PeriodSlot;

    fn campus() -> Vec<Section> {
        let mut a = section("3", "A", &[("F1", "Asha")]);
        a.schedule.day_mut(Weekday::Monday).extend([
            slot(1, "F1", "701", "DBMS"),
            slot(2, "F1", "Lab1", "DBMS Lab"),
        ]);

        let mut b = section("3", "B", &[("F2", "Ravi")]);
        b.schedule.day_mut(Weekday::Monday).extend([
            PeriodSlot::empty(1),
            slot(2, "F2", "702", "OS"),
        ]);
        vec![a, b]
    }

    #[test]
    fn test_occupied_rooms_by_period_number() {
        let sections = campus();
        let occupied = occupied_rooms(&sections, Weekday::Monday, 2);
        assert_eq!(occupied, HashSet::from(["Lab1", "702"]));
        assert!(occupied_rooms(&sections, Weekday::Tuesday, 2).is_empty());
    }

    #[test]
    fn test_free_rooms_partition_allocated() {
        let sections = campus();
        let allocated = rooms(&["701", "702", "703", "Lab1"]);
        let occupied = occupied_rooms(&sections, Weekday::Monday, 1);
        let free = free_rooms(&allocated, &occupied);

        assert_eq!(free, vec!["702", "703", "Lab1"]);
        for room in &allocated {
            assert_ne!(free.contains(&room.as_str()), occupied.contains(room.as_str()));
        }
    }

    #[test]
    fn test_room_classification_patterns() {
        assert!(is_lab("Lab1"));
        assert!(is_lab("CSE-LAB-2"));
        assert!(!is_lab("701"));
        assert!(contains_letter("B12"));
        assert!(!contains_letter("701"));
    }
}
