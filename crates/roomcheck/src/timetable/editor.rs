//! Point edits to a single section's timetable

use super::{ClassroomError, PeriodSlot, Schedule, Section, Weekday, PERIODS_PER_DAY};
use crate::db::ClassroomDbManager;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

/// Fields of a slot that an edit may set. Absent fields are left untouched by an update and take
/// their empty default on an add. The period number itself is never patched.
///
/// The text fields distinguish absent (`None`) from an explicit JSON `null` (`Some(None)`), which
/// clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodPatch {
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub faculty_id: Option<Option<String>>,
    #[serde(default)]
    pub occupied: Option<bool>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub room: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub subject: Option<Option<String>>,
    #[serde(default)]
    pub projector: Option<bool>,
}

/// Only called for keys that are present, so `null` becomes `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl PeriodPatch {
    fn into_slot(self, period: u8) -> PeriodSlot {
        PeriodSlot {
            period,
            faculty_id: self.faculty_id.flatten(),
            occupied: self.occupied.unwrap_or(false),
            room: self.room.flatten(),
            subject: self.subject.flatten(),
            projector: self.projector.unwrap_or(false),
        }
    }

    fn apply_to(self, slot: &mut PeriodSlot) {
        if let Some(faculty_id) = self.faculty_id {
            slot.faculty_id = faculty_id;
        }
        if let Some(occupied) = self.occupied {
            slot.occupied = occupied;
        }
        if let Some(room) = self.room {
            slot.room = room;
        }
        if let Some(subject) = self.subject {
            slot.subject = subject;
        }
        if let Some(projector) = self.projector {
            slot.projector = projector;
        }
    }
}

fn check_period(period: u8) -> Result<(), ClassroomError> {
    if (1..=PERIODS_PER_DAY).contains(&period) {
        Ok(())
    } else {
        Err(ClassroomError::InvalidParameter {
            name: "period",
            value: period.to_string(),
        })
    }
}

impl Section {
    /// Appends a new slot. Fails with `DuplicatePeriod` if `period` already exists on `day`.
    pub fn add_period(
        &mut self,
        day: Weekday,
        period: u8,
        entry: PeriodPatch,
    ) -> Result<&PeriodSlot, ClassroomError> {
        check_period(period)?;
        let slots = self.schedule.day_mut(day);
        if slots.iter().any(|s| s.period == period) {
            return Err(ClassroomError::DuplicatePeriod {
                day: day.to_string(),
                period,
            });
        }

        slots.push(entry.into_slot(period));
        Ok(&slots[slots.len() - 1])
    }

    /// Merges `patch` into the existing slot in place.
    pub fn update_period(
        &mut self,
        day: Weekday,
        period: u8,
        patch: PeriodPatch,
    ) -> Result<&PeriodSlot, ClassroomError> {
        let slot = self.slot_mut(day, period)?;
        patch.apply_to(slot);
        Ok(slot)
    }

    /// Resets the slot to an empty, unoccupied one. The slot stays in the list.
    pub fn clear_period(&mut self, day: Weekday, period: u8) -> Result<(), ClassroomError> {
        let slot = self.slot_mut(day, period)?;
        *slot = PeriodSlot::empty(period);
        Ok(())
    }

    fn slot_mut(&mut self, day: Weekday, period: u8) -> Result<&mut PeriodSlot, ClassroomError> {
        self.schedule
            .day_mut(day)
            .iter_mut()
            .find(|s| s.period == period)
            .ok_or_else(|| ClassroomError::PeriodNotFound {
                day: day.to_string(),
                period,
            })
    }
}

/// Applies edits to stored sections. Each edit loads the section, mutates one day and writes
/// that day back; concurrent edits to the same day are last-write-wins.
pub struct ScheduleEditor<'a> {
    store: &'a ClassroomDbManager,
}

impl<'a> ScheduleEditor<'a> {
    pub fn new(store: &'a ClassroomDbManager) -> Self {
        Self { store }
    }

    /// Full schedule of a section.
    pub fn timetable(&self, year: &str, section: &str) -> Result<Schedule, ClassroomError> {
        Ok(self.load(year, section)?.schedule)
    }

    pub fn add_period(
        &self,
        year: &str,
        section: &str,
        day: Weekday,
        period: u8,
        entry: PeriodPatch,
    ) -> Result<PeriodSlot, ClassroomError> {
        let mut stored = self.load(year, section)?;
        let added = stored.add_period(day, period, entry)?.clone();
        self.store.save_day(&stored, day)?;

        info!("Added {} period {} for year {} section {}", day, period, year, section);
        Ok(added)
    }

    pub fn update_period(
        &self,
        year: &str,
        section: &str,
        day: Weekday,
        period: u8,
        patch: PeriodPatch,
    ) -> Result<PeriodSlot, ClassroomError> {
        let mut stored = self.load(year, section)?;
        let updated = stored.update_period(day, period, patch)?.clone();
        self.store.save_day(&stored, day)?;

        info!("Updated {} period {} for year {} section {}", day, period, year, section);
        Ok(updated)
    }

    pub fn clear_period(
        &self,
        year: &str,
        section: &str,
        day: Weekday,
        period: u8,
    ) -> Result<(), ClassroomError> {
        let mut stored = self.load(year, section)?;
        stored.clear_period(day, period)?;
        self.store.save_day(&stored, day)?;

        info!("Cleared {} period {} for year {} section {}", day, period, year, section);
        Ok(())
    }

    fn load(&self, year: &str, section: &str) -> Result<Section, ClassroomError> {
        self.store
            .get_section(year, section)?
            .ok_or_else(|| ClassroomError::SectionNotFound {
                year: year.to_string(),
                section: section.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::fixtures::{section, slot};

    fn monday_section() -> Section {
        let mut s = section("2", "A", &[("F1", "Asha")]);
        s.schedule.day_mut(Weekday::Monday).extend([
            slot(1, "F1", "701", "DBMS"),
            slot(3, "F1", "702", "OS"),
        ]);
        s
    }

    #[test]
    fn test_add_rejects_duplicate_period() {
        let mut s = monday_section();
        let err = s
            .add_period(Weekday::Monday, 3, PeriodPatch::default())
            .unwrap_err();
        assert!(matches!(err, ClassroomError::DuplicatePeriod { period: 3, .. }));
        assert_eq!(s.schedule.slot(Weekday::Monday, 3).unwrap().subject.as_deref(), Some("OS"));
    }

    #[test]
    fn test_add_appends_in_insertion_order() {
        let mut s = monday_section();
        let entry = PeriodPatch {
            faculty_id: Some(Some("F1".to_string())),
            occupied: Some(true),
            room: Some(Some("Lab1".to_string())),
            subject: Some(Some("DBMS Lab".to_string())),
            projector: None,
        };
        let added = s.add_period(Weekday::Monday, 2, entry).unwrap().clone();
        assert!(added.occupied);
        assert!(!added.projector);

        let periods: Vec<u8> = s.schedule.day(Weekday::Monday).iter().map(|p| p.period).collect();
        assert_eq!(periods, vec![1, 3, 2]);
    }

    #[test]
    fn test_add_rejects_out_of_range_period() {
        let mut s = monday_section();
        assert!(s.add_period(Weekday::Monday, 9, PeriodPatch::default()).is_err());
    }

    #[test]
    fn test_update_merges_only_given_fields() {
        let mut s = monday_section();
        let patch = PeriodPatch {
            subject: Some(Some("Compilers".to_string())),
            ..Default::default()
        };
        let updated = s.update_period(Weekday::Monday, 1, patch).unwrap().clone();
        assert_eq!(updated.subject.as_deref(), Some("Compilers"));
        assert_eq!(updated.room.as_deref(), Some("701"));
        assert_eq!(updated.faculty_id.as_deref(), Some("F1"));
        assert!(updated.occupied);

        let missing = s.update_period(Weekday::Tuesday, 1, PeriodPatch::default());
        assert!(matches!(missing, Err(ClassroomError::PeriodNotFound { .. })));
    }

    #[test]
    fn test_update_null_clears_field() {
        let mut s = monday_section();
        let patch: PeriodPatch =
            serde_json::from_str(r#"{"room": null, "subject": null}"#).unwrap();
        assert_eq!(patch.room, Some(None));
        assert_eq!(patch.faculty_id, None);

        let updated = s.update_period(Weekday::Monday, 1, patch).unwrap().clone();
        assert_eq!(updated.room, None);
        assert_eq!(updated.subject, None);
        assert_eq!(updated.faculty_id.as_deref(), Some("F1"));
        assert!(updated.occupied);
    }

    #[test]
    fn test_clear_keeps_slot() {
        let mut s = monday_section();
        s.clear_period(Weekday::Monday, 3).unwrap();

        let slots = s.schedule.day(Weekday::Monday);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1], PeriodSlot::empty(3));
    }

    #[test]
    fn test_editor_round_trip_through_store() {
        let store = ClassroomDbManager::open_in_memory().unwrap();
        store.insert_section(&monday_section()).unwrap();
        let editor = ScheduleEditor::new(&store);

        let patch = PeriodPatch {
            room: Some(Some("705".to_string())),
            ..Default::default()
        };
        editor.update_period("2", "A", Weekday::Monday, 3, patch).unwrap();

        let schedule = editor.timetable("2", "A").unwrap();
        let slot = schedule.slot(Weekday::Monday, 3).unwrap();
        assert_eq!(slot.room.as_deref(), Some("705"));
        assert_eq!(slot.subject.as_deref(), Some("OS"));
        assert_eq!(schedule.slot(Weekday::Monday, 1), monday_section().schedule.slot(Weekday::Monday, 1));
    }

    #[test]
    fn test_editor_unknown_section() {
        let store = ClassroomDbManager::open_in_memory().unwrap();
        let editor = ScheduleEditor::new(&store);

        let err = editor.clear_period("9", "Z", Weekday::Monday, 1).unwrap_err();
        assert!(matches!(err, ClassroomError::SectionNotFound { .. }));
    }
}
