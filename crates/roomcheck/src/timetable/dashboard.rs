//! Campus-wide occupancy summaries for the dashboard.
//!
//! The dashboard addresses periods by 0-based position in each section's day list and, when no
//! period is given, derives it from the wall clock against [`PERIOD_WINDOWS`].

use super::occupancy::{is_lab, occupied_rooms_at};
use super::{calendar_day_name, ClassroomError, Section, Weekday, PERIODS_PER_DAY};
use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use tracing::debug;

/// Start/end of each period in minutes after midnight. End is exclusive.
pub const PERIOD_WINDOWS: [(u32, u32); PERIODS_PER_DAY as usize] = [
    (8 * 60, 8 * 60 + 50),
    (8 * 60 + 50, 9 * 60 + 40),
    (9 * 60 + 50, 10 * 60 + 40),
    (10 * 60 + 40, 11 * 60 + 30),
    (12 * 60 + 20, 13 * 60 + 10),
    (13 * 60 + 10, 14 * 60),
    (14 * 60, 14 * 60 + 50),
    (14 * 60 + 50, 15 * 60 + 40),
];

/// Resolved period used when the clock falls outside every window.
pub const OUTSIDE_CLASS_HOURS: i32 = -1;

/// 0-based index of the period window containing `time`, if any.
pub fn current_period_index(time: NaiveTime) -> Option<usize> {
    let minutes = time.hour() * 60 + time.minute();
    PERIOD_WINDOWS
        .iter()
        .position(|&(start, end)| minutes >= start && minutes < end)
}

/// Category a room is counted under.
///
/// Precedence is fixed: a room whose name contains "lab" is a [`Lab`](RoomCategory::Lab) even if
/// it is also registered as having a projector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomCategory {
    Lab,
    Projector,
    Classroom,
}

impl RoomCategory {
    pub fn classify(room: &str, projector_rooms: &HashSet<String>) -> Self {
        if is_lab(room) {
            RoomCategory::Lab
        } else if projector_rooms.contains(room) {
            RoomCategory::Projector
        } else {
            RoomCategory::Classroom
        }
    }
}

/// Optional overrides for the day and the 0-based period.
#[derive(Debug, Clone, Default)]
pub struct StatsRequest {
    pub day: Option<String>,
    pub period: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PieChart {
    pub free: usize,
    pub occupied: usize,
}

/// Free room-slots per weekday, Monday to Friday, summed over all periods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeeklyFreeSlots(pub [usize; 5]);

impl WeeklyFreeSlots {
    pub fn get(&self, day: Weekday) -> Option<usize> {
        Weekday::TEACHING_WEEK
            .iter()
            .position(|&d| d == day)
            .map(|i| self.0[i])
    }
}

impl Serialize for WeeklyFreeSlots {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (day, count) in Weekday::TEACHING_WEEK.iter().zip(self.0) {
            map.serialize_entry(day.name(), &count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    pub total_rooms: usize,
    pub labs: usize,
    pub projector_rooms: usize,
    pub classrooms: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub labs: PieChart,
    pub projector_rooms: PieChart,
    pub classrooms: PieChart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub day: String,
    pub current_period: i32,
    pub period_label: String,
    pub time: String,
    pub pie_chart: PieChart,
    pub bar_chart: WeeklyFreeSlots,
    pub resources: Resources,
    pub categories: CategoryBreakdown,
    pub free_projector_room_names: Vec<String>,
}

/// Aggregates occupancy over a snapshot of sections and campus room lists.
pub struct DashboardAggregator<'a> {
    sections: &'a [Section],
    allocated_rooms: &'a [String],
    projector_rooms: &'a HashSet<String>,
}

impl<'a> DashboardAggregator<'a> {
    pub fn new(
        sections: &'a [Section],
        allocated_rooms: &'a [String],
        projector_rooms: &'a HashSet<String>,
    ) -> Self {
        Self {
            sections,
            allocated_rooms,
            projector_rooms,
        }
    }

    /// Computes stats for the requested (or current) day and period.
    ///
    /// # Arguments
    /// * `request` - explicit day/period; missing values resolve from `now`
    /// * `now` - local wall-clock time
    ///
    /// # Returns
    /// * `Err(InvalidParameter)` - if the day is not a weekday name
    pub fn compute(
        &self,
        request: &StatsRequest,
        now: NaiveDateTime,
    ) -> Result<DashboardStats, ClassroomError> {
        let calendar_day = match request.day.as_deref() {
            Some(raw) => raw
                .trim()
                .parse::<chrono::Weekday>()
                .map_err(|_| ClassroomError::InvalidParameter {
                    name: "day",
                    value: raw.to_string(),
                })?,
            None => now.weekday(),
        };
        let day = Weekday::try_from(calendar_day).ok();

        let current_period = match request.period {
            Some(p) => p,
            None => current_period_index(now.time())
                .map(|i| i as i32)
                .unwrap_or(OUTSIDE_CLASS_HOURS),
        };
        let index = usize::try_from(current_period)
            .ok()
            .filter(|&i| i < PERIODS_PER_DAY as usize);

        let period_label = match index {
            Some(i) => format!("Period {}", i + 1),
            None => "Outside Class Hours".to_string(),
        };

        let occupied = match (day, index) {
            (Some(day), Some(i)) => occupied_rooms_at(self.sections, day, i),
            _ => HashSet::new(),
        };
        debug!(?occupied, "dashboard occupancy for {} {}", calendar_day_name(calendar_day), period_label);

        let mut pie_chart = PieChart::default();
        let mut categories = CategoryBreakdown::default();
        let mut free_projector_room_names = Vec::new();

        for room in self.allocated_rooms {
            let is_occupied = occupied.contains(room.as_str());
            let category = RoomCategory::classify(room, self.projector_rooms);
            let bucket = match category {
                RoomCategory::Lab => &mut categories.labs,
                RoomCategory::Projector => &mut categories.projector_rooms,
                RoomCategory::Classroom => &mut categories.classrooms,
            };

            if is_occupied {
                pie_chart.occupied += 1;
                bucket.occupied += 1;
            } else {
                pie_chart.free += 1;
                bucket.free += 1;
                if category == RoomCategory::Projector {
                    free_projector_room_names.push(room.clone());
                }
            }
        }

        let total = |c: PieChart| c.free + c.occupied;
        let resources = Resources {
            total_rooms: self.allocated_rooms.len(),
            labs: total(categories.labs),
            projector_rooms: total(categories.projector_rooms),
            classrooms: total(categories.classrooms),
        };

        Ok(DashboardStats {
            day: calendar_day_name(calendar_day).to_string(),
            current_period,
            period_label,
            time: now.format("%-I:%M:%S %p").to_string(),
            pie_chart,
            bar_chart: self.weekly_free_slots(),
            resources,
            categories,
            free_projector_room_names,
        })
    }

    /// For each day Monday to Friday, the number of (allocated room, period) pairs left free.
    pub fn weekly_free_slots(&self) -> WeeklyFreeSlots {
        let mut counts = [0; 5];

        for (count, day) in counts.iter_mut().zip(Weekday::TEACHING_WEEK) {
            *count = (0..PERIODS_PER_DAY as usize)
                .map(|i| {
                    let occupied = occupied_rooms_at(self.sections, day, i);
                    self.allocated_rooms
                        .iter()
                        .filter(|r| !occupied.contains(r.as_str()))
                        .count()
                })
                .sum();
        }

        WeeklyFreeSlots(counts)
    }
}
