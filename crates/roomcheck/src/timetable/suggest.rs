//! Strategies for suggesting a substitute when the requested room is taken.
//!
//! Room and lab queries deliberately use different policies; see [`RandomFreeRoomPick`] and
//! [`FirstLetterContainingFreeRoom`].

use super::occupancy::contains_letter;
use rand::seq::SliceRandom;

/// Picks a suggested alternative from the free rooms of a slot.
pub trait AlternativeStrategy {
    fn pick<'a>(&self, free_rooms: &[&'a str]) -> Option<&'a str>;
}

/// Uniformly random choice among all free rooms. Used by the room query.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFreeRoomPick;

impl AlternativeStrategy for RandomFreeRoomPick {
    fn pick<'a>(&self, free_rooms: &[&'a str]) -> Option<&'a str> {
        free_rooms.choose(&mut rand::thread_rng()).copied()
    }
}

/// First free room, in allocated-list order, whose identifier contains any letter.
/// Used by the lab query. Deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLetterContainingFreeRoom;

impl AlternativeStrategy for FirstLetterContainingFreeRoom {
    fn pick<'a>(&self, free_rooms: &[&'a str]) -> Option<&'a str> {
        free_rooms.iter().copied().find(|room| contains_letter(room))
    }
}
