//! Opening-hours checks

use crate::models::{OpenClose, Place};

const CLOSED_NOTE: &str = "Closed";

impl OpenClose {
    /// Whether `timestamp` (unix seconds) falls inside this interval.
    ///
    /// Both ends are inclusive. Intervals noted "Closed" never match.
    pub fn is_open_at(&self, timestamp: i64) -> bool {
        if self.notes.as_deref() == Some(CLOSED_NOTE) {
            return false;
        }
        self.open_time <= timestamp && timestamp <= self.close_time
    }
}

impl Place {
    pub fn is_open_at(&self, timestamp: i64) -> bool {
        self.open_close_array.iter().any(|hours| hours.is_open_at(timestamp))
    }
}

/// Keep the places open at `timestamp`
pub fn open_at(timestamp: i64, places: Vec<Place>) -> Vec<Place> {
    places.into_iter().filter(|p| p.is_open_at(timestamp)).collect()
}
