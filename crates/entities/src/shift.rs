//! Shift entity and calendar-day helpers.

use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single work session belonging to exactly one user.
///
/// `end_time == None` means the shift is open; a user may have at most one
/// open shift at any time. The staleness reconciler never deletes shifts,
/// it only demotes them from the active view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Shift {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// When the shift started.
    pub start_time: DateTime<Utc>,
    /// When the shift ended; `None` while open.
    pub end_time: Option<DateTime<Utc>>,
    /// Optional free-text note.
    pub note: Option<String>,
}

impl Shift {
    /// Creates a new open shift starting at the given instant.
    pub fn new(user_id: Uuid, start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            start_time,
            end_time: None,
            note: None,
        }
    }

    /// Sets the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Returns true while no end time has been recorded.
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Elapsed time at `now` for open shifts, or the recorded span for
    /// closed ones. Floored at zero to guard against clock skew.
    pub fn duration_at(&self, now: DateTime<Utc>) -> Duration {
        let end = self.end_time.unwrap_or(now);
        (end - self.start_time).max(Duration::zero())
    }

    /// Whether the shift started on the local calendar date of `now`.
    pub fn started_same_day(&self, now: DateTime<Utc>) -> bool {
        is_same_local_day(self.start_time, now)
    }
}

/// Compares two instants by local calendar date (year, month, day), not by a
/// rolling 24-hour window.
pub fn is_same_local_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.with_timezone(&Local).date_naive() == b.with_timezone(&Local).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_shift_duration() {
        let now = Utc::now();
        let shift = Shift::new(Uuid::new_v4(), now - Duration::hours(3));

        assert!(shift.is_open());
        assert_eq!(shift.duration_at(now), Duration::hours(3));
    }

    #[test]
    fn test_duration_floors_clock_skew() {
        let now = Utc::now();
        // Start in the future, as if a peer's clock drifted ahead.
        let shift = Shift::new(Uuid::new_v4(), now + Duration::minutes(5));

        assert_eq!(shift.duration_at(now), Duration::zero());
    }

    #[test]
    fn test_closed_shift_duration() {
        let now = Utc::now();
        let mut shift = Shift::new(Uuid::new_v4(), now - Duration::hours(8));
        shift.end_time = Some(now);

        assert_eq!(shift.duration_at(now), Duration::hours(8));
    }

    #[test]
    fn test_same_local_day() {
        let now = Utc::now();
        assert!(is_same_local_day(now, now));
        assert!(!is_same_local_day(now - Duration::days(2), now));
    }
}
