//! Active-shift index.
//!
//! A cached projection from user id to that user's currently open shift.
//! It is not a source of truth: [`ActiveIndex::rebuild`] reconstructs it
//! from the shift collection, which is the consistency invariant the rest
//! of the engine relies on.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entities::Shift;
use uuid::Uuid;

/// Mapping from user id to that user's open shift started today.
#[derive(Debug, Clone, Default)]
pub struct ActiveIndex {
    entries: HashMap<Uuid, Shift>,
}

impl ActiveIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already-filtered mapping, e.g. from
    /// [`shift_store::ShiftStore::list_active_shifts`].
    pub fn from_map(entries: HashMap<Uuid, Shift>) -> Self {
        Self { entries }
    }

    /// Rebuilds the index from a shift collection: per user, the open shift
    /// whose start falls on the local calendar date of `now`.
    pub fn rebuild<'a>(shifts: impl IntoIterator<Item = &'a Shift>, now: DateTime<Utc>) -> Self {
        let mut entries = HashMap::new();
        for shift in shifts {
            if shift.is_open() && shift.started_same_day(now) {
                entries.insert(shift.user_id, shift.clone());
            }
        }
        Self { entries }
    }

    /// Returns a user's active shift, if any.
    pub fn get(&self, user_id: Uuid) -> Option<&Shift> {
        self.entries.get(&user_id)
    }

    /// Whether the user currently has an active shift.
    pub fn contains(&self, user_id: Uuid) -> bool {
        self.entries.contains_key(&user_id)
    }

    /// Marks a shift active. At most one entry per user: an existing entry
    /// for the same user is replaced.
    pub fn insert(&mut self, shift: Shift) {
        self.entries.insert(shift.user_id, shift);
    }

    /// Clears a user's entry.
    pub fn remove(&mut self, user_id: Uuid) -> Option<Shift> {
        self.entries.remove(&user_id)
    }

    /// Removes entries whose shift did not start on the local calendar date
    /// of `now` and returns the affected user ids. Shift records themselves
    /// are untouched.
    pub fn sweep_stale(&mut self, now: DateTime<Utc>) -> Vec<Uuid> {
        let stale: Vec<Uuid> = self
            .entries
            .iter()
            .filter(|(_, shift)| !shift.started_same_day(now))
            .map(|(user_id, _)| *user_id)
            .collect();
        for user_id in &stale {
            self.entries.remove(user_id);
        }
        stale
    }

    /// Number of users currently working.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nobody is clocked in.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(user_id, shift)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&Uuid, &Shift)> {
        self.entries.iter()
    }

    /// Clones the underlying map.
    pub fn to_map(&self) -> HashMap<Uuid, Shift> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_one_entry_per_user() {
        let mut index = ActiveIndex::new();
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        index.insert(Shift::new(user_id, now - Duration::hours(1)));
        index.insert(Shift::new(user_id, now));

        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_rebuild_matches_incremental_state() {
        let now = Utc::now();
        let worker = Uuid::new_v4();
        let forgetful = Uuid::new_v4();

        let open_today = Shift::new(worker, now);
        let open_stale = Shift::new(forgetful, now - Duration::days(2));
        let mut closed = Shift::new(worker, now - Duration::days(1));
        closed.end_time = Some(now - Duration::days(1) + Duration::hours(8));

        let shifts = vec![open_today.clone(), open_stale, closed];
        let index = ActiveIndex::rebuild(&shifts, now);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get(worker).map(|s| s.id), Some(open_today.id));
        assert!(!index.contains(forgetful));
    }

    #[test]
    fn test_sweep_removes_only_stale_entries() {
        let now = Utc::now();
        let mut index = ActiveIndex::new();
        let fresh = Uuid::new_v4();
        let stale = Uuid::new_v4();

        index.insert(Shift::new(fresh, now));
        index.insert(Shift::new(stale, now - Duration::days(2)));

        let removed = index.sweep_stale(now);
        assert_eq!(removed, vec![stale]);
        assert!(index.contains(fresh));
        assert!(!index.contains(stale));
    }
}
