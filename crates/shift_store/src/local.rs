//! Local key-value shift store.
//!
//! Persists each collection as a flat JSON document in a data directory:
//! `users.json`, `departments.json`, and per user `shifts_<id>.json`
//! (history, newest first) plus `current_shift_<id>.json` (the open-shift
//! slot). Callers serialize writes per user; see the crate-level contract.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use entities::{Shift, User};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::{ShiftStore, StoreError, StoreResult};

/// Shift store backed by flat JSON files.
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Opens (or creates) the data directory.
    pub async fn new(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        tracing::info!(dir = %dir.display(), "Local store ready");
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn history_key(user_id: Uuid) -> String {
        format!("shifts_{user_id}")
    }

    fn current_key(user_id: Uuid) -> String {
        format!("current_shift_{user_id}")
    }

    async fn read_key<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match tokio::fs::read(self.key_path(key)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_key<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(self.key_path(key), bytes).await?;
        Ok(())
    }

    async fn remove_key(&self, key: &str) -> StoreResult<()> {
        match tokio::fs::remove_file(self.key_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn history(&self, user_id: Uuid) -> StoreResult<Vec<Shift>> {
        Ok(self
            .read_key(&Self::history_key(user_id))
            .await?
            .unwrap_or_default())
    }

    async fn current(&self, user_id: Uuid) -> StoreResult<Option<Shift>> {
        self.read_key(&Self::current_key(user_id)).await
    }

    async fn upsert_history(&self, shift: &Shift) -> StoreResult<()> {
        let mut history = self.history(shift.user_id).await?;
        match history.iter_mut().find(|s| s.id == shift.id) {
            Some(existing) => *existing = shift.clone(),
            None => history.push(shift.clone()),
        }
        history.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        self.write_key(&Self::history_key(shift.user_id), &history)
            .await
    }
}

#[async_trait]
impl ShiftStore for LocalStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.read_key("users").await?.unwrap_or_default())
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        let mut users = self.list_users().await?;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        self.write_key("users", &users).await
    }

    async fn delete_user(&self, user_id: Uuid) -> StoreResult<()> {
        let mut users = self.list_users().await?;
        let before = users.len();
        users.retain(|u| u.id != user_id);
        if users.len() == before {
            return Err(StoreError::not_found("User", user_id.to_string()));
        }
        self.write_key("users", &users).await?;

        // Cascade: drop the user's shift keys.
        self.remove_key(&Self::history_key(user_id)).await?;
        self.remove_key(&Self::current_key(user_id)).await?;
        Ok(())
    }

    async fn list_departments(&self) -> StoreResult<Vec<String>> {
        Ok(self.read_key("departments").await?.unwrap_or_default())
    }

    async fn save_departments(&self, departments: &[String]) -> StoreResult<()> {
        self.write_key("departments", &departments.to_vec()).await
    }

    async fn delete_department(&self, name: &str) -> StoreResult<()> {
        let mut departments = self.list_departments().await?;
        departments.retain(|d| d != name);
        self.write_key("departments", &departments).await
    }

    async fn list_shifts(&self, user_id: Uuid) -> StoreResult<Vec<Shift>> {
        let history = self.history(user_id).await?;
        // The open shift rides in front of the history list.
        match self.current(user_id).await? {
            Some(active) => {
                let mut shifts = Vec::with_capacity(history.len() + 1);
                shifts.push(active);
                shifts.extend(history);
                Ok(shifts)
            }
            None => Ok(history),
        }
    }

    async fn list_active_shifts(&self) -> StoreResult<HashMap<Uuid, Shift>> {
        let now = Utc::now();
        let mut map = HashMap::new();
        for user in self.list_users().await? {
            if let Some(shift) = self.current(user.id).await? {
                if shift.started_same_day(now) {
                    map.insert(user.id, shift);
                }
            }
        }
        Ok(map)
    }

    async fn start_shift(&self, shift: &Shift) -> StoreResult<()> {
        // Closed records (manual entries) go straight into history; only an
        // open shift occupies the active slot.
        if !shift.is_open() {
            return self.upsert_history(shift).await;
        }

        // A stale open shift (a forgotten clock-out) may still occupy the
        // slot; move it into history instead of overwriting it.
        if let Some(previous) = self.current(shift.user_id).await? {
            if previous.id != shift.id {
                self.upsert_history(&previous).await?;
            }
        }
        self.write_key(&Self::current_key(shift.user_id), shift)
            .await
    }

    async fn resume_shift(&self, user_id: Uuid, shift_id: Uuid) -> StoreResult<()> {
        let mut history = self.history(user_id).await?;
        let index = history
            .iter()
            .position(|s| s.id == shift_id)
            .ok_or_else(|| StoreError::not_found("Shift", shift_id.to_string()))?;

        let mut shift = history.remove(index);
        shift.end_time = None;

        // The slot may hold a different stale open shift; keep it.
        if let Some(previous) = self.current(user_id).await? {
            if previous.id != shift_id {
                history.push(previous);
                history.sort_by(|a, b| b.start_time.cmp(&a.start_time));
            }
        }

        self.write_key(&Self::current_key(user_id), &shift).await?;
        self.write_key(&Self::history_key(user_id), &history).await
    }

    async fn end_shift(&self, shift: &Shift) -> StoreResult<()> {
        let mut history = self.history(shift.user_id).await?;
        match history.iter_mut().find(|s| s.id == shift.id) {
            Some(existing) => *existing = shift.clone(),
            None => history.insert(0, shift.clone()),
        }
        self.write_key(&Self::history_key(shift.user_id), &history)
            .await?;
        self.remove_key(&Self::current_key(shift.user_id)).await
    }

    async fn delete_shift(&self, user_id: Uuid, shift_id: Uuid) -> StoreResult<()> {
        if let Some(active) = self.current(user_id).await? {
            if active.id == shift_id {
                return self.remove_key(&Self::current_key(user_id)).await;
            }
        }

        let mut history = self.history(user_id).await?;
        history.retain(|s| s.id != shift_id);
        self.write_key(&Self::history_key(user_id), &history).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    async fn temp_store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_user_roundtrip() {
        let (_dir, store) = temp_store().await;

        let user = User::new("Alice").with_rank(1);
        store.save_user(&user).await.unwrap();

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, user.id);
    }

    #[tokio::test]
    async fn test_delete_user_removes_shift_keys() {
        let (_dir, store) = temp_store().await;

        let user = User::new("Alice");
        store.save_user(&user).await.unwrap();
        store
            .start_shift(&Shift::new(user.id, Utc::now()))
            .await
            .unwrap();

        store.delete_user(user.id).await.unwrap();
        assert!(store.list_shifts(user.id).await.unwrap().is_empty());
        assert!(store.list_active_shifts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_shift_listed_first() {
        let (_dir, store) = temp_store().await;
        let user = User::new("Alice");
        store.save_user(&user).await.unwrap();
        let now = Utc::now();

        let mut closed = Shift::new(user.id, now - Duration::hours(10));
        closed.end_time = Some(now - Duration::hours(9));
        store.start_shift(&closed).await.unwrap();
        store.end_shift(&closed).await.unwrap();

        let open = Shift::new(user.id, now);
        store.start_shift(&open).await.unwrap();

        let shifts = store.list_shifts(user.id).await.unwrap();
        assert_eq!(shifts.len(), 2);
        assert_eq!(shifts[0].id, open.id);
    }

    #[tokio::test]
    async fn test_end_then_resume_moves_between_slots() {
        let (_dir, store) = temp_store().await;
        let user = User::new("Alice");
        store.save_user(&user).await.unwrap();
        let now = Utc::now();

        let mut shift = Shift::new(user.id, now);
        store.start_shift(&shift).await.unwrap();

        shift.end_time = Some(now);
        store.end_shift(&shift).await.unwrap();
        assert!(store.list_active_shifts().await.unwrap().is_empty());

        store.resume_shift(user.id, shift.id).await.unwrap();
        let active = store.list_active_shifts().await.unwrap();
        assert_eq!(active.get(&user.id).map(|s| s.id), Some(shift.id));

        // No duplicate record after the round trip.
        assert_eq!(store.list_shifts(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_open_shift_not_active() {
        let (_dir, store) = temp_store().await;
        let user = User::new("Alice");
        store.save_user(&user).await.unwrap();

        store
            .start_shift(&Shift::new(user.id, Utc::now() - Duration::days(2)))
            .await
            .unwrap();

        assert!(store.list_active_shifts().await.unwrap().is_empty());
        // Still present in history, end time undefined.
        let shifts = store.list_shifts(user.id).await.unwrap();
        assert_eq!(shifts.len(), 1);
        assert!(shifts[0].is_open());
    }

    #[tokio::test]
    async fn test_stale_open_shift_survives_next_clock_in() {
        let (_dir, store) = temp_store().await;
        let user = User::new("Alice");
        store.save_user(&user).await.unwrap();

        // Two days ago's forgotten clock-out still sits in the active slot.
        let stale = Shift::new(user.id, Utc::now() - Duration::days(2));
        store.start_shift(&stale).await.unwrap();

        let fresh = Shift::new(user.id, Utc::now());
        store.start_shift(&fresh).await.unwrap();

        // Both records survive: the new one in the slot, the old one moved
        // into history with its end time still undefined.
        let shifts = store.list_shifts(user.id).await.unwrap();
        assert_eq!(shifts.len(), 2);
        assert_eq!(shifts[0].id, fresh.id);
        let old = shifts.iter().find(|s| s.id == stale.id).unwrap();
        assert!(old.is_open());

        let active = store.list_active_shifts().await.unwrap();
        assert_eq!(active.get(&user.id).map(|s| s.id), Some(fresh.id));
    }

    #[tokio::test]
    async fn test_closed_record_does_not_touch_active_slot() {
        let (_dir, store) = temp_store().await;
        let user = User::new("Alice");
        store.save_user(&user).await.unwrap();
        let now = Utc::now();

        let open = Shift::new(user.id, now);
        store.start_shift(&open).await.unwrap();

        // A back-dated manual entry lands in history.
        let mut manual = Shift::new(user.id, now - Duration::days(3));
        manual.end_time = Some(now - Duration::days(3) + Duration::hours(8));
        store.start_shift(&manual).await.unwrap();

        let active = store.list_active_shifts().await.unwrap();
        assert_eq!(active.get(&user.id).map(|s| s.id), Some(open.id));

        let shifts = store.list_shifts(user.id).await.unwrap();
        assert_eq!(shifts.len(), 2);
        assert_eq!(shifts[0].id, open.id);
    }

    #[tokio::test]
    async fn test_delete_active_shift() {
        let (_dir, store) = temp_store().await;
        let user = User::new("Alice");
        store.save_user(&user).await.unwrap();

        let shift = Shift::new(user.id, Utc::now());
        store.start_shift(&shift).await.unwrap();
        store.delete_shift(user.id, shift.id).await.unwrap();

        assert!(store.list_shifts(user.id).await.unwrap().is_empty());
    }
}
