//! In-memory shift store implementation for testing.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use entities::{Shift, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{ShiftStore, StoreError, StoreResult};

/// In-memory shift store for testing purposes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    departments: Arc<RwLock<Vec<String>>>,
    shifts: Arc<RwLock<HashMap<Uuid, Shift>>>,
}

impl MemoryStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShiftStore for MemoryStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if users.remove(&user_id).is_none() {
            return Err(StoreError::not_found("User", user_id.to_string()));
        }
        let mut shifts = self.shifts.write().await;
        shifts.retain(|_, s| s.user_id != user_id);
        Ok(())
    }

    async fn list_departments(&self) -> StoreResult<Vec<String>> {
        let departments = self.departments.read().await;
        Ok(departments.clone())
    }

    async fn save_departments(&self, departments: &[String]) -> StoreResult<()> {
        let mut stored = self.departments.write().await;
        *stored = departments.to_vec();
        Ok(())
    }

    async fn delete_department(&self, name: &str) -> StoreResult<()> {
        let mut departments = self.departments.write().await;
        departments.retain(|d| d != name);
        Ok(())
    }

    async fn list_shifts(&self, user_id: Uuid) -> StoreResult<Vec<Shift>> {
        let shifts = self.shifts.read().await;
        let mut result: Vec<Shift> = shifts
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(result)
    }

    async fn list_active_shifts(&self) -> StoreResult<HashMap<Uuid, Shift>> {
        let now = Utc::now();
        let shifts = self.shifts.read().await;
        Ok(shifts
            .values()
            .filter(|s| s.is_open() && s.started_same_day(now))
            .map(|s| (s.user_id, s.clone()))
            .collect())
    }

    async fn start_shift(&self, shift: &Shift) -> StoreResult<()> {
        let mut shifts = self.shifts.write().await;
        shifts.insert(shift.id, shift.clone());
        Ok(())
    }

    async fn resume_shift(&self, _user_id: Uuid, shift_id: Uuid) -> StoreResult<()> {
        let mut shifts = self.shifts.write().await;
        let shift = shifts
            .get_mut(&shift_id)
            .ok_or_else(|| StoreError::not_found("Shift", shift_id.to_string()))?;
        shift.end_time = None;
        Ok(())
    }

    async fn end_shift(&self, shift: &Shift) -> StoreResult<()> {
        let mut shifts = self.shifts.write().await;
        shifts.insert(shift.id, shift.clone());
        Ok(())
    }

    async fn delete_shift(&self, _user_id: Uuid, shift_id: Uuid) -> StoreResult<()> {
        let mut shifts = self.shifts.write().await;
        if shifts.remove(&shift_id).is_none() {
            return Err(StoreError::not_found("Shift", shift_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[tokio::test]
    async fn test_user_crud() {
        let store = MemoryStore::new();

        let user = User::new("Alice");
        store.save_user(&user).await.unwrap();

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Alice");

        store.delete_user(user.id).await.unwrap();
        assert!(store.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_user_cascades_shifts() {
        let store = MemoryStore::new();

        let user = User::new("Alice");
        store.save_user(&user).await.unwrap();
        store
            .start_shift(&Shift::new(user.id, Utc::now()))
            .await
            .unwrap();

        store.delete_user(user.id).await.unwrap();
        assert!(store.list_shifts(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shifts_newest_first_and_include_open() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        let mut old = Shift::new(user_id, now - Duration::days(3));
        old.end_time = Some(now - Duration::days(3) + Duration::hours(8));
        store.start_shift(&old).await.unwrap();
        store.end_shift(&old).await.unwrap();

        let open = Shift::new(user_id, now);
        store.start_shift(&open).await.unwrap();

        let shifts = store.list_shifts(user_id).await.unwrap();
        assert_eq!(shifts.len(), 2);
        assert_eq!(shifts[0].id, open.id);
        assert!(shifts[0].is_open());
    }

    #[tokio::test]
    async fn test_active_shifts_exclude_stale() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        // Open shift from two days ago: open, but not "active" today.
        store
            .start_shift(&Shift::new(user_id, now - Duration::days(2)))
            .await
            .unwrap();

        let active = store.list_active_shifts().await.unwrap();
        assert!(active.is_empty());

        let other = Uuid::new_v4();
        store.start_shift(&Shift::new(other, now)).await.unwrap();

        let active = store.list_active_shifts().await.unwrap();
        assert_eq!(active.len(), 1);
        assert!(active.contains_key(&other));
    }

    #[tokio::test]
    async fn test_resume_clears_end_time() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        let mut shift = Shift::new(user_id, now - Duration::hours(4));
        shift.end_time = Some(now - Duration::hours(1));
        store.start_shift(&shift).await.unwrap();

        store.resume_shift(user_id, shift.id).await.unwrap();
        let shifts = store.list_shifts(user_id).await.unwrap();
        assert!(shifts[0].is_open());
    }
}
