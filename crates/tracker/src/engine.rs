//! Tracker engine state.

use std::collections::HashMap;
use std::sync::Arc;

use entities::{User, DEFAULT_DEPARTMENT};
use shift_store::ShiftStore;
use uuid::Uuid;

use crate::{ActiveIndex, TrackerError, TrackerResult};

/// The attendance engine: in-memory roster, department order, and the
/// active-shift index, backed by a [`ShiftStore`].
///
/// All mutations run on a single logical actor; callers serialize per-user
/// operations. Mutating methods update memory optimistically and then await
/// persistence; a store failure is returned without rolling memory back.
pub struct Tracker<S> {
    store: Arc<S>,
    users: Vec<User>,
    departments: Vec<String>,
    active: ActiveIndex,
}

impl<S: ShiftStore> Tracker<S> {
    /// Creates an engine with empty state; call [`Tracker::load`] before use.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            users: Vec::new(),
            departments: Vec::new(),
            active: ActiveIndex::new(),
        }
    }

    /// Loads users, departments, and active shifts from the store.
    ///
    /// Users are deduplicated by id (last record wins) and sorted by rank;
    /// department names are deduplicated preserving order.
    pub async fn load(&mut self) -> TrackerResult<()> {
        let fetched_users = self.store.list_users().await?;
        let fetched_departments = self.store.list_departments().await?;
        let fetched_active = self.store.list_active_shifts().await?;

        let mut by_id: HashMap<Uuid, User> = HashMap::new();
        let mut order: Vec<Uuid> = Vec::new();
        for user in fetched_users {
            if by_id.insert(user.id, user.clone()).is_none() {
                order.push(user.id);
            }
        }
        let mut users: Vec<User> = order
            .into_iter()
            .filter_map(|id| by_id.remove(&id))
            .collect();
        users.sort_by_key(User::sort_rank);

        let mut departments: Vec<String> = Vec::new();
        for name in fetched_departments {
            if !departments.contains(&name) {
                departments.push(name);
            }
        }

        tracing::info!(
            users = users.len(),
            departments = departments.len(),
            active = fetched_active.len(),
            "Roster loaded"
        );

        self.users = users;
        self.departments = departments;
        self.active = ActiveIndex::from_map(fetched_active);
        Ok(())
    }

    /// Returns the store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Users sorted by rank.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Configured department names in order.
    pub fn departments(&self) -> &[String] {
        &self.departments
    }

    /// Configured departments plus any department referenced by a user but
    /// missing from the configured list.
    pub fn display_departments(&self) -> Vec<String> {
        let mut names = self.departments.clone();
        for user in &self.users {
            let dept = user.department_or_default();
            if !names.iter().any(|n| n == dept) {
                names.push(dept.to_string());
            }
        }
        names
    }

    /// The active-shift index.
    pub fn active_shifts(&self) -> &ActiveIndex {
        &self.active
    }

    pub(crate) fn active_mut(&mut self) -> &mut ActiveIndex {
        &mut self.active
    }

    pub(crate) fn users_mut(&mut self) -> &mut Vec<User> {
        &mut self.users
    }

    pub(crate) fn departments_mut(&mut self) -> &mut Vec<String> {
        &mut self.departments
    }

    /// Looks up a user by id.
    pub fn user(&self, user_id: Uuid) -> TrackerResult<&User> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .ok_or(TrackerError::UserNotFound(user_id))
    }

    /// The department a new user lands in when none is chosen: the first
    /// configured department, or the default sentinel.
    pub fn default_department(&self) -> &str {
        self.departments
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_DEPARTMENT)
    }
}
