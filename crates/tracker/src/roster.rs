//! Roster management: users and departments.
//!
//! All operations here require an elevated [`AdminSession`] and follow the
//! optimistic pattern described on [`Tracker`]: memory first, then the store.

use entities::{User, DEFAULT_DEPARTMENT};
use shift_store::ShiftStore;
use uuid::Uuid;

use crate::{AdminSession, Tracker, TrackerError, TrackerResult};

impl<S: ShiftStore> Tracker<S> {
    /// Adds a user to the roster.
    ///
    /// The new user is appended at the end of the display order: their rank
    /// is one past the current global maximum.
    pub async fn add_user(
        &mut self,
        session: &AdminSession,
        name: &str,
        department: Option<String>,
    ) -> TrackerResult<User> {
        session.require_admin()?;

        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::Validation("user name is empty".to_string()));
        }

        let next_rank = self
            .users()
            .iter()
            .map(User::sort_rank)
            .max()
            .unwrap_or(0)
            + 1;
        let department =
            department.unwrap_or_else(|| self.default_department().to_string());
        let user = User::new(name)
            .with_department(department)
            .with_rank(next_rank);

        self.users_mut().push(user.clone());
        self.store().save_user(&user).await?;

        tracing::info!(user_id = %user.id, name = %user.name, "User added");
        Ok(user)
    }

    /// Replaces a user's record wholesale, matched by id.
    pub async fn update_user(
        &mut self,
        session: &AdminSession,
        user: User,
    ) -> TrackerResult<()> {
        session.require_admin()?;

        let existing = self
            .users_mut()
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(TrackerError::UserNotFound(user.id))?;
        *existing = user.clone();

        self.store().save_user(&user).await?;
        Ok(())
    }

    /// Removes a user and all of their shifts.
    pub async fn delete_user(
        &mut self,
        session: &AdminSession,
        user_id: Uuid,
    ) -> TrackerResult<()> {
        session.require_admin()?;
        self.user(user_id)?;

        self.users_mut().retain(|u| u.id != user_id);
        self.active_mut().remove(user_id);
        self.store().delete_user(user_id).await?;

        tracing::info!(user_id = %user_id, "User deleted");
        Ok(())
    }

    /// Adds a department at the end of the ordering. Returns `false` when
    /// the name already exists (the roster is left untouched).
    pub async fn add_department(
        &mut self,
        session: &AdminSession,
        name: &str,
    ) -> TrackerResult<bool> {
        session.require_admin()?;

        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::Validation(
                "department name is empty".to_string(),
            ));
        }
        if self.departments().iter().any(|d| d == name) {
            return Ok(false);
        }

        self.departments_mut().push(name.to_string());
        let snapshot = self.departments().to_vec();
        self.store().save_departments(&snapshot).await?;

        tracing::info!(department = %name, "Department added");
        Ok(true)
    }

    /// Renames a department, cascading to every user assigned to it.
    ///
    /// Returns the new name on success, or `None` when the rename is a
    /// no-op: unknown source, blank target, or a target that already exists.
    pub async fn rename_department(
        &mut self,
        session: &AdminSession,
        old_name: &str,
        new_name: &str,
    ) -> TrackerResult<Option<String>> {
        session.require_admin()?;

        let new_name = new_name.trim();
        if new_name.is_empty()
            || new_name == old_name
            || self.departments().iter().any(|d| d == new_name)
            || !self.departments().iter().any(|d| d == old_name)
        {
            return Ok(None);
        }

        for dept in self.departments_mut().iter_mut() {
            if dept == old_name {
                *dept = new_name.to_string();
            }
        }
        let mut changed_users = Vec::new();
        for user in self.users_mut().iter_mut() {
            if user.department.as_deref() == Some(old_name) {
                user.department = Some(new_name.to_string());
                changed_users.push(user.clone());
            }
        }

        let snapshot = self.departments().to_vec();
        self.store().save_departments(&snapshot).await?;
        // The old row keeps nothing referencing it; drop it explicitly for
        // backends that key departments by name.
        self.store().delete_department(old_name).await?;
        self.store().save_users(&changed_users).await?;

        tracing::info!(
            from = %old_name,
            to = %new_name,
            users = changed_users.len(),
            "Department renamed"
        );
        Ok(Some(new_name.to_string()))
    }

    /// Deletes a department and reassigns its users to a fallback: the
    /// first remaining department, or the default name when none remain.
    /// Returns the fallback used.
    pub async fn delete_department(
        &mut self,
        session: &AdminSession,
        name: &str,
    ) -> TrackerResult<String> {
        session.require_admin()?;

        self.departments_mut().retain(|d| d != name);
        let fallback = self
            .departments()
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string());

        let mut changed_users = Vec::new();
        for user in self.users_mut().iter_mut() {
            if user.department.as_deref() == Some(name) {
                user.department = Some(fallback.clone());
                changed_users.push(user.clone());
            }
        }

        let snapshot = self.departments().to_vec();
        self.store().save_departments(&snapshot).await?;
        self.store().delete_department(name).await?;
        self.store().save_users(&changed_users).await?;

        tracing::info!(
            department = %name,
            fallback = %fallback,
            users = changed_users.len(),
            "Department deleted"
        );
        Ok(fallback)
    }

    /// Replaces the department ordering wholesale.
    pub async fn reorder_departments(
        &mut self,
        session: &AdminSession,
        ordered: Vec<String>,
    ) -> TrackerResult<()> {
        session.require_admin()?;

        *self.departments_mut() = ordered;
        let snapshot = self.departments().to_vec();
        self.store().save_departments(&snapshot).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shift_store::MemoryStore;

    use super::*;
    use crate::Tracker;

    async fn empty_tracker() -> Tracker<MemoryStore> {
        let mut tracker = Tracker::new(Arc::new(MemoryStore::new()));
        tracker.load().await.unwrap();
        tracker
    }

    #[tokio::test]
    async fn test_add_user_appends_rank() {
        let mut tracker = empty_tracker().await;
        let session = AdminSession::admin();

        let a = tracker.add_user(&session, "Alice", None).await.unwrap();
        let b = tracker.add_user(&session, "Bob", None).await.unwrap();

        assert_eq!(a.rank, Some(1));
        assert_eq!(b.rank, Some(2));

        // Durable across reload.
        tracker.load().await.unwrap();
        assert_eq!(tracker.users().len(), 2);
    }

    #[tokio::test]
    async fn test_add_user_requires_admin() {
        let mut tracker = empty_tracker().await;
        let result = tracker.add_user(&AdminSession::guest(), "Alice", None).await;
        assert!(matches!(result, Err(TrackerError::AdminRequired)));
    }

    #[tokio::test]
    async fn test_add_department_rejects_duplicates() {
        let mut tracker = empty_tracker().await;
        let session = AdminSession::admin();

        assert!(tracker.add_department(&session, "Kitchen").await.unwrap());
        assert!(!tracker.add_department(&session, "Kitchen").await.unwrap());
        assert_eq!(tracker.departments(), ["Kitchen"]);
    }

    #[tokio::test]
    async fn test_rename_department_cascades_to_users() {
        let mut tracker = empty_tracker().await;
        let session = AdminSession::admin();

        tracker.add_department(&session, "Kitchen").await.unwrap();
        tracker.add_department(&session, "Bar").await.unwrap();
        let user = tracker
            .add_user(&session, "Alice", Some("Kitchen".to_string()))
            .await
            .unwrap();

        let renamed = tracker
            .rename_department(&session, "Kitchen", "Galley")
            .await
            .unwrap();
        assert_eq!(renamed.as_deref(), Some("Galley"));
        assert_eq!(tracker.departments(), ["Galley", "Bar"]);
        assert_eq!(
            tracker.user(user.id).unwrap().department.as_deref(),
            Some("Galley")
        );

        // The cascade is persisted, not just in memory.
        tracker.load().await.unwrap();
        assert_eq!(
            tracker.user(user.id).unwrap().department.as_deref(),
            Some("Galley")
        );
        assert_eq!(tracker.departments(), ["Galley", "Bar"]);
    }

    #[tokio::test]
    async fn test_rename_to_existing_name_is_noop() {
        let mut tracker = empty_tracker().await;
        let session = AdminSession::admin();

        tracker.add_department(&session, "Kitchen").await.unwrap();
        tracker.add_department(&session, "Bar").await.unwrap();

        let renamed = tracker
            .rename_department(&session, "Kitchen", "Bar")
            .await
            .unwrap();
        assert!(renamed.is_none());
        assert_eq!(tracker.departments(), ["Kitchen", "Bar"]);
    }

    #[tokio::test]
    async fn test_delete_department_reassigns_users() {
        let mut tracker = empty_tracker().await;
        let session = AdminSession::admin();

        tracker.add_department(&session, "Kitchen").await.unwrap();
        tracker.add_department(&session, "Bar").await.unwrap();
        for name in ["Alice", "Bob", "Carol"] {
            tracker
                .add_user(&session, name, Some("Bar".to_string()))
                .await
                .unwrap();
        }

        let fallback = tracker.delete_department(&session, "Bar").await.unwrap();
        assert_eq!(fallback, "Kitchen");
        assert!(tracker
            .users()
            .iter()
            .all(|u| u.department.as_deref() == Some("Kitchen")));
    }

    #[tokio::test]
    async fn test_delete_last_department_falls_back_to_default() {
        let mut tracker = empty_tracker().await;
        let session = AdminSession::admin();

        tracker.add_department(&session, "Kitchen").await.unwrap();
        tracker
            .add_user(&session, "Alice", Some("Kitchen".to_string()))
            .await
            .unwrap();

        let fallback = tracker
            .delete_department(&session, "Kitchen")
            .await
            .unwrap();
        assert_eq!(fallback, DEFAULT_DEPARTMENT);
        assert!(tracker.departments().is_empty());
    }

    #[tokio::test]
    async fn test_delete_user_drops_active_entry() {
        let mut tracker = empty_tracker().await;
        let session = AdminSession::admin();

        let user = tracker.add_user(&session, "Alice", None).await.unwrap();
        tracker.clock_in(user.id).await.unwrap();

        tracker.delete_user(&session, user.id).await.unwrap();
        assert!(!tracker.active_shifts().contains(user.id));
        assert!(tracker.users().is_empty());
    }
}
