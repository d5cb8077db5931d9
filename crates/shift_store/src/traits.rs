//! Shift store trait definitions.

use std::collections::HashMap;

use async_trait::async_trait;
use entities::{Shift, User};
use uuid::Uuid;

use crate::StoreResult;

/// Persistence contract for the attendance tracker.
///
/// Every backend implements identical observable semantics:
///
/// - `save_user` is an upsert by id; `delete_user` cascades to the user's
///   shifts.
/// - `save_departments` replaces the full ordered set: each listed name is
///   upserted with its positional rank and names absent from the list are
///   pruned.
/// - `list_shifts` returns newest-start-first and includes the currently
///   open shift, if any.
/// - `list_active_shifts` contains only open shifts whose start falls on
///   today's local calendar date.
/// - `start_shift` is an idempotent upsert so a stale client clocking in
///   twice cannot duplicate an open shift.
///
/// All writes complete before the call returns; failures propagate as
/// [`crate::StoreError`].
#[async_trait]
pub trait ShiftStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Lists all users.
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Upserts a user by id.
    async fn save_user(&self, user: &User) -> StoreResult<()>;

    /// Upserts several users; used when a rank reorder touches a whole
    /// department.
    async fn save_users(&self, users: &[User]) -> StoreResult<()> {
        for user in users {
            self.save_user(user).await?;
        }
        Ok(())
    }

    /// Deletes a user and all of their shifts.
    async fn delete_user(&self, user_id: Uuid) -> StoreResult<()>;

    // =========================================================================
    // Department operations
    // =========================================================================

    /// Lists department names ordered by rank.
    async fn list_departments(&self) -> StoreResult<Vec<String>>;

    /// Replaces the full ordered department set.
    async fn save_departments(&self, departments: &[String]) -> StoreResult<()>;

    /// Deletes a single department row.
    async fn delete_department(&self, name: &str) -> StoreResult<()>;

    // =========================================================================
    // Shift operations
    // =========================================================================

    /// Lists a user's shifts newest-start-first, open shift included.
    async fn list_shifts(&self, user_id: Uuid) -> StoreResult<Vec<Shift>>;

    /// Maps user id to that user's open shift started today.
    async fn list_active_shifts(&self) -> StoreResult<HashMap<Uuid, Shift>>;

    /// Records a new shift. Open shifts occupy the user's active slot;
    /// shifts recorded with an end time already set (manual entries) land
    /// directly in history.
    async fn start_shift(&self, shift: &Shift) -> StoreResult<()>;

    /// Clears the end time on an existing shift, moving it back into the
    /// active slot.
    async fn resume_shift(&self, user_id: Uuid, shift_id: Uuid) -> StoreResult<()>;

    /// Sets the end time, moving the shift from active into history.
    async fn end_shift(&self, shift: &Shift) -> StoreResult<()>;

    /// Removes a shift outright. Admin-only at the engine level.
    async fn delete_shift(&self, user_id: Uuid, shift_id: Uuid) -> StoreResult<()>;
}
