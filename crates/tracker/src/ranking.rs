//! Rank reordering within a department.
//!
//! Users are displayed grouped by department and sorted by rank. Moving a
//! user swaps them with their adjacent neighbor in the same department and
//! then renormalizes that department's ranks to a dense 1..=N sequence, so
//! duplicate or missing ranks self-heal on the next move.

use entities::User;
use serde::{Deserialize, Serialize};
use shift_store::ShiftStore;
use uuid::Uuid;

use crate::{AdminSession, Tracker, TrackerResult};

/// Direction of a rank move within a department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    /// Toward the front of the list.
    Up,
    /// Toward the back of the list.
    Down,
}

/// Sorts a department slice by rank and reassigns dense ranks 1..=N.
/// Returns the users whose rank actually changed.
pub fn renormalize(members: &mut [User]) -> Vec<User> {
    members.sort_by_key(User::sort_rank);
    let mut changed = Vec::new();
    for (position, user) in members.iter_mut().enumerate() {
        let rank = position as i64 + 1;
        if user.rank != Some(rank) {
            user.rank = Some(rank);
            changed.push(user.clone());
        }
    }
    changed
}

impl<S: ShiftStore> Tracker<S> {
    /// Moves a user one position up or down within their department.
    ///
    /// A move past either end of the department is a no-op. Only users whose
    /// rank changed are written back to the store. Returns the roster in its
    /// new order.
    pub async fn move_user(
        &mut self,
        session: &AdminSession,
        user_id: Uuid,
        direction: MoveDirection,
    ) -> TrackerResult<Vec<User>> {
        session.require_admin()?;

        let department = self.user(user_id)?.department_or_default().to_string();
        let mut members: Vec<User> = self
            .users()
            .iter()
            .filter(|u| u.department_or_default() == department)
            .cloned()
            .collect();
        members.sort_by_key(User::sort_rank);

        let position = members
            .iter()
            .position(|u| u.id == user_id)
            .unwrap_or_default();
        let target = match direction {
            MoveDirection::Up => position.checked_sub(1),
            MoveDirection::Down => {
                let below = position + 1;
                (below < members.len()).then_some(below)
            }
        };

        // A move past either end of the department is a no-op: no rank
        // changes, nothing written.
        let Some(target) = target else {
            return Ok(self.users().to_vec());
        };

        members.swap(position, target);
        // Swapped positions, now make the ranks agree with them.
        let mut changed = Vec::new();
        for (index, user) in members.iter_mut().enumerate() {
            let rank = index as i64 + 1;
            if user.rank != Some(rank) {
                user.rank = Some(rank);
                changed.push(user.clone());
            }
        }

        for member in &members {
            if let Some(existing) = self.users_mut().iter_mut().find(|u| u.id == member.id) {
                existing.rank = member.rank;
            }
        }
        self.users_mut().sort_by_key(User::sort_rank);

        if !changed.is_empty() {
            self.store().save_users(&changed).await?;
            tracing::debug!(
                department = %department,
                moved = %user_id,
                updated = changed.len(),
                "Ranks updated"
            );
        }
        Ok(self.users().to_vec())
    }
}
