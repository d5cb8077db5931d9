//! Shift lifecycle operations: clock-in, resume, clock-out, toggle, and the
//! admin-only manual entry and delete.

use chrono::{DateTime, Utc};
use entities::Shift;
use shift_store::ShiftStore;
use uuid::Uuid;

use crate::{AdminSession, Tracker, TrackerError, TrackerResult};

/// What a [`Tracker::toggle`] call ended up doing.
#[derive(Debug, Clone)]
pub enum ToggleOutcome {
    /// The user is now working.
    ClockedIn(Shift),
    /// The user's shift was completed.
    ClockedOut(Shift),
}

impl<S: ShiftStore> Tracker<S> {
    /// Clocks a user in.
    ///
    /// If a shift already started on today's local calendar date, it is
    /// resumed (its end time cleared) instead of creating a second record.
    /// The active index is updated only after the persistence call returns.
    pub async fn clock_in(&mut self, user_id: Uuid) -> TrackerResult<Shift> {
        self.user(user_id)?;
        let now = Utc::now();

        // Dispatch is gated on the index: a second clock-in without an
        // intervening clock-out is a no-op.
        if let Some(active) = self.active_shifts().get(user_id) {
            return Ok(active.clone());
        }

        let history = self.store().list_shifts(user_id).await?;
        let shift = match history.iter().find(|s| s.started_same_day(now)) {
            Some(today) => {
                self.store().resume_shift(user_id, today.id).await?;
                let mut resumed = today.clone();
                resumed.end_time = None;
                tracing::info!(user_id = %user_id, shift_id = %resumed.id, "Shift resumed");
                resumed
            }
            None => {
                let shift = Shift::new(user_id, now);
                self.store().start_shift(&shift).await?;
                tracing::info!(user_id = %user_id, shift_id = %shift.id, "Shift started");
                shift
            }
        };

        self.active_mut().insert(shift.clone());
        self.sweep_stale(now);
        Ok(shift)
    }

    /// Clocks a user out.
    ///
    /// The completed shift is persisted first; the user is removed from the
    /// active index only after the write is durable, so readers never
    /// observe "not active" before the record exists.
    pub async fn clock_out(&mut self, user_id: Uuid) -> TrackerResult<Shift> {
        let now = Utc::now();
        let mut completed = self
            .active_shifts()
            .get(user_id)
            .cloned()
            .ok_or(TrackerError::NotClockedIn(user_id))?;
        completed.end_time = Some(now);

        self.store().end_shift(&completed).await?;
        self.active_mut().remove(user_id);
        self.sweep_stale(now);

        tracing::info!(user_id = %user_id, shift_id = %completed.id, "Shift completed");
        Ok(completed)
    }

    /// Dispatches to clock-in or clock-out based on the active index.
    pub async fn toggle(&mut self, user_id: Uuid) -> TrackerResult<ToggleOutcome> {
        if self.active_shifts().contains(user_id) {
            Ok(ToggleOutcome::ClockedOut(self.clock_out(user_id).await?))
        } else {
            Ok(ToggleOutcome::ClockedIn(self.clock_in(user_id).await?))
        }
    }

    /// A user's full shift history, newest first, open shift included.
    pub async fn shifts(&self, user_id: Uuid) -> TrackerResult<Vec<Shift>> {
        Ok(self.store().list_shifts(user_id).await?)
    }

    /// Records a completed shift by hand (admin only).
    ///
    /// The end time must be strictly after the start time; invalid input is
    /// rejected before any persistence call.
    pub async fn add_manual_shift(
        &mut self,
        session: &AdminSession,
        user_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        note: Option<String>,
    ) -> TrackerResult<Shift> {
        session.require_admin()?;
        self.user(user_id)?;

        if end_time <= start_time {
            return Err(TrackerError::Validation(
                "end time must be after start time".to_string(),
            ));
        }

        let mut shift = Shift::new(user_id, start_time);
        shift.end_time = Some(end_time);
        shift.note = note;

        self.store().start_shift(&shift).await?;
        tracing::info!(user_id = %user_id, shift_id = %shift.id, "Manual shift recorded");
        Ok(shift)
    }

    /// Deletes a shift outright (admin only). The staleness reconciler
    /// never does this; it is reserved for explicit administrator action.
    pub async fn remove_shift(
        &mut self,
        session: &AdminSession,
        user_id: Uuid,
        shift_id: Uuid,
    ) -> TrackerResult<()> {
        session.require_admin()?;

        self.store().delete_shift(user_id, shift_id).await?;
        if self
            .active_shifts()
            .get(user_id)
            .is_some_and(|s| s.id == shift_id)
        {
            self.active_mut().remove(user_id);
        }
        tracing::info!(user_id = %user_id, shift_id = %shift_id, "Shift deleted");
        Ok(())
    }
}
