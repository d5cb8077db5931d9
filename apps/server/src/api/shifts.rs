//! Shift lifecycle API endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use entities::Shift;
use serde::{Deserialize, Serialize};
use shift_store::ShiftStore;
use tracker::ToggleOutcome;
use uuid::Uuid;

use crate::error::ServerResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserShiftRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    /// `"clocked_in"` or `"clocked_out"`.
    pub action: &'static str,
    pub shift: Shift,
}

/// Clocks the user in or out depending on their current state.
pub async fn toggle<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<UserShiftRequest>,
) -> ServerResult<Json<ToggleResponse>> {
    let mut tracker = state.tracker.write().await;
    let response = match tracker.toggle(request.user_id).await? {
        ToggleOutcome::ClockedIn(shift) => ToggleResponse {
            action: "clocked_in",
            shift,
        },
        ToggleOutcome::ClockedOut(shift) => ToggleResponse {
            action: "clocked_out",
            shift,
        },
    };
    Ok(Json(response))
}

/// Clocks a user in (resumes a same-day shift when one exists).
pub async fn clock_in<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<UserShiftRequest>,
) -> ServerResult<Json<Shift>> {
    let mut tracker = state.tracker.write().await;
    let shift = tracker.clock_in(request.user_id).await?;
    Ok(Json(shift))
}

/// Clocks a user out.
pub async fn clock_out<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<UserShiftRequest>,
) -> ServerResult<Json<Shift>> {
    let mut tracker = state.tracker.write().await;
    let shift = tracker.clock_out(request.user_id).await?;
    Ok(Json(shift))
}

/// Lists a user's shift history, newest first.
pub async fn list_shifts<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<UserShiftRequest>,
) -> ServerResult<Json<Vec<Shift>>> {
    let tracker = state.tracker.read().await;
    let shifts = tracker.shifts(request.user_id).await?;
    Ok(Json(shifts))
}

/// Maps user id to their currently active shift.
pub async fn active_shifts<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<HashMap<Uuid, Shift>>> {
    let tracker = state.tracker.read().await;
    Ok(Json(tracker.active_shifts().to_map()))
}

#[derive(Debug, Deserialize)]
pub struct AddManualShiftRequest {
    pub admin_pin: Option<String>,
    pub user_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub note: Option<String>,
}

/// Records a completed shift by hand.
pub async fn add_manual_shift<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<AddManualShiftRequest>,
) -> ServerResult<Json<Shift>> {
    let session = state.require_admin(request.admin_pin.as_deref())?;
    let mut tracker = state.tracker.write().await;
    let shift = tracker
        .add_manual_shift(
            &session,
            request.user_id,
            request.start_time,
            request.end_time,
            request.note,
        )
        .await?;
    Ok(Json(shift))
}

#[derive(Debug, Deserialize)]
pub struct DeleteShiftRequest {
    pub admin_pin: Option<String>,
    pub user_id: Uuid,
    pub shift_id: Uuid,
}

/// Deletes a shift record.
pub async fn delete_shift<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<DeleteShiftRequest>,
) -> ServerResult<Json<serde_json::Value>> {
    let session = state.require_admin(request.admin_pin.as_deref())?;
    let mut tracker = state.tracker.write().await;
    tracker
        .remove_shift(&session, request.user_id, request.shift_id)
        .await?;
    Ok(Json(serde_json::json!({ "deleted": request.shift_id })))
}
